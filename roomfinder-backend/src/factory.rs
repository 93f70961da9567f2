//! Backend factory functions.

use std::sync::Arc;

use crate::error::Result;
use crate::traits::MarketplaceBackend;
use crate::types::BackendConfig;

#[cfg(feature = "legacy")]
use crate::backends::LegacyBackend;
#[cfg(feature = "rest")]
use crate::backends::RestBackend;

/// Creates a [`MarketplaceBackend`] from connection settings.
///
/// The concrete backend is chosen by the [`BackendConfig`] variant. The result
/// is wrapped in `Arc<dyn MarketplaceBackend>` so it can be shared across tasks.
///
/// # Examples
///
/// ```rust,no_run
/// use roomfinder_backend::{create_backend, BackendConfig};
///
/// let backend = create_backend(BackendConfig::Rest {
///     base_url: "http://localhost:5000/api".to_string(),
/// })
/// .unwrap();
/// ```
pub fn create_backend(config: BackendConfig) -> Result<Arc<dyn MarketplaceBackend>> {
    match config {
        #[cfg(feature = "rest")]
        BackendConfig::Rest { base_url } => Ok(Arc::new(RestBackend::new(base_url)?)),
        #[cfg(feature = "legacy")]
        BackendConfig::Legacy { base_url } => Ok(Arc::new(LegacyBackend::new(base_url)?)),
        #[allow(unreachable_patterns)]
        other => Err(crate::error::BackendError::Unsupported {
            backend: other.kind().to_string(),
            operation: "create_backend (feature disabled)".to_string(),
        }),
    }
}
