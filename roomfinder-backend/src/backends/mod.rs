//! Marketplace backend implementations

/// Shared utilities used by backend implementations.
pub mod common;

#[cfg(feature = "legacy")]
mod legacy;
#[cfg(feature = "rest")]
mod rest;

#[cfg(feature = "legacy")]
pub use legacy::{LegacyBackend, LegacyBackendBuilder};
#[cfg(feature = "rest")]
pub use rest::{RestBackend, RestBackendBuilder};
