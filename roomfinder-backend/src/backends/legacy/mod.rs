//! Legacy PHP user API backend

mod backend;
mod error;
mod http;
mod types;

use reqwest::Client;

use crate::backends::common::{create_http_client, normalize_base_url};
use crate::error::Result;
use crate::types::Capability;

pub(crate) use types::{LegacyEnvelope, LegacyNotification, LegacyProperty, LegacyReview};

pub(crate) const BACKEND_NAME: &str = "legacy";

pub(crate) const CAPABILITIES: &[Capability] = &[
    Capability::Listings,
    Capability::Favorites,
    Capability::Reviews,
    Capability::Notifications,
];

/// Backend for the legacy PHP API (`{Result, ResponseCode, ResponseMsg}` envelopes).
///
/// Every endpoint is a `POST` to `<base>/<name>.php`; the user is identified
/// by a `uid` field in the body rather than a bearer token.
pub struct LegacyBackend {
    pub(crate) client: Client,
    pub(crate) base_url: String,
    pub(crate) asset_base_url: String,
}

/// Builder for [`LegacyBackend`].
pub struct LegacyBackendBuilder {
    base_url: String,
    asset_base_url: Option<String>,
}

impl LegacyBackendBuilder {
    fn new(base_url: String) -> Self {
        Self {
            base_url,
            asset_base_url: None,
        }
    }

    /// Prefix for relative image paths. Defaults to the API base without its last segment.
    pub fn asset_base_url(mut self, url: impl Into<String>) -> Self {
        self.asset_base_url = Some(url.into());
        self
    }

    pub fn build(self) -> Result<LegacyBackend> {
        let base_url = normalize_base_url(&self.base_url);
        let asset_base_url = self.asset_base_url.map_or_else(
            || {
                base_url
                    .rsplit_once('/')
                    .map_or_else(|| base_url.clone(), |(parent, _)| parent.to_string())
            },
            |url| normalize_base_url(&url),
        );
        Ok(LegacyBackend {
            client: create_http_client(BACKEND_NAME)?,
            base_url,
            asset_base_url,
        })
    }
}

impl LegacyBackend {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::builder(base_url).build()
    }

    pub fn builder(base_url: impl Into<String>) -> LegacyBackendBuilder {
        LegacyBackendBuilder::new(base_url.into())
    }
}
