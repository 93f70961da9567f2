//! RoomFinder REST API backend

mod backend;
mod error;
mod http;
mod types;

use reqwest::Client;

use crate::backends::common::{TokenSlot, create_http_client, normalize_base_url};
use crate::error::Result;
use crate::types::Capability;

pub(crate) use types::{RestEnvelope, RestErrorBody};

pub(crate) const BACKEND_NAME: &str = "rest";
/// Largest page size the API accepts.
pub(crate) const MAX_PAGE_SIZE: u32 = 100;

pub(crate) const CAPABILITIES: &[Capability] = &[
    Capability::Auth,
    Capability::Listings,
    Capability::HostListings,
    Capability::Bookings,
    Capability::Payments,
    Capability::HostOnboarding,
    Capability::Payouts,
    Capability::Content,
    Capability::Support,
];

/// Backend for the JSON REST API (`{success, data, message}` envelopes).
pub struct RestBackend {
    pub(crate) client: Client,
    pub(crate) base_url: String,
    pub(crate) token: TokenSlot,
}

/// Builder for [`RestBackend`].
pub struct RestBackendBuilder {
    base_url: String,
    token: Option<String>,
}

impl RestBackendBuilder {
    fn new(base_url: String) -> Self {
        Self {
            base_url,
            token: None,
        }
    }

    /// Start with a bearer token already set.
    pub fn auth_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn build(self) -> Result<RestBackend> {
        let backend = RestBackend {
            client: create_http_client(BACKEND_NAME)?,
            base_url: normalize_base_url(&self.base_url),
            token: TokenSlot::default(),
        };
        backend.token.set(self.token);
        Ok(backend)
    }
}

impl RestBackend {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::builder(base_url).build()
    }

    pub fn builder(base_url: impl Into<String>) -> RestBackendBuilder {
        RestBackendBuilder::new(base_url.into())
    }
}
