//! Backend shared helpers

use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use reqwest::Client;

use crate::error::{BackendError, Result};

// ============ HTTP Client ============

/// Default connect timeout (seconds)
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
/// Default request timeout (seconds)
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Create an HTTP client with the default timeouts.
pub fn create_http_client(backend: &str) -> Result<Client> {
    Client::builder()
        .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
        .timeout(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
        .user_agent(concat!("roomfinder/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| BackendError::NetworkError {
            backend: backend.to_string(),
            detail: format!("Failed to create HTTP client: {e}"),
        })
}

// ============ URLs ============

/// Strip trailing slashes so paths can be appended with `format!("{base}{path}")`.
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim().trim_end_matches('/').to_string()
}

/// Build a `?a=1&b=2` query string, skipping `None` values.
///
/// Returns an empty string when every value is `None`.
pub fn build_query(pairs: &[(&str, Option<String>)]) -> String {
    let encoded: Vec<String> = pairs
        .iter()
        .filter_map(|(key, value)| {
            value
                .as_ref()
                .map(|v| format!("{key}={}", urlencoding::encode(v)))
        })
        .collect();
    if encoded.is_empty() {
        String::new()
    } else {
        format!("?{}", encoded.join("&"))
    }
}

/// Encode a single path segment (IDs, slugs).
pub fn encode_segment(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}

// ============ Auth token ============

/// Bearer token shared between requests of one backend.
#[derive(Debug, Default)]
pub struct TokenSlot(RwLock<Option<String>>);

impl TokenSlot {
    pub fn set(&self, token: Option<String>) {
        *self.0.write().unwrap_or_else(PoisonError::into_inner) = token;
    }

    pub fn get(&self) -> Option<String> {
        self.0
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash() {
        assert_eq!(
            normalize_base_url("http://localhost:5000/api/"),
            "http://localhost:5000/api"
        );
    }

    #[test]
    fn query_skips_none_and_encodes() {
        let q = build_query(&[
            ("page", Some("1".into())),
            ("city", None),
            ("q", Some("Bonapriso & Akwa".into())),
        ]);
        assert_eq!(q, "?page=1&q=Bonapriso%20%26%20Akwa");
        assert_eq!(build_query(&[("city", None)]), "");
    }

    #[test]
    fn token_slot_roundtrip() {
        let slot = TokenSlot::default();
        assert!(slot.get().is_none());
        slot.set(Some("abc".into()));
        assert_eq!(slot.get().as_deref(), Some("abc"));
        slot.set(None);
        assert!(slot.get().is_none());
    }
}
