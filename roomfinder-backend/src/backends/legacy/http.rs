//! Legacy request helpers

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::http_client::HttpUtils;
use crate::traits::{BackendErrorMapper, ErrorContext, RawApiError};

use super::{LegacyBackend, LegacyEnvelope};

impl LegacyBackend {
    /// POST to `<base>/<endpoint>` once and check the envelope.
    pub(crate) async fn call<B: Serialize>(
        &self,
        endpoint: &str,
        body: &B,
        ctx: ErrorContext,
    ) -> Result<LegacyEnvelope> {
        let payload = serde_json::to_string(body).map_err(|e| self.serialization_error(e))?;
        log::debug!("[{}] Request Body: {payload}", self.backend_name());

        let url = format!("{}/{endpoint}", self.base_url);
        let request = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .body(payload);

        let (status, response_text) =
            HttpUtils::execute_request(request, self.backend_name(), "POST", endpoint).await?;

        if !(200..300).contains(&status) {
            // PHP fatals come back as HTML, not an envelope
            let envelope = serde_json::from_str::<LegacyEnvelope>(&response_text).ok();
            let message = envelope.map_or_else(|| format!("HTTP {status}"), |e| e.response_msg);
            return Err(self.map_error(RawApiError::with_code(status.to_string(), message), ctx));
        }

        let envelope: LegacyEnvelope = HttpUtils::parse_json(&response_text, self.backend_name())?;
        if !envelope.is_success() {
            log::warn!(
                "[{}] {endpoint} failed: {} {}",
                self.backend_name(),
                envelope.response_code,
                envelope.response_msg
            );
            let code = if envelope.response_code.is_empty() {
                status.to_string()
            } else {
                envelope.response_code
            };
            return Err(self.map_error(RawApiError::with_code(code, envelope.response_msg), ctx));
        }
        Ok(envelope)
    }

    /// Take the payload stored under `key`.
    pub(crate) fn payload<T: DeserializeOwned>(
        &self,
        envelope: &mut LegacyEnvelope,
        key: &str,
    ) -> Result<T> {
        let value = envelope
            .payload
            .remove(key)
            .ok_or_else(|| self.parse_error(format!("Missing '{key}' in response")))?;
        serde_json::from_value(value).map_err(|e| self.parse_error(e))
    }

    /// Take a list payload; a missing key or `null` means an empty list.
    pub(crate) fn payload_list<T: DeserializeOwned>(
        &self,
        envelope: &mut LegacyEnvelope,
        key: &str,
    ) -> Result<Vec<T>> {
        match envelope.payload.remove(key) {
            None | Some(serde_json::Value::Null) => Ok(Vec::new()),
            Some(value) => serde_json::from_value(value).map_err(|e| self.parse_error(e)),
        }
    }

    /// Resolve a relative image path against the asset host.
    pub(crate) fn asset_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!("{}/{}", self.asset_base_url, path.trim_start_matches('/'))
        }
    }
}
