//! Shared HTTP request handling
//!
//! Each backend builds its own `RequestBuilder` (URL, headers, auth, body);
//! this module sends it once, logs it, and turns transport failures and
//! gateway statuses into [`BackendError`]. Nothing is resent: a failed call
//! surfaces to the caller, and the payment poller is the only loop that
//! repeats a request.

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;

use crate::error::BackendError;
use crate::utils::log_sanitizer::truncate_for_log;

/// HTTP helper functions.
pub struct HttpUtils;

impl HttpUtils {
    /// Send a request and return `(status, body)`.
    ///
    /// HTTP 429 becomes [`BackendError::RateLimited`] and 502/503/504 become
    /// [`BackendError::NetworkError`]; every other status is returned to the
    /// caller for envelope parsing.
    pub async fn execute_request(
        request_builder: RequestBuilder,
        backend_name: &str,
        method_name: &str,
        path: &str,
    ) -> Result<(u16, String), BackendError> {
        log::debug!("[{backend_name}] {method_name} {path}");

        let response = request_builder.send().await.map_err(|e| {
            if e.is_timeout() {
                BackendError::Timeout {
                    backend: backend_name.to_string(),
                    detail: e.to_string(),
                }
            } else {
                BackendError::NetworkError {
                    backend: backend_name.to_string(),
                    detail: e.to_string(),
                }
            }
        })?;

        let status_code = response.status().as_u16();
        log::debug!("[{backend_name}] Response Status: {status_code}");

        let retry_after = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());

        if status_code == 429 {
            let body = response.text().await.unwrap_or_default();
            log::warn!("[{backend_name}] Rate limited (HTTP 429), retry_after={retry_after:?}");
            return Err(BackendError::RateLimited {
                backend: backend_name.to_string(),
                retry_after,
                raw_message: (!body.is_empty()).then_some(body),
            });
        }

        if matches!(status_code, 502..=504) {
            let body = response.text().await.unwrap_or_default();
            log::warn!("[{backend_name}] Gateway error (HTTP {status_code})");
            return Err(BackendError::NetworkError {
                backend: backend_name.to_string(),
                detail: format!("HTTP {status_code}: {}", truncate_for_log(&body)),
            });
        }

        let response_text = response
            .text()
            .await
            .map_err(|e| BackendError::NetworkError {
                backend: backend_name.to_string(),
                detail: format!("Failed to read response body: {e}"),
            })?;

        log::debug!(
            "[{backend_name}] Response Body: {}",
            truncate_for_log(&response_text)
        );

        Ok((status_code, response_text))
    }

    /// Deserialize a JSON body, logging the raw text on failure.
    pub fn parse_json<T>(response_text: &str, backend_name: &str) -> Result<T, BackendError>
    where
        T: DeserializeOwned,
    {
        serde_json::from_str(response_text).map_err(|e| {
            log::error!("[{backend_name}] JSON parse failed: {e}");
            log::error!(
                "[{backend_name}] Raw response: {}",
                truncate_for_log(response_text)
            );
            BackendError::ParseError {
                backend: backend_name.to_string(),
                detail: e.to_string(),
            }
        })
    }
}
