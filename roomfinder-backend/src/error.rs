use serde::{Deserialize, Serialize};

/// Unified error type for all marketplace backend operations.
///
/// Each variant carries a `backend` field identifying which backend produced the
/// error, plus variant-specific context. All variants are serializable so a
/// front end can render them without string matching.
///
/// Transport failures ([`NetworkError`](Self::NetworkError),
/// [`Timeout`](Self::Timeout), [`RateLimited`](Self::RateLimited)) are
/// reported after a single attempt. Nothing in this crate resends a request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum BackendError {
    /// A network-level error occurred (DNS resolution failure, connection refused, 5xx gateway).
    NetworkError {
        /// Backend that produced the error.
        backend: String,
        /// Error details.
        detail: String,
    },

    /// The HTTP request timed out.
    Timeout {
        /// Backend that produced the error.
        backend: String,
        /// Error details.
        detail: String,
    },

    /// The API rate limit has been exceeded (HTTP 429).
    RateLimited {
        /// Backend that produced the error.
        backend: String,
        /// Suggested wait time in seconds before retrying, if provided by the API.
        retry_after: Option<u64>,
        /// Original error message from the API, if available.
        raw_message: Option<String>,
    },

    /// The request carried no token, or the token is invalid or expired.
    Unauthorized {
        /// Backend that produced the error.
        backend: String,
        /// Original error message from the API, if available.
        raw_message: Option<String>,
    },

    /// The signed-in user lacks permission for the operation (e.g. non-admin on admin routes).
    Forbidden {
        /// Backend that produced the error.
        backend: String,
        /// Original error message from the API, if available.
        raw_message: Option<String>,
    },

    /// The requested resource does not exist.
    NotFound {
        /// Backend that produced the error.
        backend: String,
        /// Resource kind (`"property"`, `"booking"`, ...).
        resource: String,
        /// Identifier that was looked up.
        id: String,
        /// Original error message from the API, if available.
        raw_message: Option<String>,
    },

    /// A request parameter was rejected by the server.
    InvalidParameter {
        /// Backend that produced the error.
        backend: String,
        /// Name of the invalid parameter.
        param: String,
        /// Description of what's wrong.
        detail: String,
    },

    /// The server answered with a non-success envelope that maps to no specific variant.
    ///
    /// `message` is the server's user-facing text (`message` / `ResponseMsg`).
    Rejected {
        /// Backend that produced the error.
        backend: String,
        /// User-facing message returned by the server.
        message: String,
    },

    /// Failed to parse the API response.
    ParseError {
        /// Backend that produced the error.
        backend: String,
        /// Details about the parse failure.
        detail: String,
    },

    /// Failed to serialize a request body.
    SerializationError {
        /// Backend that produced the error.
        backend: String,
        /// Details about the serialization failure.
        detail: String,
    },

    /// The backend does not implement the requested operation.
    Unsupported {
        /// Backend that produced the error.
        backend: String,
        /// Operation name.
        operation: String,
    },

    /// An unrecognized error from the API.
    Unknown {
        /// Backend that produced the error.
        backend: String,
        /// Raw error code from the API (HTTP status or `ResponseCode`), if available.
        raw_code: Option<String>,
        /// Raw error message from the API.
        raw_message: String,
    },
}

impl BackendError {
    /// Whether the error is expected behavior (user input, missing resource, ...).
    ///
    /// Used for log levels: `true` → `warn`, `false` → `error`.
    /// **Keep in sync when adding variants.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::Unauthorized { .. }
                | Self::Forbidden { .. }
                | Self::NotFound { .. }
                | Self::InvalidParameter { .. }
                | Self::Rejected { .. }
                | Self::Unsupported { .. }
        )
    }

    /// Name of the backend that produced the error.
    #[must_use]
    pub fn backend(&self) -> &str {
        match self {
            Self::NetworkError { backend, .. }
            | Self::Timeout { backend, .. }
            | Self::RateLimited { backend, .. }
            | Self::Unauthorized { backend, .. }
            | Self::Forbidden { backend, .. }
            | Self::NotFound { backend, .. }
            | Self::InvalidParameter { backend, .. }
            | Self::Rejected { backend, .. }
            | Self::ParseError { backend, .. }
            | Self::SerializationError { backend, .. }
            | Self::Unsupported { backend, .. }
            | Self::Unknown { backend, .. } => backend,
        }
    }
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NetworkError { backend, detail } => {
                write!(f, "[{backend}] Network error: {detail}")
            }
            Self::Timeout { backend, detail } => {
                write!(f, "[{backend}] Request timeout: {detail}")
            }
            Self::RateLimited {
                backend,
                retry_after,
                ..
            } => {
                if let Some(secs) = retry_after {
                    write!(f, "[{backend}] Rate limited (retry after {secs}s)")
                } else {
                    write!(f, "[{backend}] Rate limited")
                }
            }
            Self::Unauthorized {
                backend,
                raw_message,
            } => {
                if let Some(msg) = raw_message {
                    write!(f, "[{backend}] Unauthorized: {msg}")
                } else {
                    write!(f, "[{backend}] Unauthorized")
                }
            }
            Self::Forbidden {
                backend,
                raw_message,
            } => {
                if let Some(msg) = raw_message {
                    write!(f, "[{backend}] Forbidden: {msg}")
                } else {
                    write!(f, "[{backend}] Forbidden")
                }
            }
            Self::NotFound {
                backend,
                resource,
                id,
                ..
            } => {
                write!(f, "[{backend}] {resource} '{id}' not found")
            }
            Self::InvalidParameter {
                backend,
                param,
                detail,
            } => {
                write!(f, "[{backend}] Invalid parameter '{param}': {detail}")
            }
            Self::Rejected { backend, message } => {
                write!(f, "[{backend}] {message}")
            }
            Self::ParseError { backend, detail } => {
                write!(f, "[{backend}] Parse error: {detail}")
            }
            Self::SerializationError { backend, detail } => {
                write!(f, "[{backend}] Serialization error: {detail}")
            }
            Self::Unsupported { backend, operation } => {
                write!(f, "[{backend}] Operation not supported: {operation}")
            }
            Self::Unknown {
                backend,
                raw_message,
                ..
            } => {
                write!(f, "[{backend}] {raw_message}")
            }
        }
    }
}

impl std::error::Error for BackendError {}

/// Convenience type alias for `Result<T, BackendError>`.
pub type Result<T> = std::result::Result<T, BackendError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_network_error() {
        let e = BackendError::NetworkError {
            backend: "rest".to_string(),
            detail: "connection refused".to_string(),
        };
        assert_eq!(e.to_string(), "[rest] Network error: connection refused");
    }

    #[test]
    fn display_unauthorized_with_message() {
        let e = BackendError::Unauthorized {
            backend: "rest".to_string(),
            raw_message: Some("jwt expired".to_string()),
        };
        assert_eq!(e.to_string(), "[rest] Unauthorized: jwt expired");
    }

    #[test]
    fn display_unauthorized_without_message() {
        let e = BackendError::Unauthorized {
            backend: "legacy".to_string(),
            raw_message: None,
        };
        assert_eq!(e.to_string(), "[legacy] Unauthorized");
    }

    #[test]
    fn display_not_found() {
        let e = BackendError::NotFound {
            backend: "rest".to_string(),
            resource: "booking".to_string(),
            id: "bk_42".to_string(),
            raw_message: None,
        };
        assert_eq!(e.to_string(), "[rest] booking 'bk_42' not found");
    }

    #[test]
    fn display_rejected_is_server_message() {
        let e = BackendError::Rejected {
            backend: "legacy".to_string(),
            message: "Property already in favourites".to_string(),
        };
        assert_eq!(e.to_string(), "[legacy] Property already in favourites");
    }

    #[test]
    fn display_rate_limited_with_retry() {
        let e = BackendError::RateLimited {
            backend: "rest".to_string(),
            retry_after: Some(30),
            raw_message: None,
        };
        assert_eq!(e.to_string(), "[rest] Rate limited (retry after 30s)");
    }

    #[test]
    fn display_unsupported() {
        let e = BackendError::Unsupported {
            backend: "legacy".to_string(),
            operation: "create_booking".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "[legacy] Operation not supported: create_booking"
        );
    }

    #[test]
    fn serialize_uses_code_tag() {
        let e = BackendError::RateLimited {
            backend: "rest".to_string(),
            retry_after: Some(60),
            raw_message: Some("too many requests".to_string()),
        };
        let json = serde_json::to_string(&e).unwrap();
        assert!(json.contains("\"code\":\"RateLimited\""));
        assert!(json.contains("\"retry_after\":60"));
    }

    #[test]
    fn deserialize_restores_display() {
        let original = BackendError::InvalidParameter {
            backend: "rest".to_string(),
            param: "phone".to_string(),
            detail: "must be a Cameroonian number".to_string(),
        };
        let json = serde_json::to_string(&original).unwrap();
        let back: BackendError = serde_json::from_str(&json).unwrap();
        assert_eq!(back.to_string(), original.to_string());
    }

    #[test]
    fn expected_errors_are_user_facing() {
        assert!(
            BackendError::NotFound {
                backend: "t".into(),
                resource: "property".into(),
                id: "1".into(),
                raw_message: None,
            }
            .is_expected()
        );
        assert!(
            !BackendError::NetworkError {
                backend: "t".into(),
                detail: "x".into(),
            }
            .is_expected()
        );
    }

    #[test]
    fn backend_accessor() {
        let e = BackendError::Unknown {
            backend: "legacy".into(),
            raw_code: Some("500".into()),
            raw_message: "oops".into(),
        };
        assert_eq!(e.backend(), "legacy");
    }
}
