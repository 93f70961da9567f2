//! REST error mapping
//!
//! The REST API reports failures through HTTP status codes; `raw.code` carries
//! the status as a string.

use crate::error::BackendError;
use crate::traits::{BackendErrorMapper, ErrorContext, RawApiError};

use super::{BACKEND_NAME, RestBackend};

impl BackendErrorMapper for RestBackend {
    fn backend_name(&self) -> &'static str {
        BACKEND_NAME
    }

    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> BackendError {
        let backend = self.backend_name().to_string();
        let message = (!raw.message.is_empty()).then(|| raw.message.clone());

        match raw.code.as_deref() {
            Some("401") => BackendError::Unauthorized {
                backend,
                raw_message: message,
            },
            Some("403") => BackendError::Forbidden {
                backend,
                raw_message: message,
            },
            Some("404") => BackendError::NotFound {
                backend,
                resource: context.resource.unwrap_or("resource").to_string(),
                id: context.id.unwrap_or_default(),
                raw_message: message,
            },
            Some("400" | "409" | "422") => match context.param {
                Some(param) => BackendError::InvalidParameter {
                    backend,
                    param,
                    detail: raw.message,
                },
                None => BackendError::Rejected {
                    backend,
                    message: message.unwrap_or_else(|| "Request rejected".to_string()),
                },
            },
            // 2xx with `success: false`
            Some(code) if code.starts_with('2') => BackendError::Rejected {
                backend,
                message: message.unwrap_or_else(|| "Request rejected".to_string()),
            },
            _ => self.unknown_error(raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend() -> RestBackend {
        RestBackend::new("http://localhost:5000/api").unwrap()
    }

    #[test]
    fn maps_auth_statuses() {
        let b = backend();
        let e = b.map_error(
            RawApiError::with_code("401", "jwt expired"),
            ErrorContext::default(),
        );
        assert!(matches!(e, BackendError::Unauthorized { .. }));
        let e = b.map_error(RawApiError::with_code("403", "admins only"), ErrorContext::default());
        assert!(matches!(e, BackendError::Forbidden { .. }));
    }

    #[test]
    fn not_found_uses_context() {
        let e = backend().map_error(
            RawApiError::with_code("404", "Booking not found"),
            ErrorContext::resource("booking", "bk_9"),
        );
        assert_eq!(e.to_string(), "[rest] booking 'bk_9' not found");
    }

    #[test]
    fn validation_with_field_is_invalid_parameter() {
        let ctx = ErrorContext {
            param: Some("phone".into()),
            ..ErrorContext::default()
        };
        let e = backend().map_error(RawApiError::with_code("422", "Invalid phone"), ctx);
        assert!(matches!(e, BackendError::InvalidParameter { ref param, .. } if param == "phone"));
    }

    #[test]
    fn business_failure_is_rejected() {
        let e = backend().map_error(
            RawApiError::with_code("200", "Property not available for these dates"),
            ErrorContext::default(),
        );
        assert_eq!(
            e.to_string(),
            "[rest] Property not available for these dates"
        );
    }

    #[test]
    fn server_error_is_unknown() {
        let e = backend().map_error(
            RawApiError::with_code("500", "boom"),
            ErrorContext::default(),
        );
        assert!(matches!(e, BackendError::Unknown { .. }));
    }
}
