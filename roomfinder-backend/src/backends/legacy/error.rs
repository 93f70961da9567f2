//! Legacy error mapping
//!
//! The PHP API answers HTTP 200 for almost everything and reports failures via
//! `Result: "false"` plus a `ResponseCode`. Most failures carry a message meant
//! for the end user, so they become `Rejected`.

use crate::error::BackendError;
use crate::traits::{BackendErrorMapper, ErrorContext, RawApiError};

use super::{BACKEND_NAME, LegacyBackend};

impl BackendErrorMapper for LegacyBackend {
    fn backend_name(&self) -> &'static str {
        BACKEND_NAME
    }

    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> BackendError {
        let backend = self.backend_name().to_string();
        match raw.code.as_deref() {
            Some("401") => BackendError::Unauthorized {
                backend,
                raw_message: Some(raw.message),
            },
            Some("404") => BackendError::NotFound {
                backend,
                resource: context.resource.unwrap_or("resource").to_string(),
                id: context.id.unwrap_or_default(),
                raw_message: Some(raw.message),
            },
            Some("500") => self.unknown_error(raw),
            _ if raw.message.is_empty() => self.unknown_error(raw),
            _ => BackendError::Rejected {
                backend,
                message: raw.message,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend() -> LegacyBackend {
        LegacyBackend::new("https://cpanel.roomfinder237.com/user_api").unwrap()
    }

    #[test]
    fn soft_failure_is_rejected_with_message() {
        let e = backend().map_error(
            RawApiError::with_code("200", "Review already submitted"),
            ErrorContext::default(),
        );
        assert!(matches!(e, BackendError::Rejected { ref message, .. } if message == "Review already submitted"));
    }

    #[test]
    fn missing_property() {
        let e = backend().map_error(
            RawApiError::with_code("404", "Property Not Found"),
            ErrorContext::resource("property", "77"),
        );
        assert_eq!(e.to_string(), "[legacy] property '77' not found");
    }

    #[test]
    fn empty_message_is_unknown() {
        let e = backend().map_error(RawApiError::with_code("200", ""), ErrorContext::default());
        assert!(matches!(e, BackendError::Unknown { .. }));
    }
}
