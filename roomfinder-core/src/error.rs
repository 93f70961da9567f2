//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

// Re-export library error type
pub use roomfinder_backend::BackendError;
use roomfinder_backend::Capability;

use crate::booking::BookingStep;
use crate::validation::FieldErrors;

/// Core layer error type
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// Form validation failed (field level)
    #[error("Validation failed: {0}")]
    InvalidInput(FieldErrors),

    /// Validation error not tied to a single field
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Booking step machine refused a transition
    #[error("Cannot {action} from the {from} step")]
    InvalidTransition { from: BookingStep, action: String },

    /// Operation requires a signed-in user
    #[error("Not signed in")]
    NotAuthenticated,

    /// No registered backend advertises the capability
    #[error("No backend provides {0}")]
    CapabilityUnavailable(Capability),

    /// Operator reported `FAILED`
    #[error("Payment failed: {0}")]
    PaymentFailed(String),

    /// Operator reported `EXPIRED`
    #[error("Payment expired")]
    PaymentExpired,

    /// Polling ceiling reached without a terminal status
    #[error("Payment verification timed out after {attempts} attempts")]
    PaymentTimeout { attempts: u32 },

    /// The owning handle or session went away
    #[error("Operation cancelled")]
    Cancelled,

    /// A background task panicked
    #[error("Background task failed: {0}")]
    TaskFailed(String),

    /// Session storage error
    #[error("Storage error: {0}")]
    StorageError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Backend error (converting from library)
    #[error("{0}")]
    Backend(#[from] BackendError),
}

impl CoreError {
    /// Whether it is expected behavior (user input, resource does not exist, etc.), used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    /// **Please update this method when new variants are added.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::InvalidInput(_)
            | Self::ValidationError(_)
            | Self::InvalidTransition { .. }
            | Self::NotAuthenticated
            | Self::PaymentFailed(_)
            | Self::PaymentExpired
            | Self::PaymentTimeout { .. }
            | Self::Cancelled => true,
            Self::Backend(e) => e.is_expected(),
            _ => false,
        }
    }

    /// The single message shown to the user for this failure.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidInput(errors) => errors
                .first_message()
                .unwrap_or("Please correct the highlighted fields.")
                .to_string(),
            Self::ValidationError(msg) => msg.clone(),
            Self::InvalidTransition { .. } => "This action is not available right now.".to_string(),
            Self::NotAuthenticated => "Please sign in to continue.".to_string(),
            Self::CapabilityUnavailable(_) => "This feature is currently unavailable.".to_string(),
            Self::PaymentFailed(_) => {
                "Payment failed. Please try again or use another number.".to_string()
            }
            Self::PaymentExpired => {
                "The payment request expired before it was approved. Please try again.".to_string()
            }
            Self::PaymentTimeout { .. } => "Payment verification timeout. If you approved the \
                                            payment, check your bookings in a few minutes."
                .to_string(),
            Self::Cancelled => "The operation was cancelled.".to_string(),
            Self::StorageError(_) | Self::ConfigError(_) | Self::TaskFailed(_) => {
                "Something went wrong. Please try again.".to_string()
            }
            Self::Backend(e) => backend_message(e),
        }
    }
}

fn backend_message(err: &BackendError) -> String {
    match err {
        BackendError::NetworkError { .. } | BackendError::Timeout { .. } => {
            "Network error. Check your connection and try again.".to_string()
        }
        BackendError::RateLimited { .. } => "Too many requests. Please wait a moment.".to_string(),
        BackendError::Unauthorized { .. } => {
            "Your session has expired. Please sign in again.".to_string()
        }
        BackendError::Forbidden { .. } => "You don't have permission to do this.".to_string(),
        BackendError::NotFound { resource, .. } => {
            let mut name = resource.clone();
            if let Some(first) = name.get_mut(..1) {
                first.make_ascii_uppercase();
            }
            format!("{name} not found.")
        }
        BackendError::InvalidParameter { detail, .. } => detail.clone(),
        BackendError::Rejected { message, .. } if !message.is_empty() => message.clone(),
        BackendError::Unsupported { .. } => "This feature is currently unavailable.".to_string(),
        _ => "Something went wrong. Please try again.".to_string(),
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;
