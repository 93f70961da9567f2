//! # roomfinder-backend
//!
//! Client abstraction over the two remote APIs of the RoomFinder property
//! booking marketplace.
//!
//! ## Backends
//!
//! | Backend | Feature Flag | Envelope | Capabilities |
//! |---------|-------------|----------|--------------|
//! | [`RestBackend`] | `rest` | `{success, data, message}` | auth, listings, host listings, bookings, payments, onboarding, payouts, content, support |
//! | [`LegacyBackend`] | `legacy` | `{Result, ResponseCode, ResponseMsg}` | listings, favourites, reviews, notifications |
//!
//! Both implement [`MarketplaceBackend`]. Operations outside a backend's
//! advertised [`Capability`] set return [`BackendError::Unsupported`].
//!
//! ## Feature Flags
//!
//! - **`all-backends`** *(default)*: Enable both backends.
//! - **`rest`** / **`legacy`**: Enable one backend only.
//! - **`native-tls`** *(default)* / **`rustls`**: TLS implementation used by `reqwest`.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use roomfinder_backend::{create_backend, BackendConfig, PropertySearchParams};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let backend = create_backend(BackendConfig::Rest {
//!         base_url: "http://localhost:5000/api".to_string(),
//!     })?;
//!
//!     let params = PropertySearchParams {
//!         city: Some("Douala".to_string()),
//!         ..Default::default()
//!     };
//!     let page = backend.search_properties(&params).await?;
//!     for property in &page.items {
//!         println!("{} - {} XAF/night", property.title, property.price_per_night);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Every operation returns [`Result<T, BackendError>`](BackendError). Transient
//! errors (`NetworkError`, `Timeout`, `RateLimited`) are retried with
//! exponential backoff for idempotent requests only; booking creation and
//! other `POST`s are sent exactly once.

mod backends;
mod error;
mod factory;
mod http_client;
mod traits;
mod types;
mod utils;

pub use error::{BackendError, Result};

pub use factory::create_backend;

pub use traits::MarketplaceBackend;

pub use types::{
    Article, ArticleDraft, ArticleKind, ArticleQueryParams, ArticleStatus, AuthSession,
    BackendConfig, BackendKind, BackendMetadata, Booking, BookingStatus, Capability,
    CreateBookingRequest, CreatePayoutRequest, CreateReviewRequest, CreateTicketRequest,
    HostOnboardingRequest, HostProfile, LoginRequest, MobileMoneyProvider, Notification,
    PaginatedResponse, PaginationParams, PaymentStatus, PaymentVerification, PayoutBreakdown,
    PayoutDetails, PayoutEligibility, PayoutRequest, PayoutStatus, Property, PropertyDraft,
    PropertySearchParams, PropertyType, RegisterRequest, Review, SupportTicket, TicketMessage,
    TicketPriority, TicketStatus, User, UserRole, VerificationStatus,
};

pub use utils::{datetime, log_sanitizer};

#[cfg(feature = "rest")]
pub use backends::{RestBackend, RestBackendBuilder};

#[cfg(feature = "legacy")]
pub use backends::{LegacyBackend, LegacyBackendBuilder};
