//! RoomFinder Core Business Logic Library
//!
//! Platform-independent services over the marketplace backends, the booking
//! step machine and the cancellable payment poller.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │   Front end (roomfinder-app / roomfinder-cli) │
//! └──────────────────────────┬───────────────────┘
//!                            │
//! ┌──────────────────────────▼───────────────────┐
//! │              roomfinder-core                  │
//! │   services · booking flow · validation        │
//! └──────────────────────────┬───────────────────┘
//!                            │ BackendRegistry
//! ┌──────────────────────────▼───────────────────┐
//! │     roomfinder-backend (REST / legacy PHP)    │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! The session store and the toast notifier are injected through
//! [`ServiceContext`], so front ends decide where sessions live and how
//! toasts are shown.

pub mod booking;
pub mod error;
pub mod services;
pub mod traits;
pub mod validation;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use booking::{
    BookingDraft, BookingFlow, BookingObserver, BookingSession, BookingStep, NoopObserver,
    PaymentPoller, PaymentTask, PollOutcome, PollingPolicy,
};
pub use error::{CoreError, CoreResult};
pub use services::ServiceContext;
pub use traits::{
    BackendRegistry, BroadcastNotifier, InMemoryBackendRegistry, InMemorySessionStore, Notifier,
    SessionStore, Toast, ToastLevel,
};
pub use validation::FieldErrors;

// Re-export backend library types
pub use roomfinder_backend::{
    Article, ArticleDraft, ArticleKind, ArticleQueryParams, AuthSession, BackendConfig,
    BackendError, BackendKind, Booking, BookingStatus, Capability, CreateTicketRequest,
    HostOnboardingRequest, HostProfile, MarketplaceBackend, MobileMoneyProvider, Notification,
    PaginatedResponse, PaginationParams, PaymentStatus, PayoutDetails, PayoutEligibility,
    PayoutRequest, Property, PropertyDraft, PropertySearchParams, PropertyType, RegisterRequest,
    Review, SupportTicket, TicketPriority, TicketStatus, User, UserRole, create_backend,
};
