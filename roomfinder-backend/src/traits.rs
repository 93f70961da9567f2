use async_trait::async_trait;

use crate::error::{BackendError, Result};
use crate::types::{
    Article, ArticleDraft, ArticleKind, ArticleQueryParams, AuthSession, BackendMetadata, Booking,
    CreateBookingRequest, CreatePayoutRequest, CreateReviewRequest, CreateTicketRequest,
    HostOnboardingRequest, HostProfile, LoginRequest, Notification, PaginatedResponse,
    PaginationParams, PaymentVerification, PayoutEligibility, PayoutRequest, Property,
    PropertyDraft, PropertySearchParams, RegisterRequest, Review, SupportTicket, TicketStatus,
    User,
};

/// Raw API error (internal).
#[derive(Debug, Clone)]
pub(crate) struct RawApiError {
    /// Error code (HTTP status for REST, `ResponseCode` for legacy).
    pub code: Option<String>,
    /// Original error message.
    pub message: String,
}

impl RawApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
        }
    }
}

/// Extra information for error mapping (internal).
#[derive(Debug, Clone, Default)]
pub(crate) struct ErrorContext {
    /// Resource kind (`"property"`, `"booking"`, ...) for `NotFound`.
    pub resource: Option<&'static str>,
    /// Identifier that was looked up.
    pub id: Option<String>,
    /// Offending field reported by the server, for `InvalidParameter`.
    pub param: Option<String>,
}

impl ErrorContext {
    pub fn resource(resource: &'static str, id: impl Into<String>) -> Self {
        Self {
            resource: Some(resource),
            id: Some(id.into()),
            param: None,
        }
    }
}

/// Maps raw API errors onto [`BackendError`] (internal).
pub(crate) trait BackendErrorMapper {
    /// Backend identifier.
    fn backend_name(&self) -> &'static str;

    /// Map a raw API error to the unified error type.
    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> BackendError;

    /// Shortcut: parse error.
    fn parse_error(&self, detail: impl ToString) -> BackendError {
        BackendError::ParseError {
            backend: self.backend_name().to_string(),
            detail: detail.to_string(),
        }
    }

    /// Shortcut: request body serialization error.
    fn serialization_error(&self, detail: impl ToString) -> BackendError {
        BackendError::SerializationError {
            backend: self.backend_name().to_string(),
            detail: detail.to_string(),
        }
    }

    /// Shortcut: unknown error (fallback).
    fn unknown_error(&self, raw: RawApiError) -> BackendError {
        BackendError::Unknown {
            backend: self.backend_name().to_string(),
            raw_code: raw.code,
            raw_message: raw.message,
        }
    }
}

/// A remote marketplace API.
///
/// Every operation the client can perform is declared here. Implementations
/// override the operations covered by the capabilities they advertise in
/// [`metadata`](Self::metadata); the remaining ones keep the default body and
/// fail with [`BackendError::Unsupported`].
#[async_trait]
pub trait MarketplaceBackend: Send + Sync {
    /// Backend identifier (`"rest"`, `"legacy"`).
    fn id(&self) -> &'static str;

    /// Backend metadata, including advertised capabilities.
    fn metadata(&self) -> BackendMetadata;

    /// Replace the bearer token sent with authenticated requests.
    ///
    /// `None` signs the backend out.
    fn set_auth_token(&self, token: Option<String>);

    /// Error returned by operations this backend does not implement.
    fn unsupported(&self, operation: &str) -> BackendError {
        BackendError::Unsupported {
            backend: self.id().to_string(),
            operation: operation.to_string(),
        }
    }

    // ---- Auth ----

    /// Sign in with email and password.
    async fn login(&self, _req: &LoginRequest) -> Result<AuthSession> {
        Err(self.unsupported("login"))
    }

    /// Create an account and sign in.
    async fn register(&self, _req: &RegisterRequest) -> Result<AuthSession> {
        Err(self.unsupported("register"))
    }

    /// Profile of the signed-in user.
    async fn current_user(&self) -> Result<User> {
        Err(self.unsupported("current_user"))
    }

    // ---- Listings ----

    /// Search public listings.
    async fn search_properties(
        &self,
        _params: &PropertySearchParams,
    ) -> Result<PaginatedResponse<Property>> {
        Err(self.unsupported("search_properties"))
    }

    /// Listing details.
    async fn get_property(&self, _property_id: &str) -> Result<Property> {
        Err(self.unsupported("get_property"))
    }

    // ---- Host listings ----

    /// Listings owned by the signed-in host.
    async fn list_host_properties(
        &self,
        _params: &PaginationParams,
    ) -> Result<PaginatedResponse<Property>> {
        Err(self.unsupported("list_host_properties"))
    }

    /// Publish a new listing.
    async fn create_property(&self, _draft: &PropertyDraft) -> Result<Property> {
        Err(self.unsupported("create_property"))
    }

    /// Replace a listing's attributes.
    async fn update_property(&self, _property_id: &str, _draft: &PropertyDraft) -> Result<Property> {
        Err(self.unsupported("update_property"))
    }

    /// Remove a listing.
    async fn delete_property(&self, _property_id: &str) -> Result<()> {
        Err(self.unsupported("delete_property"))
    }

    // ---- Bookings & payments ----

    /// Create a booking and trigger the mobile-money prompt.
    ///
    /// Not idempotent; sent exactly once.
    async fn create_booking(&self, _req: &CreateBookingRequest) -> Result<Booking> {
        Err(self.unsupported("create_booking"))
    }

    /// Bookings of the signed-in user.
    async fn list_bookings(&self, _params: &PaginationParams) -> Result<PaginatedResponse<Booking>> {
        Err(self.unsupported("list_bookings"))
    }

    /// Booking details.
    async fn get_booking(&self, _booking_id: &str) -> Result<Booking> {
        Err(self.unsupported("get_booking"))
    }

    /// Cancel a booking.
    async fn cancel_booking(&self, _booking_id: &str) -> Result<Booking> {
        Err(self.unsupported("cancel_booking"))
    }

    /// Ask the server for the current payment status of a booking.
    async fn verify_payment(&self, _booking_id: &str) -> Result<PaymentVerification> {
        Err(self.unsupported("verify_payment"))
    }

    // ---- Host onboarding ----

    /// Host profile of the signed-in user.
    async fn get_host_profile(&self) -> Result<HostProfile> {
        Err(self.unsupported("get_host_profile"))
    }

    /// Send the host onboarding form.
    async fn submit_host_onboarding(&self, _req: &HostOnboardingRequest) -> Result<HostProfile> {
        Err(self.unsupported("submit_host_onboarding"))
    }

    // ---- Payouts ----

    /// Withdrawable balance of the signed-in host.
    async fn get_payout_eligibility(&self) -> Result<PayoutEligibility> {
        Err(self.unsupported("get_payout_eligibility"))
    }

    /// Request a payout.
    async fn request_payout(&self, _req: &CreatePayoutRequest) -> Result<PayoutRequest> {
        Err(self.unsupported("request_payout"))
    }

    /// Payout history.
    async fn list_payouts(
        &self,
        _params: &PaginationParams,
    ) -> Result<PaginatedResponse<PayoutRequest>> {
        Err(self.unsupported("list_payouts"))
    }

    // ---- Content ----

    /// List blog posts or help articles.
    async fn list_articles(
        &self,
        _kind: ArticleKind,
        _params: &ArticleQueryParams,
    ) -> Result<PaginatedResponse<Article>> {
        Err(self.unsupported("list_articles"))
    }

    /// Fetch an article by slug.
    async fn get_article(&self, _kind: ArticleKind, _slug: &str) -> Result<Article> {
        Err(self.unsupported("get_article"))
    }

    /// Create an article (admin).
    async fn create_article(&self, _kind: ArticleKind, _draft: &ArticleDraft) -> Result<Article> {
        Err(self.unsupported("create_article"))
    }

    /// Update an article (admin).
    async fn update_article(
        &self,
        _kind: ArticleKind,
        _article_id: &str,
        _draft: &ArticleDraft,
    ) -> Result<Article> {
        Err(self.unsupported("update_article"))
    }

    /// Delete an article (admin).
    async fn delete_article(&self, _kind: ArticleKind, _article_id: &str) -> Result<()> {
        Err(self.unsupported("delete_article"))
    }

    // ---- Support ----

    /// Tickets of the signed-in user.
    async fn list_tickets(
        &self,
        _params: &PaginationParams,
    ) -> Result<PaginatedResponse<SupportTicket>> {
        Err(self.unsupported("list_tickets"))
    }

    /// Ticket with its thread.
    async fn get_ticket(&self, _ticket_id: &str) -> Result<SupportTicket> {
        Err(self.unsupported("get_ticket"))
    }

    /// Open a ticket.
    async fn create_ticket(&self, _req: &CreateTicketRequest) -> Result<SupportTicket> {
        Err(self.unsupported("create_ticket"))
    }

    /// Append a reply to a ticket thread.
    async fn reply_to_ticket(&self, _ticket_id: &str, _message: &str) -> Result<SupportTicket> {
        Err(self.unsupported("reply_to_ticket"))
    }

    /// Change a ticket's status (staff).
    async fn update_ticket_status(
        &self,
        _ticket_id: &str,
        _status: TicketStatus,
    ) -> Result<SupportTicket> {
        Err(self.unsupported("update_ticket_status"))
    }

    // ---- Favorites ----

    /// Saved listings of a user.
    async fn list_favorites(&self, _user_id: &str) -> Result<Vec<Property>> {
        Err(self.unsupported("list_favorites"))
    }

    /// Save or unsave a listing. Returns whether it is saved afterwards.
    async fn toggle_favorite(&self, _user_id: &str, _property_id: &str) -> Result<bool> {
        Err(self.unsupported("toggle_favorite"))
    }

    // ---- Reviews ----

    /// Reviews of a listing, newest first.
    async fn list_reviews(&self, _property_id: &str) -> Result<Vec<Review>> {
        Err(self.unsupported("list_reviews"))
    }

    /// Post a review.
    async fn create_review(&self, _req: &CreateReviewRequest) -> Result<()> {
        Err(self.unsupported("create_review"))
    }

    // ---- Notifications ----

    /// Notifications of a user.
    async fn list_notifications(&self, _user_id: &str) -> Result<Vec<Notification>> {
        Err(self.unsupported("list_notifications"))
    }

    /// Mark one notification as read.
    async fn mark_notification_read(&self, _user_id: &str, _notification_id: &str) -> Result<()> {
        Err(self.unsupported("mark_notification_read"))
    }
}
