//! `MarketplaceBackend` implementation for the REST API

use async_trait::async_trait;
use serde::Serialize;

use crate::backends::common::{build_query, encode_segment};
use crate::error::Result;
use crate::traits::{ErrorContext, MarketplaceBackend};
use crate::types::{
    Article, ArticleDraft, ArticleKind, ArticleQueryParams, AuthSession, BackendKind,
    BackendMetadata, Booking, CreateBookingRequest, CreatePayoutRequest, CreateTicketRequest,
    HostOnboardingRequest, HostProfile, LoginRequest, PaginatedResponse, PaginationParams,
    PaymentVerification, PayoutEligibility, PayoutRequest, Property, PropertyDraft,
    PropertySearchParams, RegisterRequest, SupportTicket, TicketStatus, User,
};

use super::{BACKEND_NAME, CAPABILITIES, RestBackend};

#[derive(Serialize)]
struct ReplyBody<'a> {
    message: &'a str,
}

#[derive(Serialize)]
struct StatusBody {
    status: TicketStatus,
}

impl RestBackend {
    fn search_path(params: &PropertySearchParams) -> String {
        let property_type = params
            .property_type
            .and_then(|t| serde_json::to_value(t).ok())
            .and_then(|v| v.as_str().map(str::to_string));
        let query = build_query(&[
            ("search", params.query.clone().filter(|q| !q.trim().is_empty())),
            ("city", params.city.clone()),
            ("minPrice", params.min_price.map(|p| p.to_string())),
            ("maxPrice", params.max_price.map(|p| p.to_string())),
            ("guests", params.guests.map(|g| g.to_string())),
            ("type", property_type),
        ]);
        format!("/properties{query}")
    }

    fn article_list_path(kind: ArticleKind, params: &ArticleQueryParams) -> String {
        let status = params
            .status
            .and_then(|s| serde_json::to_value(s).ok())
            .and_then(|v| v.as_str().map(str::to_string));
        // only the admin collection can filter by status
        let prefix = if status.is_some() { "/admin" } else { "" };
        let query = build_query(&[
            ("search", params.search.clone()),
            ("category", params.category.clone()),
            ("status", status),
        ]);
        format!("{prefix}/{}{query}", kind.path_segment())
    }
}

#[async_trait]
impl MarketplaceBackend for RestBackend {
    fn id(&self) -> &'static str {
        BACKEND_NAME
    }

    fn metadata(&self) -> BackendMetadata {
        BackendMetadata {
            kind: BackendKind::Rest,
            name: "RoomFinder API".to_string(),
            description: "JSON REST API: accounts, bookings, payments, host tools, content, support"
                .to_string(),
            capabilities: CAPABILITIES.to_vec(),
        }
    }

    fn set_auth_token(&self, token: Option<String>) {
        self.token.set(token);
    }

    // ---- Auth ----

    async fn login(&self, req: &LoginRequest) -> Result<AuthSession> {
        self.post("/auth/login", req, ErrorContext::default()).await
    }

    async fn register(&self, req: &RegisterRequest) -> Result<AuthSession> {
        self.post("/auth/register", req, ErrorContext::default())
            .await
    }

    async fn current_user(&self) -> Result<User> {
        self.get("/auth/me", ErrorContext::default()).await
    }

    // ---- Listings ----

    async fn search_properties(
        &self,
        params: &PropertySearchParams,
    ) -> Result<PaginatedResponse<Property>> {
        self.get_page(&Self::search_path(params), &params.to_pagination())
            .await
    }

    async fn get_property(&self, property_id: &str) -> Result<Property> {
        self.get(
            &format!("/properties/{}", encode_segment(property_id)),
            ErrorContext::resource("property", property_id),
        )
        .await
    }

    // ---- Host listings ----

    async fn list_host_properties(
        &self,
        params: &PaginationParams,
    ) -> Result<PaginatedResponse<Property>> {
        self.get_page("/host/properties", params).await
    }

    async fn create_property(&self, draft: &PropertyDraft) -> Result<Property> {
        self.post("/properties", draft, ErrorContext::default())
            .await
    }

    async fn update_property(&self, property_id: &str, draft: &PropertyDraft) -> Result<Property> {
        self.put(
            &format!("/properties/{}", encode_segment(property_id)),
            draft,
            ErrorContext::resource("property", property_id),
        )
        .await
    }

    async fn delete_property(&self, property_id: &str) -> Result<()> {
        self.delete(
            &format!("/properties/{}", encode_segment(property_id)),
            ErrorContext::resource("property", property_id),
        )
        .await
    }

    // ---- Bookings & payments ----

    async fn create_booking(&self, req: &CreateBookingRequest) -> Result<Booking> {
        log::info!(
            "[{BACKEND_NAME}] Creating booking for property {} ({} -> {})",
            req.property_id,
            req.check_in,
            req.check_out
        );
        self.post("/bookings", req, ErrorContext::resource("property", &req.property_id))
            .await
    }

    async fn list_bookings(&self, params: &PaginationParams) -> Result<PaginatedResponse<Booking>> {
        self.get_page("/bookings", params).await
    }

    async fn get_booking(&self, booking_id: &str) -> Result<Booking> {
        self.get(
            &format!("/bookings/{}", encode_segment(booking_id)),
            ErrorContext::resource("booking", booking_id),
        )
        .await
    }

    async fn cancel_booking(&self, booking_id: &str) -> Result<Booking> {
        self.post(
            &format!("/bookings/{}/cancel", encode_segment(booking_id)),
            &serde_json::json!({}),
            ErrorContext::resource("booking", booking_id),
        )
        .await
    }

    async fn verify_payment(&self, booking_id: &str) -> Result<PaymentVerification> {
        let mut verification: PaymentVerification = self
            .get(
                &format!("/bookings/{}/verify-payment", encode_segment(booking_id)),
                ErrorContext::resource("booking", booking_id),
            )
            .await?;
        if verification.booking_id.is_none() {
            verification.booking_id = Some(booking_id.to_string());
        }
        Ok(verification)
    }

    // ---- Host onboarding ----

    async fn get_host_profile(&self) -> Result<HostProfile> {
        self.get("/host/profile", ErrorContext::default()).await
    }

    async fn submit_host_onboarding(&self, req: &HostOnboardingRequest) -> Result<HostProfile> {
        self.post("/host/onboarding", req, ErrorContext::default())
            .await
    }

    // ---- Payouts ----

    async fn get_payout_eligibility(&self) -> Result<PayoutEligibility> {
        self.get("/payouts/eligibility", ErrorContext::default())
            .await
    }

    async fn request_payout(&self, req: &CreatePayoutRequest) -> Result<PayoutRequest> {
        self.post("/payouts", req, ErrorContext::default()).await
    }

    async fn list_payouts(
        &self,
        params: &PaginationParams,
    ) -> Result<PaginatedResponse<PayoutRequest>> {
        self.get_page("/payouts", params).await
    }

    // ---- Content ----

    async fn list_articles(
        &self,
        kind: ArticleKind,
        params: &ArticleQueryParams,
    ) -> Result<PaginatedResponse<Article>> {
        let pagination = PaginationParams {
            page: params.page,
            page_size: params.page_size,
        };
        self.get_page(&Self::article_list_path(kind, params), &pagination)
            .await
    }

    async fn get_article(&self, kind: ArticleKind, slug: &str) -> Result<Article> {
        self.get(
            &format!("/{}/{}", kind.path_segment(), encode_segment(slug)),
            ErrorContext::resource(kind.path_segment(), slug),
        )
        .await
    }

    async fn create_article(&self, kind: ArticleKind, draft: &ArticleDraft) -> Result<Article> {
        self.post(
            &format!("/admin/{}", kind.path_segment()),
            draft,
            ErrorContext::default(),
        )
        .await
    }

    async fn update_article(
        &self,
        kind: ArticleKind,
        article_id: &str,
        draft: &ArticleDraft,
    ) -> Result<Article> {
        self.put(
            &format!("/admin/{}/{}", kind.path_segment(), encode_segment(article_id)),
            draft,
            ErrorContext::resource(kind.path_segment(), article_id),
        )
        .await
    }

    async fn delete_article(&self, kind: ArticleKind, article_id: &str) -> Result<()> {
        self.delete(
            &format!("/admin/{}/{}", kind.path_segment(), encode_segment(article_id)),
            ErrorContext::resource(kind.path_segment(), article_id),
        )
        .await
    }

    // ---- Support ----

    async fn list_tickets(
        &self,
        params: &PaginationParams,
    ) -> Result<PaginatedResponse<SupportTicket>> {
        self.get_page("/support/tickets", params).await
    }

    async fn get_ticket(&self, ticket_id: &str) -> Result<SupportTicket> {
        self.get(
            &format!("/support/tickets/{}", encode_segment(ticket_id)),
            ErrorContext::resource("ticket", ticket_id),
        )
        .await
    }

    async fn create_ticket(&self, req: &CreateTicketRequest) -> Result<SupportTicket> {
        self.post("/support/tickets", req, ErrorContext::default())
            .await
    }

    async fn reply_to_ticket(&self, ticket_id: &str, message: &str) -> Result<SupportTicket> {
        self.post(
            &format!("/support/tickets/{}/replies", encode_segment(ticket_id)),
            &ReplyBody { message },
            ErrorContext::resource("ticket", ticket_id),
        )
        .await
    }

    async fn update_ticket_status(
        &self,
        ticket_id: &str,
        status: TicketStatus,
    ) -> Result<SupportTicket> {
        self.patch(
            &format!("/admin/support/tickets/{}", encode_segment(ticket_id)),
            &StatusBody { status },
            ErrorContext::resource("ticket", ticket_id),
        )
        .await
    }
}
