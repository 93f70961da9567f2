//! Test helpers
//!
//! A scriptable in-memory backend and factory methods for service contexts.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;

use roomfinder_backend::{
    Article, ArticleDraft, ArticleKind, ArticleQueryParams, AuthSession, BackendError,
    BackendKind, BackendMetadata, Booking, BookingStatus, Capability, CreateBookingRequest,
    CreatePayoutRequest, CreateReviewRequest, CreateTicketRequest, HostOnboardingRequest,
    HostProfile, LoginRequest, MarketplaceBackend, Notification, PaginatedResponse,
    PaginationParams, PaymentStatus, PaymentVerification, PayoutBreakdown, PayoutEligibility,
    PayoutRequest, PayoutStatus, Property, PropertyDraft, PropertySearchParams, PropertyType,
    RegisterRequest, Result as BackendResult, Review, SupportTicket, TicketMessage, TicketStatus,
    User, UserRole, VerificationStatus,
};

use crate::services::ServiceContext;
use crate::traits::{BroadcastNotifier, InMemoryBackendRegistry, InMemorySessionStore};

pub const REST_CAPABILITIES: &[Capability] = &[
    Capability::Auth,
    Capability::Listings,
    Capability::HostListings,
    Capability::Bookings,
    Capability::Payments,
    Capability::HostOnboarding,
    Capability::Payouts,
    Capability::Content,
    Capability::Support,
];

pub const LEGACY_CAPABILITIES: &[Capability] = &[
    Capability::Listings,
    Capability::Favorites,
    Capability::Reviews,
    Capability::Notifications,
];

// ===== Fixtures =====

pub fn property_fixture() -> Property {
    property("p1", "Douala", 25_000.0)
}

pub fn property(id: &str, city: &str, price: f64) -> Property {
    Property {
        id: id.to_string(),
        title: format!("Appartement {id}"),
        description: None,
        property_type: PropertyType::Apartment,
        city: city.to_string(),
        address: None,
        price_per_night: price,
        currency: "XAF".to_string(),
        max_guests: Some(4),
        bedrooms: Some(2),
        bathrooms: Some(1),
        images: Vec::new(),
        amenities: Vec::new(),
        host_id: Some("u1".to_string()),
        rating: None,
        review_count: None,
        is_available: true,
        created_at: None,
    }
}

pub fn booking_fixture(id: &str) -> Booking {
    Booking {
        id: id.to_string(),
        property_id: "p1".to_string(),
        property_title: None,
        check_in: NaiveDate::from_ymd_opt(2030, 6, 10).unwrap(),
        check_out: NaiveDate::from_ymd_opt(2030, 6, 12).unwrap(),
        guests: 2,
        status: BookingStatus::Pending,
        payment_status: PaymentStatus::Pending,
        total_amount: Some(52_500.0),
        service_fee: Some(2_500.0),
        currency: "XAF".to_string(),
        payment_reference: None,
        special_requests: None,
        created_at: None,
    }
}

pub fn user_fixture() -> User {
    User {
        id: "u1".to_string(),
        full_name: "Ngono Marie".to_string(),
        email: "marie@example.cm".to_string(),
        phone: Some("237670000000".to_string()),
        role: UserRole::Host,
        is_verified: true,
        avatar: None,
    }
}

pub fn session_fixture() -> AuthSession {
    AuthSession {
        token: "tok_test".to_string(),
        user: user_fixture(),
        expires_at: None,
    }
}

pub fn eligibility_fixture() -> PayoutEligibility {
    PayoutEligibility {
        eligible_amount: 50_000.0,
        locked_amount: 20_000.0,
        breakdown: PayoutBreakdown {
            pending_amount: 20_000.0,
            available_amount: 50_000.0,
            total_earned: 120_000.0,
            total_paid_out: 50_000.0,
        },
        minimum_amount: Some(1_000.0),
        currency: "XAF".to_string(),
    }
}

pub fn unauthorized() -> BackendError {
    BackendError::Unauthorized {
        backend: "mock".to_string(),
        raw_message: Some("jwt expired".to_string()),
    }
}

fn not_found(resource: &str, id: &str) -> BackendError {
    BackendError::NotFound {
        backend: "mock".to_string(),
        resource: resource.to_string(),
        id: id.to_string(),
        raw_message: None,
    }
}

// ===== MockBackend =====

/// In-memory backend.
///
/// Payment verification answers from a script, then `PENDING` forever.
/// `fail_next` makes the next non-payment call return an error.
pub struct MockBackend {
    kind: BackendKind,
    capabilities: Vec<Capability>,
    token: Mutex<Option<String>>,
    next_error: Mutex<Option<BackendError>>,

    verify_script: Mutex<VecDeque<BackendResult<PaymentStatus>>>,
    verify_calls: AtomicU32,
    create_booking_calls: AtomicU32,
    create_booking_error: Mutex<Option<BackendError>>,
    bookings: Mutex<Vec<Booking>>,

    properties: Mutex<Vec<Property>>,
    favorites: Mutex<Vec<String>>,
    reviews: Mutex<Vec<CreateReviewRequest>>,
    read_notifications: Mutex<Vec<String>>,

    onboarding: Mutex<Option<HostOnboardingRequest>>,
    payouts: Mutex<Vec<CreatePayoutRequest>>,
    articles: Mutex<Vec<(ArticleKind, ArticleDraft)>>,
    tickets: Mutex<Vec<SupportTicket>>,
}

impl MockBackend {
    pub fn new(kind: BackendKind, capabilities: &[Capability]) -> Self {
        Self {
            kind,
            capabilities: capabilities.to_vec(),
            token: Mutex::new(None),
            next_error: Mutex::new(None),
            verify_script: Mutex::new(VecDeque::new()),
            verify_calls: AtomicU32::new(0),
            create_booking_calls: AtomicU32::new(0),
            create_booking_error: Mutex::new(None),
            bookings: Mutex::new(Vec::new()),
            properties: Mutex::new(vec![
                property("p1", "Douala", 25_000.0),
                property("p2", "Yaounde", 15_000.0),
                property("p3", "Douala", 40_000.0),
            ]),
            favorites: Mutex::new(Vec::new()),
            reviews: Mutex::new(Vec::new()),
            read_notifications: Mutex::new(Vec::new()),
            onboarding: Mutex::new(None),
            payouts: Mutex::new(Vec::new()),
            articles: Mutex::new(Vec::new()),
            tickets: Mutex::new(Vec::new()),
        }
    }

    // ---- scripting ----

    pub fn script_payment_statuses(&self, statuses: &[&str]) {
        let mut script = self.verify_script.lock().unwrap();
        script.extend(statuses.iter().map(|s| Ok(PaymentStatus::from_raw(s))));
    }

    pub fn push_verify_error(&self, err: BackendError) {
        self.verify_script.lock().unwrap().push_back(Err(err));
    }

    pub fn fail_create_booking(&self, err: BackendError) {
        *self.create_booking_error.lock().unwrap() = Some(err);
    }

    pub fn fail_next(&self, err: BackendError) {
        *self.next_error.lock().unwrap() = Some(err);
    }

    // ---- inspection ----

    pub fn verify_calls(&self) -> u32 {
        self.verify_calls.load(Ordering::SeqCst)
    }

    pub fn create_booking_calls(&self) -> u32 {
        self.create_booking_calls.load(Ordering::SeqCst)
    }

    pub fn token(&self) -> Option<String> {
        self.token.lock().unwrap().clone()
    }

    pub fn last_payout(&self) -> Option<CreatePayoutRequest> {
        self.payouts.lock().unwrap().last().cloned()
    }

    pub fn last_article(&self) -> Option<(ArticleKind, ArticleDraft)> {
        self.articles.lock().unwrap().last().cloned()
    }

    pub fn last_onboarding(&self) -> Option<HostOnboardingRequest> {
        self.onboarding.lock().unwrap().clone()
    }

    pub fn reviews(&self) -> Vec<CreateReviewRequest> {
        self.reviews.lock().unwrap().clone()
    }

    pub fn read_notifications(&self) -> Vec<String> {
        self.read_notifications.lock().unwrap().clone()
    }

    fn check(&self) -> BackendResult<()> {
        match self.next_error.lock().unwrap().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn find_property(&self, id: &str) -> BackendResult<Property> {
        self.properties
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| not_found("property", id))
    }

    fn find_ticket(&self, id: &str) -> BackendResult<SupportTicket> {
        self.tickets
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or_else(|| not_found("ticket", id))
    }

    fn store_ticket(&self, ticket: &SupportTicket) {
        let mut tickets = self.tickets.lock().unwrap();
        tickets.retain(|t| t.id != ticket.id);
        tickets.push(ticket.clone());
    }
}

fn article_from(kind: ArticleKind, id: &str, draft: &ArticleDraft) -> Article {
    Article {
        id: id.to_string(),
        slug: draft.slug.clone(),
        title: draft.title.clone(),
        excerpt: draft.excerpt.clone(),
        content: draft.content.clone(),
        category: draft.category.clone().or_else(|| Some(kind.path_segment().to_string())),
        cover_image: draft.cover_image.clone(),
        author: None,
        status: draft.status,
        tags: draft.tags.clone(),
        published_at: None,
        updated_at: None,
    }
}

fn property_from(id: &str, draft: &PropertyDraft) -> Property {
    Property {
        title: draft.title.clone(),
        description: Some(draft.description.clone()),
        property_type: draft.property_type,
        city: draft.city.clone(),
        price_per_night: draft.price_per_night,
        max_guests: Some(draft.max_guests),
        ..property(id, &draft.city, draft.price_per_night)
    }
}

#[async_trait]
impl MarketplaceBackend for MockBackend {
    fn id(&self) -> &'static str {
        "mock"
    }

    fn metadata(&self) -> BackendMetadata {
        BackendMetadata {
            kind: self.kind,
            name: format!("Mock {}", self.kind),
            description: "In-memory test backend".to_string(),
            capabilities: self.capabilities.clone(),
        }
    }

    fn set_auth_token(&self, token: Option<String>) {
        *self.token.lock().unwrap() = token;
    }

    async fn login(&self, req: &LoginRequest) -> BackendResult<AuthSession> {
        self.check()?;
        if req.password != "secret123" {
            return Err(BackendError::Rejected {
                backend: "mock".to_string(),
                message: "Invalid email or password".to_string(),
            });
        }
        Ok(session_fixture())
    }

    async fn register(&self, req: &RegisterRequest) -> BackendResult<AuthSession> {
        self.check()?;
        let mut session = session_fixture();
        session.user.full_name.clone_from(&req.full_name);
        session.user.email.clone_from(&req.email);
        session.user.phone = Some(req.phone.clone());
        session.user.role = req.role;
        Ok(session)
    }

    async fn current_user(&self) -> BackendResult<User> {
        self.check()?;
        if self.token().is_none() {
            return Err(unauthorized());
        }
        Ok(user_fixture())
    }

    async fn search_properties(
        &self,
        params: &PropertySearchParams,
    ) -> BackendResult<PaginatedResponse<Property>> {
        self.check()?;
        let matching: Vec<Property> = self
            .properties
            .lock()
            .unwrap()
            .iter()
            .filter(|p| params.matches(p))
            .cloned()
            .collect();
        Ok(PaginatedResponse::from_full_list(
            matching,
            &params.to_pagination(),
        ))
    }

    async fn get_property(&self, property_id: &str) -> BackendResult<Property> {
        self.check()?;
        self.find_property(property_id)
    }

    async fn list_host_properties(
        &self,
        params: &PaginationParams,
    ) -> BackendResult<PaginatedResponse<Property>> {
        self.check()?;
        let all = self.properties.lock().unwrap().clone();
        Ok(PaginatedResponse::from_full_list(all, params))
    }

    async fn create_property(&self, draft: &PropertyDraft) -> BackendResult<Property> {
        self.check()?;
        let mut properties = self.properties.lock().unwrap();
        let created = property_from(&format!("p{}", properties.len() + 1), draft);
        properties.push(created.clone());
        Ok(created)
    }

    async fn update_property(
        &self,
        property_id: &str,
        draft: &PropertyDraft,
    ) -> BackendResult<Property> {
        self.check()?;
        self.find_property(property_id)?;
        let updated = property_from(property_id, draft);
        let mut properties = self.properties.lock().unwrap();
        properties.retain(|p| p.id != property_id);
        properties.push(updated.clone());
        Ok(updated)
    }

    async fn delete_property(&self, property_id: &str) -> BackendResult<()> {
        self.check()?;
        self.find_property(property_id)?;
        self.properties.lock().unwrap().retain(|p| p.id != property_id);
        Ok(())
    }

    async fn create_booking(&self, req: &CreateBookingRequest) -> BackendResult<Booking> {
        self.create_booking_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.create_booking_error.lock().unwrap().take() {
            return Err(err);
        }
        let mut bookings = self.bookings.lock().unwrap();
        let booking = Booking {
            property_id: req.property_id.clone(),
            check_in: req.check_in,
            check_out: req.check_out,
            guests: req.guests,
            special_requests: req.special_requests.clone(),
            ..booking_fixture(&format!("bk_{}", bookings.len() + 1))
        };
        bookings.push(booking.clone());
        Ok(booking)
    }

    async fn list_bookings(
        &self,
        params: &PaginationParams,
    ) -> BackendResult<PaginatedResponse<Booking>> {
        self.check()?;
        let all = self.bookings.lock().unwrap().clone();
        Ok(PaginatedResponse::from_full_list(all, params))
    }

    async fn get_booking(&self, booking_id: &str) -> BackendResult<Booking> {
        self.check()?;
        self.bookings
            .lock()
            .unwrap()
            .iter()
            .find(|b| b.id == booking_id)
            .cloned()
            .ok_or_else(|| not_found("booking", booking_id))
    }

    async fn cancel_booking(&self, booking_id: &str) -> BackendResult<Booking> {
        self.check()?;
        let mut bookings = self.bookings.lock().unwrap();
        let booking = bookings
            .iter_mut()
            .find(|b| b.id == booking_id)
            .ok_or_else(|| not_found("booking", booking_id))?;
        booking.status = BookingStatus::Cancelled;
        Ok(booking.clone())
    }

    async fn verify_payment(&self, booking_id: &str) -> BackendResult<PaymentVerification> {
        self.verify_calls.fetch_add(1, Ordering::SeqCst);
        let next = self
            .verify_script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(PaymentStatus::Pending));
        next.map(|payment_status| PaymentVerification {
            booking_id: Some(booking_id.to_string()),
            transaction_id: payment_status
                .is_success()
                .then(|| format!("TX-{booking_id}")),
            payment_status,
            message: None,
        })
    }

    async fn get_host_profile(&self) -> BackendResult<HostProfile> {
        self.check()?;
        let submitted = self.last_onboarding();
        Ok(HostProfile {
            user_id: "u1".to_string(),
            business_name: submitted.as_ref().and_then(|r| r.business_name.clone()),
            id_document_type: submitted.as_ref().map(|r| r.id_document_type.clone()),
            id_document_number: submitted.as_ref().map(|r| r.id_document_number.clone()),
            verification_status: if submitted.is_some() {
                VerificationStatus::Pending
            } else {
                VerificationStatus::NotSubmitted
            },
            payout: submitted.map(|r| r.payout),
            rejection_reason: None,
        })
    }

    async fn submit_host_onboarding(
        &self,
        req: &HostOnboardingRequest,
    ) -> BackendResult<HostProfile> {
        self.check()?;
        *self.onboarding.lock().unwrap() = Some(req.clone());
        self.get_host_profile().await
    }

    async fn get_payout_eligibility(&self) -> BackendResult<PayoutEligibility> {
        self.check()?;
        Ok(eligibility_fixture())
    }

    async fn request_payout(&self, req: &CreatePayoutRequest) -> BackendResult<PayoutRequest> {
        self.check()?;
        let mut payouts = self.payouts.lock().unwrap();
        payouts.push(req.clone());
        Ok(PayoutRequest {
            id: format!("po_{}", payouts.len()),
            amount: req.amount,
            fee: 0.0,
            net_amount: Some(req.amount),
            currency: "XAF".to_string(),
            status: PayoutStatus::Pending,
            provider: Some(req.provider),
            phone: Some(req.phone.clone()),
            created_at: None,
            processed_at: None,
        })
    }

    async fn list_payouts(
        &self,
        params: &PaginationParams,
    ) -> BackendResult<PaginatedResponse<PayoutRequest>> {
        self.check()?;
        Ok(PaginatedResponse::from_full_list(Vec::new(), params))
    }

    async fn list_articles(
        &self,
        kind: ArticleKind,
        params: &ArticleQueryParams,
    ) -> BackendResult<PaginatedResponse<Article>> {
        self.check()?;
        let all: Vec<Article> = self
            .articles
            .lock()
            .unwrap()
            .iter()
            .enumerate()
            .filter(|(_, (k, _))| *k == kind)
            .map(|(i, (k, d))| article_from(*k, &format!("a{}", i + 1), d))
            .collect();
        Ok(PaginatedResponse::from_full_list(
            all,
            &PaginationParams {
                page: params.page,
                page_size: params.page_size,
            },
        ))
    }

    async fn get_article(&self, kind: ArticleKind, slug: &str) -> BackendResult<Article> {
        self.check()?;
        self.articles
            .lock()
            .unwrap()
            .iter()
            .find(|(k, d)| *k == kind && d.slug == slug)
            .map(|(k, d)| article_from(*k, "a1", d))
            .ok_or_else(|| not_found("article", slug))
    }

    async fn create_article(
        &self,
        kind: ArticleKind,
        draft: &ArticleDraft,
    ) -> BackendResult<Article> {
        self.check()?;
        let mut articles = self.articles.lock().unwrap();
        articles.push((kind, draft.clone()));
        Ok(article_from(kind, &format!("a{}", articles.len()), draft))
    }

    async fn update_article(
        &self,
        kind: ArticleKind,
        article_id: &str,
        draft: &ArticleDraft,
    ) -> BackendResult<Article> {
        self.check()?;
        self.articles.lock().unwrap().push((kind, draft.clone()));
        Ok(article_from(kind, article_id, draft))
    }

    async fn delete_article(&self, _kind: ArticleKind, _article_id: &str) -> BackendResult<()> {
        self.check()
    }

    async fn list_tickets(
        &self,
        params: &PaginationParams,
    ) -> BackendResult<PaginatedResponse<SupportTicket>> {
        self.check()?;
        let all = self.tickets.lock().unwrap().clone();
        Ok(PaginatedResponse::from_full_list(all, params))
    }

    async fn get_ticket(&self, ticket_id: &str) -> BackendResult<SupportTicket> {
        self.check()?;
        self.find_ticket(ticket_id)
    }

    async fn create_ticket(&self, req: &CreateTicketRequest) -> BackendResult<SupportTicket> {
        self.check()?;
        let id = format!("t{}", self.tickets.lock().unwrap().len() + 1);
        let ticket = SupportTicket {
            id,
            subject: req.subject.clone(),
            category: req.category.clone(),
            status: TicketStatus::Open,
            priority: req.priority,
            booking_id: req.booking_id.clone(),
            messages: vec![TicketMessage {
                author_name: Some("Ngono Marie".to_string()),
                body: req.message.clone(),
                is_staff: false,
                created_at: None,
            }],
            created_at: None,
            updated_at: None,
        };
        self.store_ticket(&ticket);
        Ok(ticket)
    }

    async fn reply_to_ticket(
        &self,
        ticket_id: &str,
        message: &str,
    ) -> BackendResult<SupportTicket> {
        self.check()?;
        let mut ticket = self.find_ticket(ticket_id)?;
        ticket.messages.push(TicketMessage {
            author_name: Some("Ngono Marie".to_string()),
            body: message.to_string(),
            is_staff: false,
            created_at: None,
        });
        self.store_ticket(&ticket);
        Ok(ticket)
    }

    async fn update_ticket_status(
        &self,
        ticket_id: &str,
        status: TicketStatus,
    ) -> BackendResult<SupportTicket> {
        self.check()?;
        let mut ticket = self.find_ticket(ticket_id)?;
        ticket.status = status;
        self.store_ticket(&ticket);
        Ok(ticket)
    }

    async fn list_favorites(&self, _user_id: &str) -> BackendResult<Vec<Property>> {
        self.check()?;
        let favorites = self.favorites.lock().unwrap().clone();
        let properties = self.properties.lock().unwrap();
        Ok(properties
            .iter()
            .filter(|p| favorites.contains(&p.id))
            .cloned()
            .collect())
    }

    async fn toggle_favorite(&self, _user_id: &str, property_id: &str) -> BackendResult<bool> {
        self.check()?;
        let mut favorites = self.favorites.lock().unwrap();
        if let Some(pos) = favorites.iter().position(|id| id == property_id) {
            favorites.remove(pos);
            Ok(false)
        } else {
            favorites.push(property_id.to_string());
            Ok(true)
        }
    }

    async fn list_reviews(&self, property_id: &str) -> BackendResult<Vec<Review>> {
        self.check()?;
        Ok(self
            .reviews
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.property_id == property_id)
            .enumerate()
            .map(|(i, r)| Review {
                id: format!("r{}", i + 1),
                property_id: r.property_id.clone(),
                user_name: None,
                rating: r.rating,
                comment: r.comment.clone(),
                created_at: None,
            })
            .collect())
    }

    async fn create_review(&self, req: &CreateReviewRequest) -> BackendResult<()> {
        self.check()?;
        self.reviews.lock().unwrap().push(req.clone());
        Ok(())
    }

    async fn list_notifications(&self, _user_id: &str) -> BackendResult<Vec<Notification>> {
        self.check()?;
        let read = self.read_notifications();
        Ok(["n1", "n2", "n3"]
            .iter()
            .map(|id| Notification {
                id: (*id).to_string(),
                title: "Booking update".to_string(),
                message: format!("Notification {id}"),
                is_read: *id == "n1" || read.iter().any(|r| r == id),
                created_at: None,
            })
            .collect())
    }

    async fn mark_notification_read(
        &self,
        _user_id: &str,
        notification_id: &str,
    ) -> BackendResult<()> {
        self.check()?;
        self.read_notifications
            .lock()
            .unwrap()
            .push(notification_id.to_string());
        Ok(())
    }
}

// ===== Factory =====

pub fn rest_mock() -> Arc<MockBackend> {
    Arc::new(MockBackend::new(BackendKind::Rest, REST_CAPABILITIES))
}

pub fn legacy_mock() -> Arc<MockBackend> {
    Arc::new(MockBackend::new(BackendKind::Legacy, LEGACY_CAPABILITIES))
}

/// Context over the given backends, in preference order.
pub fn create_test_context_with(backends: Vec<Arc<MockBackend>>) -> Arc<ServiceContext> {
    create_context(backends, BroadcastNotifier::default())
}

fn create_context(
    backends: Vec<Arc<MockBackend>>,
    notifier: BroadcastNotifier,
) -> Arc<ServiceContext> {
    let backends: Vec<Arc<dyn MarketplaceBackend>> = backends
        .into_iter()
        .map(|b| b as Arc<dyn MarketplaceBackend>)
        .collect();
    Arc::new(ServiceContext::new(
        Arc::new(InMemoryBackendRegistry::with_backends(backends)),
        Arc::new(InMemorySessionStore::new()),
        Arc::new(notifier),
    ))
}

/// Context over one REST mock. Returns the mock and the toast channel too.
pub fn create_test_context() -> (Arc<ServiceContext>, Arc<MockBackend>, BroadcastNotifier) {
    let backend = rest_mock();
    let notifier = BroadcastNotifier::default();
    let ctx = create_context(vec![backend.clone()], notifier.clone());
    (ctx, backend, notifier)
}

/// REST then legacy mock, signed in.
pub async fn create_signed_in_context() -> (Arc<ServiceContext>, Arc<MockBackend>, Arc<MockBackend>)
{
    let rest = rest_mock();
    let legacy = legacy_mock();
    let ctx = create_test_context_with(vec![rest.clone(), legacy.clone()]);
    ctx.sign_in(&session_fixture()).await.unwrap();
    (ctx, rest, legacy)
}
