use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ============ Pagination ============

/// Pagination parameters for list operations.
///
/// Pages are 1-indexed. The default is `page = 1, page_size = 20`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PaginationParams {
    /// Page number (1-indexed).
    pub page: u32,
    /// Number of items per page.
    pub page_size: u32,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 20,
        }
    }
}

impl PaginationParams {
    /// Clamp pagination values to valid ranges.
    ///
    /// - `page` is clamped to `>= 1`
    /// - `page_size` is clamped to `1..=max_page_size`
    #[must_use]
    pub fn validated(&self, max_page_size: u32) -> Self {
        Self {
            page: self.page.max(1),
            page_size: self.page_size.clamp(1, max_page_size),
        }
    }
}

/// A paginated response wrapper.
///
/// Returned by all list operations: the current page of items plus pagination metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResponse<T> {
    /// Items in the current page.
    pub items: Vec<T>,
    /// Current page number.
    pub page: u32,
    /// Page size used for this request.
    pub page_size: u32,
    /// Total number of items across all pages.
    pub total_count: u32,
    /// Whether there are more pages after this one.
    pub has_more: bool,
}

impl<T> PaginatedResponse<T> {
    /// Create a new paginated response, computing [`has_more`](Self::has_more).
    pub fn new(items: Vec<T>, page: u32, page_size: u32, total_count: u32) -> Self {
        let has_more = page.saturating_mul(page_size) < total_count;
        Self {
            items,
            page,
            page_size,
            total_count,
            has_more,
        }
    }

    /// Paginate an already complete list client side.
    ///
    /// The legacy API returns whole lists; this slices out the requested page.
    pub fn from_full_list(all: Vec<T>, params: &PaginationParams) -> Self {
        let total_count = u32::try_from(all.len()).unwrap_or(u32::MAX);
        let start = (params.page.max(1) - 1) as usize * params.page_size as usize;
        let items = all
            .into_iter()
            .skip(start)
            .take(params.page_size as usize)
            .collect();
        Self::new(items, params.page.max(1), params.page_size, total_count)
    }

    /// Convert every item, keeping pagination metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PaginatedResponse<U> {
        PaginatedResponse {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            page_size: self.page_size,
            total_count: self.total_count,
            has_more: self.has_more,
        }
    }
}

// ============ Backend Types ============

/// Identifies which backend implementation to use.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// The JSON REST API (`{success, data, message}` envelope).
    Rest,
    /// The legacy PHP user API (`{Result: "true", ResponseMsg}` envelope).
    Legacy,
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rest => write!(f, "rest"),
            Self::Legacy => write!(f, "legacy"),
        }
    }
}

impl std::str::FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rest" | "api" => Ok(Self::Rest),
            "legacy" | "php" => Ok(Self::Legacy),
            other => Err(format!("unknown backend kind: {other}")),
        }
    }
}

/// A group of operations a backend can serve.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum Capability {
    /// Login, registration, current user.
    Auth,
    /// Public property search and details.
    Listings,
    /// Host-side property management.
    HostListings,
    /// Booking creation and management.
    Bookings,
    /// Payment verification.
    Payments,
    /// Host onboarding / verification.
    HostOnboarding,
    /// Host payouts.
    Payouts,
    /// Blog and help-center articles.
    Content,
    /// Support tickets.
    Support,
    /// Saved properties.
    Favorites,
    /// Property reviews.
    Reviews,
    /// In-app notifications.
    Notifications,
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Auth => "auth",
            Self::Listings => "listings",
            Self::HostListings => "host listings",
            Self::Bookings => "bookings",
            Self::Payments => "payments",
            Self::HostOnboarding => "host onboarding",
            Self::Payouts => "payouts",
            Self::Content => "content",
            Self::Support => "support",
            Self::Favorites => "favorites",
            Self::Reviews => "reviews",
            Self::Notifications => "notifications",
        };
        f.write_str(name)
    }
}

/// Static description of a backend implementation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendMetadata {
    /// Backend kind.
    pub kind: BackendKind,
    /// Human-readable name.
    pub name: String,
    /// Short description.
    pub description: String,
    /// Operation groups this backend serves.
    pub capabilities: Vec<Capability>,
}

impl BackendMetadata {
    /// Whether the backend serves the given capability.
    pub fn supports(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }
}

/// Connection settings for creating a backend via [`create_backend`](crate::create_backend).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum BackendConfig {
    /// REST API settings.
    Rest {
        /// Base URL, e.g. `https://api.roomfinder237.com/api`.
        base_url: String,
    },
    /// Legacy PHP API settings.
    Legacy {
        /// Base URL, e.g. `https://cpanel.roomfinder237.com/user_api`.
        base_url: String,
    },
}

impl BackendConfig {
    /// The backend kind this config creates.
    pub fn kind(&self) -> BackendKind {
        match self {
            Self::Rest { .. } => BackendKind::Rest,
            Self::Legacy { .. } => BackendKind::Legacy,
        }
    }
}

// ============ Users & Auth ============

/// Role of a marketplace user.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Books properties.
    #[default]
    Guest,
    /// Lists properties and receives payouts.
    Host,
    /// Manages content, support and verification.
    Admin,
    /// Role not recognized by this client.
    #[serde(other)]
    Unknown,
}

/// A marketplace user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// User ID.
    pub id: String,
    /// Display name.
    #[serde(alias = "name")]
    pub full_name: String,
    /// Email address.
    pub email: String,
    /// Phone number, if provided.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Role.
    #[serde(default)]
    pub role: UserRole,
    /// Whether the email/phone is verified.
    #[serde(default)]
    pub is_verified: bool,
    /// Avatar URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// Email/password credentials.
#[derive(Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Email address.
    pub email: String,
    /// Password.
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Account registration form.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Display name.
    pub full_name: String,
    /// Email address.
    pub email: String,
    /// Phone number.
    pub phone: String,
    /// Password.
    pub password: String,
    /// Requested role (guest or host).
    pub role: UserRole,
}

impl std::fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("full_name", &self.full_name)
            .field("email", &self.email)
            .field("phone", &self.phone)
            .field("password", &"<redacted>")
            .field("role", &self.role)
            .finish()
    }
}

/// An authenticated session returned by login/registration.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    /// Bearer token.
    pub token: String,
    /// The signed-in user.
    pub user: User,
    /// Token expiry, if the server reports one.
    #[serde(default, with = "crate::utils::datetime")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl AuthSession {
    /// Whether the token is past its expiry at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|exp| exp <= now)
    }
}

impl std::fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession")
            .field("token", &crate::utils::log_sanitizer::mask_token(&self.token))
            .field("user", &self.user)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

// ============ Properties ============

/// Kind of listing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    /// Apartment.
    #[default]
    Apartment,
    /// Whole house.
    House,
    /// Studio.
    Studio,
    /// Single room.
    Room,
    /// Villa.
    Villa,
    /// Guest house.
    Guesthouse,
    /// Anything the client doesn't know about.
    #[serde(other)]
    Other,
}

impl std::str::FromStr for PropertyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "apartment" | "appartement" => Ok(Self::Apartment),
            "house" | "maison" => Ok(Self::House),
            "studio" => Ok(Self::Studio),
            "room" | "chambre" => Ok(Self::Room),
            "villa" => Ok(Self::Villa),
            "guesthouse" => Ok(Self::Guesthouse),
            other => Err(format!("unknown property type: {other}")),
        }
    }
}

fn default_currency() -> String {
    "XAF".to_string()
}

fn default_true() -> bool {
    true
}

/// A property listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    /// Property ID.
    pub id: String,
    /// Listing title.
    pub title: String,
    /// Long description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Kind of listing.
    #[serde(default)]
    pub property_type: PropertyType,
    /// City.
    #[serde(default)]
    pub city: String,
    /// Street address / neighbourhood.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Price per night.
    pub price_per_night: f64,
    /// ISO currency code.
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Guest capacity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_guests: Option<u32>,
    /// Bedrooms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bedrooms: Option<u32>,
    /// Bathrooms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bathrooms: Option<u32>,
    /// Image URLs, cover first.
    #[serde(default)]
    pub images: Vec<String>,
    /// Amenity labels.
    #[serde(default)]
    pub amenities: Vec<String>,
    /// Owning host ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_id: Option<String>,
    /// Average rating.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
    /// Number of reviews.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_count: Option<u32>,
    /// Whether the listing can be booked.
    #[serde(default = "default_true")]
    pub is_available: bool,
    /// Creation time.
    #[serde(
        default,
        with = "crate::utils::datetime",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

/// Search filters for property listings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PropertySearchParams {
    /// Page number (1-indexed).
    pub page: u32,
    /// Number of items per page.
    pub page_size: u32,
    /// Free-text query (title/description/neighbourhood).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    /// City filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// Minimum nightly price.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<f64>,
    /// Maximum nightly price.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
    /// Minimum guest capacity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guests: Option<u32>,
    /// Listing kind.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_type: Option<PropertyType>,
}

impl Default for PropertySearchParams {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 20,
            query: None,
            city: None,
            min_price: None,
            max_price: None,
            guests: None,
            property_type: None,
        }
    }
}

impl PropertySearchParams {
    /// Basic pagination view of these params.
    pub fn to_pagination(&self) -> PaginationParams {
        PaginationParams {
            page: self.page,
            page_size: self.page_size,
        }
    }

    /// Whether `property` passes every set filter.
    ///
    /// Used by backends whose API cannot filter server side.
    pub fn matches(&self, property: &Property) -> bool {
        let query_ok = self.query.as_deref().is_none_or(|q| {
            let q = q.to_lowercase();
            property.title.to_lowercase().contains(&q)
                || property
                    .description
                    .as_deref()
                    .is_some_and(|d| d.to_lowercase().contains(&q))
                || property
                    .address
                    .as_deref()
                    .is_some_and(|a| a.to_lowercase().contains(&q))
        });
        let city_ok = self
            .city
            .as_deref()
            .is_none_or(|c| property.city.eq_ignore_ascii_case(c.trim()));
        let min_ok = self.min_price.is_none_or(|m| property.price_per_night >= m);
        let max_ok = self.max_price.is_none_or(|m| property.price_per_night <= m);
        let guests_ok = self
            .guests
            .is_none_or(|g| property.max_guests.is_none_or(|cap| cap >= g));
        let type_ok = self
            .property_type
            .is_none_or(|t| property.property_type == t);
        query_ok && city_ok && min_ok && max_ok && guests_ok && type_ok
    }
}

/// Host-side property form (create/update).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDraft {
    /// Listing title.
    pub title: String,
    /// Long description.
    pub description: String,
    /// Kind of listing.
    pub property_type: PropertyType,
    /// City.
    pub city: String,
    /// Street address / neighbourhood.
    pub address: String,
    /// Price per night.
    pub price_per_night: f64,
    /// Guest capacity.
    pub max_guests: u32,
    /// Bedrooms.
    pub bedrooms: u32,
    /// Bathrooms.
    pub bathrooms: u32,
    /// Image URLs.
    pub images: Vec<String>,
    /// Amenity labels.
    pub amenities: Vec<String>,
}

// ============ Bookings & Payments ============

/// Mobile-money operator used to pay or to receive payouts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum MobileMoneyProvider {
    /// MTN Mobile Money.
    #[serde(rename = "MTN", alias = "mtn", alias = "MTN_MOMO")]
    Mtn,
    /// Orange Money.
    #[serde(rename = "ORANGE", alias = "orange", alias = "ORANGE_MONEY")]
    Orange,
}

impl MobileMoneyProvider {
    /// Wire code sent to the API.
    pub fn code(self) -> &'static str {
        match self {
            Self::Mtn => "MTN",
            Self::Orange => "ORANGE",
        }
    }
}

impl std::fmt::Display for MobileMoneyProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mtn => write!(f, "MTN Mobile Money"),
            Self::Orange => write!(f, "Orange Money"),
        }
    }
}

impl std::str::FromStr for MobileMoneyProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MTN" | "MTN_MOMO" | "MOMO" => Ok(Self::Mtn),
            "ORANGE" | "ORANGE_MONEY" | "OM" => Ok(Self::Orange),
            other => Err(format!("unknown mobile money provider: {other}")),
        }
    }
}

/// Lifecycle status of a booking.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    /// Awaiting payment confirmation.
    #[default]
    Pending,
    /// Paid and confirmed.
    Confirmed,
    /// Cancelled by guest, host or system.
    Cancelled,
    /// Stay finished.
    Completed,
    /// Status not recognized by this client.
    #[serde(other)]
    Unknown,
}

/// Payment status as reported by the verify-payment operation.
///
/// The server sends free-form upper-case strings; unknown values are kept in
/// [`Other`](Self::Other) and treated as "still pending".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum PaymentStatus {
    /// Prompt sent, not yet approved.
    #[default]
    Pending,
    /// Money received.
    Completed,
    /// Money received (operator wording).
    Successful,
    /// Declined or errored.
    Failed,
    /// Prompt timed out on the operator side.
    Expired,
    /// Any other value.
    Other(String),
}

impl PaymentStatus {
    /// Parse a raw status string (case-insensitive).
    pub fn from_raw(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Self::Pending,
            "COMPLETED" => Self::Completed,
            "SUCCESSFUL" => Self::Successful,
            "FAILED" => Self::Failed,
            "EXPIRED" => Self::Expired,
            _ => Self::Other(raw.to_string()),
        }
    }

    /// Wire representation.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "PENDING",
            Self::Completed => "COMPLETED",
            Self::Successful => "SUCCESSFUL",
            Self::Failed => "FAILED",
            Self::Expired => "EXPIRED",
            Self::Other(raw) => raw,
        }
    }

    /// `COMPLETED` or `SUCCESSFUL`.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed | Self::Successful)
    }

    /// Whether polling can stop on this status.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Completed | Self::Successful | Self::Failed | Self::Expired
        )
    }
}

impl From<String> for PaymentStatus {
    fn from(raw: String) -> Self {
        Self::from_raw(&raw)
    }
}

impl From<PaymentStatus> for String {
    fn from(status: PaymentStatus) -> Self {
        status.as_str().to_string()
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of the create-booking operation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    /// Property being booked.
    pub property_id: String,
    /// Arrival date.
    pub check_in: NaiveDate,
    /// Departure date.
    pub check_out: NaiveDate,
    /// Number of guests.
    pub guests: u32,
    /// Free-text requests for the host.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_requests: Option<String>,
    /// Mobile-money operator charged.
    pub payment_method: MobileMoneyProvider,
    /// Normalized payer phone (`237XXXXXXXXX`).
    pub phone: String,
}

/// A booking.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    /// Booking ID.
    #[serde(alias = "_id", alias = "bookingId")]
    pub id: String,
    /// Booked property.
    pub property_id: String,
    /// Property title, when the server embeds it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_title: Option<String>,
    /// Arrival date.
    pub check_in: NaiveDate,
    /// Departure date.
    pub check_out: NaiveDate,
    /// Number of guests.
    pub guests: u32,
    /// Booking status.
    #[serde(default)]
    pub status: BookingStatus,
    /// Payment status.
    #[serde(default)]
    pub payment_status: PaymentStatus,
    /// Total charged, fees included.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<f64>,
    /// Service fee part of the total.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_fee: Option<f64>,
    /// ISO currency code.
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Operator transaction reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_reference: Option<String>,
    /// Guest's special requests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_requests: Option<String>,
    /// Creation time.
    #[serde(
        default,
        with = "crate::utils::datetime",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

impl Booking {
    /// Number of nights booked.
    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }
}

/// Result of one verify-payment call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentVerification {
    /// Booking the payment belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booking_id: Option<String>,
    /// Current payment status.
    #[serde(alias = "status")]
    pub payment_status: PaymentStatus,
    /// Operator transaction ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    /// Server message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

// ============ Host onboarding ============

/// Host verification state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerificationStatus {
    /// Onboarding form not sent yet.
    #[default]
    NotSubmitted,
    /// Waiting for admin review.
    Pending,
    /// Approved.
    Verified,
    /// Declined; see `rejection_reason`.
    Rejected,
    /// Status not recognized by this client.
    #[serde(other)]
    Unknown,
}

/// Where host payouts are sent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PayoutDetails {
    /// Mobile-money operator.
    pub provider: MobileMoneyProvider,
    /// Normalized phone.
    pub phone: String,
    /// Name registered with the operator.
    pub account_name: String,
}

/// A host's profile and verification record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HostProfile {
    /// User the profile belongs to.
    pub user_id: String,
    /// Trading name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_name: Option<String>,
    /// ID document kind (`CNI`, `PASSPORT`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_document_type: Option<String>,
    /// ID document number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_document_number: Option<String>,
    /// Verification state.
    #[serde(default)]
    pub verification_status: VerificationStatus,
    /// Payout destination.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payout: Option<PayoutDetails>,
    /// Admin's reason when rejected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
}

/// Onboarding form sent by a prospective host.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HostOnboardingRequest {
    /// Trading name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_name: Option<String>,
    /// ID document kind.
    pub id_document_type: String,
    /// ID document number.
    pub id_document_number: String,
    /// Uploaded scan URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_document_url: Option<String>,
    /// Payout destination.
    pub payout: PayoutDetails,
}

// ============ Payouts ============

/// Earnings split reported with payout eligibility.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct PayoutBreakdown {
    /// Earnings from stays not yet completed.
    pub pending_amount: f64,
    /// Earnings that can be withdrawn.
    pub available_amount: f64,
    /// Lifetime earnings.
    pub total_earned: f64,
    /// Lifetime payouts.
    pub total_paid_out: f64,
}

/// How much a host can withdraw right now.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PayoutEligibility {
    /// Amount that can be requested.
    pub eligible_amount: f64,
    /// Amount held by in-flight payout requests.
    #[serde(default)]
    pub locked_amount: f64,
    /// Earnings split.
    #[serde(default)]
    pub breakdown: PayoutBreakdown,
    /// Smallest payout the server accepts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_amount: Option<f64>,
    /// ISO currency code.
    #[serde(default = "default_currency")]
    pub currency: String,
}

/// Payout request status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PayoutStatus {
    /// Submitted.
    #[default]
    Pending,
    /// Transfer in progress.
    Processing,
    /// Money sent.
    Completed,
    /// Transfer failed.
    Failed,
    /// Declined by an admin.
    Rejected,
    /// Status not recognized by this client.
    #[serde(other)]
    Unknown,
}

/// A payout request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PayoutRequest {
    /// Payout ID.
    pub id: String,
    /// Requested amount.
    pub amount: f64,
    /// Fee withheld.
    #[serde(default)]
    pub fee: f64,
    /// Amount actually sent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub net_amount: Option<f64>,
    /// ISO currency code.
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Status.
    #[serde(default)]
    pub status: PayoutStatus,
    /// Operator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<MobileMoneyProvider>,
    /// Destination phone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Submission time.
    #[serde(
        default,
        with = "crate::utils::datetime",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
    /// Completion time.
    #[serde(
        default,
        with = "crate::utils::datetime",
        skip_serializing_if = "Option::is_none"
    )]
    pub processed_at: Option<DateTime<Utc>>,
}

/// Body of the request-payout operation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreatePayoutRequest {
    /// Amount to withdraw.
    pub amount: f64,
    /// Operator.
    pub provider: MobileMoneyProvider,
    /// Normalized destination phone.
    pub phone: String,
}

// ============ Content (blog / help center) ============

/// Which content collection an article belongs to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ArticleKind {
    /// Blog post.
    Blog,
    /// Help-center article.
    Help,
}

impl ArticleKind {
    /// REST path segment for the collection.
    pub fn path_segment(self) -> &'static str {
        match self {
            Self::Blog => "blog",
            Self::Help => "help",
        }
    }
}

impl std::fmt::Display for ArticleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Blog => write!(f, "blog post"),
            Self::Help => write!(f, "help article"),
        }
    }
}

/// Publication state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ArticleStatus {
    /// Hidden from the public site.
    #[default]
    Draft,
    /// Visible.
    Published,
    /// Hidden but kept.
    Archived,
    /// Status not recognized by this client.
    #[serde(other)]
    Unknown,
}

/// A blog post or help-center article.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    /// Article ID.
    pub id: String,
    /// URL slug.
    pub slug: String,
    /// Title.
    pub title: String,
    /// Short summary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    /// Body (markdown/HTML as authored).
    #[serde(default)]
    pub content: String,
    /// Category (help-center section or blog category).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Cover image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    /// Author display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Publication state.
    #[serde(default)]
    pub status: ArticleStatus,
    /// Tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Publication time.
    #[serde(
        default,
        with = "crate::utils::datetime",
        skip_serializing_if = "Option::is_none"
    )]
    pub published_at: Option<DateTime<Utc>>,
    /// Last edit time.
    #[serde(
        default,
        with = "crate::utils::datetime",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Admin article form (create/update).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ArticleDraft {
    /// Title.
    pub title: String,
    /// URL slug; generated from the title when empty.
    pub slug: String,
    /// Short summary.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    /// Body.
    pub content: String,
    /// Category.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Cover image URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    /// Publication state.
    pub status: ArticleStatus,
    /// Tags.
    pub tags: Vec<String>,
}

/// Filters for article listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ArticleQueryParams {
    /// Page number (1-indexed).
    pub page: u32,
    /// Number of items per page.
    pub page_size: u32,
    /// Free-text search.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// Category filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Status filter (admin only; public lists are published-only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ArticleStatus>,
}

impl Default for ArticleQueryParams {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 20,
            search: None,
            category: None,
            status: None,
        }
    }
}

// ============ Support ============

/// Ticket status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    /// Waiting for staff.
    #[default]
    Open,
    /// Staff is working on it.
    InProgress,
    /// Answered.
    Resolved,
    /// Closed.
    Closed,
    /// Status not recognized by this client.
    #[serde(other)]
    Unknown,
}

impl std::str::FromStr for TicketStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace('-', "_").as_str() {
            "OPEN" => Ok(Self::Open),
            "IN_PROGRESS" => Ok(Self::InProgress),
            "RESOLVED" => Ok(Self::Resolved),
            "CLOSED" => Ok(Self::Closed),
            other => Err(format!("unknown ticket status: {other}")),
        }
    }
}

/// Ticket priority.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TicketPriority {
    /// Low.
    Low,
    /// Medium.
    #[default]
    Medium,
    /// High.
    High,
    /// Urgent (payment problems).
    Urgent,
}

/// One message in a ticket thread.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TicketMessage {
    /// Author display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    /// Message text.
    #[serde(alias = "message")]
    pub body: String,
    /// Whether staff wrote it.
    #[serde(default)]
    pub is_staff: bool,
    /// Post time.
    #[serde(
        default,
        with = "crate::utils::datetime",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

/// A support ticket.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SupportTicket {
    /// Ticket ID.
    pub id: String,
    /// Subject line.
    pub subject: String,
    /// Category (booking, payment, account, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Status.
    #[serde(default)]
    pub status: TicketStatus,
    /// Priority.
    #[serde(default)]
    pub priority: TicketPriority,
    /// Related booking.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booking_id: Option<String>,
    /// Thread, oldest first.
    #[serde(default)]
    pub messages: Vec<TicketMessage>,
    /// Open time.
    #[serde(
        default,
        with = "crate::utils::datetime",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
    /// Last activity time.
    #[serde(
        default,
        with = "crate::utils::datetime",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Body of the create-ticket operation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateTicketRequest {
    /// Subject line.
    pub subject: String,
    /// Category.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Priority.
    pub priority: TicketPriority,
    /// First message.
    pub message: String,
    /// Related booking.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking_id: Option<String>,
}

// ============ Reviews & notifications (legacy API) ============

/// A property review.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    /// Review ID.
    pub id: String,
    /// Reviewed property.
    pub property_id: String,
    /// Reviewer display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    /// Rating, 1 to 5.
    pub rating: u8,
    /// Comment text.
    #[serde(default)]
    pub comment: String,
    /// Post time.
    #[serde(
        default,
        with = "crate::utils::datetime",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

/// Body of the create-review operation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewRequest {
    /// Reviewed property.
    pub property_id: String,
    /// Reviewer.
    pub user_id: String,
    /// Rating, 1 to 5.
    pub rating: u8,
    /// Comment text.
    pub comment: String,
}

/// An in-app notification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Notification ID.
    pub id: String,
    /// Title.
    pub title: String,
    /// Body.
    #[serde(default)]
    pub message: String,
    /// Whether the user opened it.
    #[serde(default)]
    pub is_read: bool,
    /// Send time.
    #[serde(
        default,
        with = "crate::utils::datetime",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn property(city: &str, price: f64, guests: Option<u32>) -> Property {
        Property {
            id: "p1".into(),
            title: "Studio meublé Bastos".into(),
            description: Some("Calme, proche ambassade".into()),
            property_type: PropertyType::Studio,
            city: city.into(),
            address: None,
            price_per_night: price,
            currency: "XAF".into(),
            max_guests: guests,
            bedrooms: None,
            bathrooms: None,
            images: vec![],
            amenities: vec![],
            host_id: None,
            rating: None,
            review_count: None,
            is_available: true,
            created_at: None,
        }
    }

    #[test]
    fn has_more_computed() {
        let page: PaginatedResponse<u32> = PaginatedResponse::new(vec![1, 2], 1, 2, 5);
        assert!(page.has_more);
        let last: PaginatedResponse<u32> = PaginatedResponse::new(vec![5], 3, 2, 5);
        assert!(!last.has_more);
    }

    #[test]
    fn from_full_list_slices_page() {
        let params = PaginationParams {
            page: 2,
            page_size: 2,
        };
        let page = PaginatedResponse::from_full_list(vec![1, 2, 3, 4, 5], &params);
        assert_eq!(page.items, vec![3, 4]);
        assert_eq!(page.total_count, 5);
        assert!(page.has_more);
    }

    #[test]
    fn validated_clamps() {
        let p = PaginationParams {
            page: 0,
            page_size: 500,
        }
        .validated(50);
        assert_eq!(p.page, 1);
        assert_eq!(p.page_size, 50);
    }

    #[test]
    fn payment_status_mapping() {
        assert!(PaymentStatus::from_raw("COMPLETED").is_success());
        assert!(PaymentStatus::from_raw("successful").is_success());
        assert!(PaymentStatus::from_raw("FAILED").is_terminal());
        assert!(!PaymentStatus::from_raw("FAILED").is_success());
        assert!(PaymentStatus::from_raw("EXPIRED").is_terminal());
        assert!(!PaymentStatus::from_raw("PENDING").is_terminal());
        assert_eq!(
            PaymentStatus::from_raw("INITIATED"),
            PaymentStatus::Other("INITIATED".into())
        );
    }

    #[test]
    fn payment_verification_accepts_status_alias() {
        let v: PaymentVerification = serde_json::from_str(r#"{"status":"SUCCESSFUL"}"#).unwrap();
        assert_eq!(v.payment_status, PaymentStatus::Successful);
    }

    #[test]
    fn booking_wire_format() {
        let json = r#"{
            "_id": "bk_1",
            "propertyId": "p1",
            "checkIn": "2025-07-01",
            "checkOut": "2025-07-04",
            "guests": 2,
            "status": "PENDING",
            "paymentStatus": "PENDING",
            "totalAmount": 75000
        }"#;
        let booking: Booking = serde_json::from_str(json).unwrap();
        assert_eq!(booking.id, "bk_1");
        assert_eq!(booking.nights(), 3);
        assert_eq!(booking.currency, "XAF");
        assert_eq!(booking.total_amount, Some(75000.0));
    }

    #[test]
    fn create_booking_request_is_camel_case() {
        let req = CreateBookingRequest {
            property_id: "p1".into(),
            check_in: NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
            check_out: NaiveDate::from_ymd_opt(2025, 7, 4).unwrap(),
            guests: 2,
            special_requests: None,
            payment_method: MobileMoneyProvider::Orange,
            phone: "237690000000".into(),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["propertyId"], "p1");
        assert_eq!(json["checkIn"], "2025-07-01");
        assert_eq!(json["paymentMethod"], "ORANGE");
        assert!(json.get("specialRequests").is_none());
    }

    #[test]
    fn payout_eligibility_fields() {
        let json = r#"{
            "eligibleAmount": 120000,
            "lockedAmount": 30000,
            "breakdown": {"pendingAmount": 45000}
        }"#;
        let e: PayoutEligibility = serde_json::from_str(json).unwrap();
        assert_eq!(e.eligible_amount, 120_000.0);
        assert_eq!(e.locked_amount, 30_000.0);
        assert_eq!(e.breakdown.pending_amount, 45_000.0);
        assert_eq!(e.breakdown.total_earned, 0.0);
    }

    #[test]
    fn unknown_enum_values_tolerated() {
        let status: BookingStatus = serde_json::from_str(r#""ON_HOLD""#).unwrap();
        assert_eq!(status, BookingStatus::Unknown);
        let kind: PropertyType = serde_json::from_str(r#""castle""#).unwrap();
        assert_eq!(kind, PropertyType::Other);
    }

    #[test]
    fn search_filters_match() {
        let p = property("Yaoundé", 25_000.0, Some(2));
        let mut params = PropertySearchParams {
            city: Some("yaoundé".into()),
            ..Default::default()
        };
        // eq_ignore_ascii_case leaves the accented é as-is on both sides
        assert!(params.matches(&p));
        params.max_price = Some(20_000.0);
        assert!(!params.matches(&p));
        params.max_price = None;
        params.guests = Some(3);
        assert!(!params.matches(&p));
        params.guests = None;
        params.query = Some("bastos".into());
        assert!(params.matches(&p));
    }

    #[test]
    fn login_request_debug_redacts_password() {
        let req = LoginRequest {
            email: "a@b.cm".into(),
            password: "hunter2".into(),
        };
        assert!(!format!("{req:?}").contains("hunter2"));
    }

    #[test]
    fn provider_parsing() {
        assert_eq!("mtn".parse::<MobileMoneyProvider>(), Ok(MobileMoneyProvider::Mtn));
        assert_eq!(
            "orange_money".parse::<MobileMoneyProvider>(),
            Ok(MobileMoneyProvider::Orange)
        );
        assert!("wave".parse::<MobileMoneyProvider>().is_err());
    }
}
