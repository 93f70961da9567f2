//! Client-side form validation
//!
//! Shape checks run before anything is POSTed. Every check collects all
//! failing fields into a [`FieldErrors`] instead of stopping at the first.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use roomfinder_backend::{
    ArticleDraft, CreateTicketRequest, HostOnboardingRequest, MobileMoneyProvider,
    PayoutEligibility, PropertyDraft, RegisterRequest,
};

use crate::error::CoreError;

/// Cameroon country calling code.
const COUNTRY_CODE: &str = "237";
/// Minimum password length accepted at registration.
const MIN_PASSWORD_LEN: usize = 8;
/// Longest review comment accepted by the legacy API.
const MAX_REVIEW_LEN: usize = 1000;
const MAX_SUBJECT_LEN: usize = 150;

/// Field name → message, ordered by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error; the first message for a field wins.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_insert_with(|| message.into());
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Message for one field.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Message of the first field in order.
    #[must_use]
    pub fn first_message(&self) -> Option<&str> {
        self.0.values().next().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// `Ok(value)` when nothing was recorded.
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

impl From<FieldErrors> for CoreError {
    fn from(errors: FieldErrors) -> Self {
        Self::InvalidInput(errors)
    }
}

fn require(errors: &mut FieldErrors, field: &str, value: &str, message: &str) {
    if value.trim().is_empty() {
        errors.add(field, message);
    }
}

// ============ Phone ============

/// Normalize a Cameroonian mobile number to `237XXXXXXXXX`.
///
/// Accepts an optional `+237` / `237` prefix and common separators
/// (spaces, dashes, dots, parentheses). The local part must be 9 digits
/// starting with `6`.
#[must_use]
pub fn normalize_phone(input: &str) -> Option<String> {
    let mut digits = String::with_capacity(input.len());
    for (i, c) in input.trim().chars().enumerate() {
        match c {
            '0'..='9' => digits.push(c),
            ' ' | '-' | '.' | '(' | ')' => {}
            '+' if i == 0 => {}
            _ => return None,
        }
    }

    let local = match digits.len() {
        12 => digits.strip_prefix(COUNTRY_CODE)?,
        9 => digits.as_str(),
        _ => return None,
    };
    if !local.starts_with('6') {
        return None;
    }
    Some(format!("{COUNTRY_CODE}{local}"))
}

fn check_phone(errors: &mut FieldErrors, field: &str, input: &str) -> Option<String> {
    if input.trim().is_empty() {
        errors.add(field, "Phone number is required");
        return None;
    }
    let normalized = normalize_phone(input);
    if normalized.is_none() {
        errors.add(
            field,
            "Enter a valid Cameroonian mobile number (e.g. 6XX XXX XXX)",
        );
    }
    normalized
}

fn looks_like_email(input: &str) -> bool {
    let Some((local, domain)) = input.trim().split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
}

// ============ Booking ============

/// Dates and guest count of the booking details step.
///
/// `max_guests` is the property's capacity when known.
pub fn validate_booking_details(
    check_in: Option<NaiveDate>,
    check_out: Option<NaiveDate>,
    guests: u32,
    max_guests: Option<u32>,
) -> Result<(NaiveDate, NaiveDate), FieldErrors> {
    let mut errors = FieldErrors::new();
    if check_in.is_none() {
        errors.add("checkIn", "Select a check-in date");
    }
    if check_out.is_none() {
        errors.add("checkOut", "Select a check-out date");
    }
    if let (Some(ci), Some(co)) = (check_in, check_out) {
        if co <= ci {
            errors.add("checkOut", "Check-out must be after check-in");
        }
    }
    if guests == 0 {
        errors.add("guests", "At least one guest is required");
    } else if let Some(max) = max_guests.filter(|m| guests > *m) {
        errors.add("guests", format!("This property accepts at most {max} guests"));
    }

    match (check_in, check_out) {
        (Some(ci), Some(co)) if errors.is_empty() => Ok((ci, co)),
        _ => Err(errors),
    }
}

/// Payment step: provider selected and phone valid. Returns the normalized phone.
pub fn validate_payment(
    provider: Option<MobileMoneyProvider>,
    phone: &str,
) -> Result<(MobileMoneyProvider, String), FieldErrors> {
    let mut errors = FieldErrors::new();
    if provider.is_none() {
        errors.add("paymentMethod", "Choose MTN Mobile Money or Orange Money");
    }
    let phone = check_phone(&mut errors, "phone", phone);
    match (provider, phone) {
        (Some(provider), Some(phone)) if errors.is_empty() => Ok((provider, phone)),
        _ => Err(errors),
    }
}

// ============ Auth ============

pub fn validate_login(email: &str, password: &str) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    if !looks_like_email(email) {
        errors.add("email", "Enter a valid email address");
    }
    require(&mut errors, "password", password, "Password is required");
    errors.into_result(())
}

/// Returns a copy with the phone normalized.
pub fn validate_registration(req: &RegisterRequest) -> Result<RegisterRequest, FieldErrors> {
    let mut errors = FieldErrors::new();
    require(&mut errors, "fullName", &req.full_name, "Full name is required");
    if !looks_like_email(&req.email) {
        errors.add("email", "Enter a valid email address");
    }
    let phone = check_phone(&mut errors, "phone", &req.phone);
    if req.password.chars().count() < MIN_PASSWORD_LEN {
        errors.add(
            "password",
            format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
        );
    }

    let mut normalized = req.clone();
    normalized.full_name = req.full_name.trim().to_string();
    normalized.email = req.email.trim().to_ascii_lowercase();
    normalized.phone = phone.unwrap_or_default();
    errors.into_result(normalized)
}

// ============ Listings ============

pub fn validate_property_draft(draft: &PropertyDraft) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    require(&mut errors, "title", &draft.title, "Title is required");
    require(
        &mut errors,
        "description",
        &draft.description,
        "Description is required",
    );
    require(&mut errors, "city", &draft.city, "City is required");
    if !(draft.price_per_night.is_finite() && draft.price_per_night > 0.0) {
        errors.add("pricePerNight", "Price per night must be greater than 0");
    }
    if draft.max_guests == 0 {
        errors.add("maxGuests", "At least one guest must be allowed");
    }
    errors.into_result(())
}

// ============ Host ============

/// Returns a copy with the payout phone normalized.
pub fn validate_onboarding(
    req: &HostOnboardingRequest,
) -> Result<HostOnboardingRequest, FieldErrors> {
    let mut errors = FieldErrors::new();
    require(
        &mut errors,
        "idDocumentType",
        &req.id_document_type,
        "Select an ID document type",
    );
    require(
        &mut errors,
        "idDocumentNumber",
        &req.id_document_number,
        "ID document number is required",
    );
    require(
        &mut errors,
        "accountName",
        &req.payout.account_name,
        "Account holder name is required",
    );
    let phone = check_phone(&mut errors, "payoutPhone", &req.payout.phone);

    let mut normalized = req.clone();
    normalized.payout.phone = phone.unwrap_or_default();
    errors.into_result(normalized)
}

/// Amount against the current eligibility. Returns the normalized phone.
pub fn validate_payout(
    amount: f64,
    phone: &str,
    eligibility: &PayoutEligibility,
) -> Result<String, FieldErrors> {
    let mut errors = FieldErrors::new();
    if !(amount.is_finite() && amount > 0.0) {
        errors.add("amount", "Enter an amount greater than 0");
    } else if amount > eligibility.eligible_amount {
        errors.add(
            "amount",
            format!(
                "Amount exceeds your available balance of {} {}",
                eligibility.eligible_amount, eligibility.currency
            ),
        );
    } else if let Some(min) = eligibility.minimum_amount.filter(|m| amount < *m) {
        errors.add(
            "amount",
            format!("Minimum payout is {min} {}", eligibility.currency),
        );
    }
    let phone = check_phone(&mut errors, "phone", phone);
    errors.into_result(phone.unwrap_or_default())
}

// ============ Support ============

pub fn validate_ticket(req: &CreateTicketRequest) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    require(&mut errors, "subject", &req.subject, "Subject is required");
    if req.subject.chars().count() > MAX_SUBJECT_LEN {
        errors.add(
            "subject",
            format!("Subject must be at most {MAX_SUBJECT_LEN} characters"),
        );
    }
    require(
        &mut errors,
        "message",
        &req.message,
        "Describe your issue",
    );
    errors.into_result(())
}

pub fn validate_reply(message: &str) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    require(&mut errors, "message", message, "Reply cannot be empty");
    errors.into_result(())
}

// ============ Content ============

/// Build a URL slug from a title: lowercase ASCII, French accents folded,
/// everything else collapsed to single hyphens.
#[must_use]
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;
    for c in title.chars().flat_map(char::to_lowercase) {
        let folded = match c {
            'à' | 'â' | 'ä' | 'á' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'î' | 'ï' | 'í' => 'i',
            'ô' | 'ö' | 'ó' => 'o',
            'ù' | 'û' | 'ü' | 'ú' => 'u',
            'ç' => 'c',
            'ÿ' => 'y',
            c => c,
        };
        if folded.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            slug.push(folded);
            pending_dash = false;
        } else {
            pending_dash = true;
        }
    }
    slug
}

fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && !slug.contains("--")
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

pub fn validate_article(draft: &ArticleDraft) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    require(&mut errors, "title", &draft.title, "Title is required");
    require(&mut errors, "content", &draft.content, "Content is required");
    if !draft.slug.is_empty() && !is_valid_slug(&draft.slug) {
        errors.add(
            "slug",
            "Use lowercase letters, digits and single hyphens only",
        );
    }
    errors.into_result(())
}

// ============ Reviews ============

pub fn validate_review(rating: u8, comment: &str) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    if !(1..=5).contains(&rating) {
        errors.add("rating", "Rating must be between 1 and 5");
    }
    if comment.chars().count() > MAX_REVIEW_LEN {
        errors.add(
            "comment",
            format!("Comment must be at most {MAX_REVIEW_LEN} characters"),
        );
    }
    errors.into_result(())
}
