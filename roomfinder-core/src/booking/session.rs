//! Booking session step machine
//!
//! `Details → Summary → Payment → Processing → Success | Error`
//!
//! The session only holds form values and step state. Network work for the
//! `Processing` step is driven by [`BookingFlow`](super::BookingFlow).

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use roomfinder_backend::{Booking, CreateBookingRequest, MobileMoneyProvider, Property};

use crate::error::{CoreError, CoreResult};
use crate::validation;

/// Route the front end navigates to after a confirmed booking.
pub const BOOKINGS_DASHBOARD_ROUTE: &str = "/dashboard/bookings";

/// Step of a booking session.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStep {
    Details,
    Summary,
    Payment,
    Processing,
    Success,
    Error,
}

impl fmt::Display for BookingStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Details => "details",
            Self::Summary => "summary",
            Self::Payment => "payment",
            Self::Processing => "processing",
            Self::Success => "success",
            Self::Error => "error",
        };
        f.write_str(name)
    }
}

/// Booking data entered on the details step.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BookingDraft {
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    pub guests: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_requests: Option<String>,
}

impl Default for BookingDraft {
    fn default() -> Self {
        Self {
            check_in: None,
            check_out: None,
            guests: 1,
            special_requests: None,
        }
    }
}

impl BookingDraft {
    /// Both dates set and at least one guest.
    #[must_use]
    pub fn is_prefilled(&self) -> bool {
        self.check_in.is_some() && self.check_out.is_some() && self.guests > 0
    }
}

/// Payment step form.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentForm {
    pub provider: Option<MobileMoneyProvider>,
    pub phone: String,
}

/// Nightly price times nights. Fees come from the created booking.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PriceSummary {
    pub nights: u32,
    pub nightly_price: f64,
    pub subtotal: f64,
    pub currency: String,
}

/// Payment polling progress.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PollProgress {
    pub attempt: u32,
    pub max_attempts: u32,
}

/// One booking attempt for one property.
#[derive(Debug, Clone)]
pub struct BookingSession {
    property: Property,
    initial_step: BookingStep,
    step: BookingStep,
    draft: BookingDraft,
    payment: PaymentForm,
    booking: Option<Booking>,
    error: Option<String>,
    progress: Option<PollProgress>,
}

impl BookingSession {
    /// Start a session. Prefilled booking data skips the details step.
    #[must_use]
    pub fn new(property: Property, prefill: Option<BookingDraft>) -> Self {
        let draft = prefill.unwrap_or_default();
        let initial_step = if draft.is_prefilled() {
            BookingStep::Summary
        } else {
            BookingStep::Details
        };
        Self {
            property,
            initial_step,
            step: initial_step,
            draft,
            payment: PaymentForm::default(),
            booking: None,
            error: None,
            progress: None,
        }
    }

    #[must_use]
    pub fn step(&self) -> BookingStep {
        self.step
    }

    #[must_use]
    pub fn initial_step(&self) -> BookingStep {
        self.initial_step
    }

    #[must_use]
    pub fn property(&self) -> &Property {
        &self.property
    }

    #[must_use]
    pub fn draft(&self) -> &BookingDraft {
        &self.draft
    }

    #[must_use]
    pub fn payment(&self) -> &PaymentForm {
        &self.payment
    }

    /// Booking created for this attempt, if any.
    #[must_use]
    pub fn booking(&self) -> Option<&Booking> {
        self.booking.as_ref()
    }

    /// Error text shown on the error step.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub fn progress(&self) -> Option<PollProgress> {
        self.progress
    }

    /// Where to navigate once the booking is confirmed.
    #[must_use]
    pub fn redirect_route(&self) -> Option<&'static str> {
        (self.step == BookingStep::Success).then_some(BOOKINGS_DASHBOARD_ROUTE)
    }

    /// `None` until both dates are set and in order.
    #[must_use]
    pub fn price_summary(&self) -> Option<PriceSummary> {
        let nights = (self.draft.check_out? - self.draft.check_in?).num_days();
        let nights = u32::try_from(nights).ok().filter(|n| *n > 0)?;
        Some(PriceSummary {
            nights,
            nightly_price: self.property.price_per_night,
            subtotal: f64::from(nights) * self.property.price_per_night,
            currency: self.property.currency.clone(),
        })
    }

    // ---- Form edits ----

    fn ensure_editable(&self, action: &str) -> CoreResult<()> {
        match self.step {
            BookingStep::Details | BookingStep::Summary | BookingStep::Payment => Ok(()),
            _ => Err(self.invalid(action)),
        }
    }

    fn invalid(&self, action: &str) -> CoreError {
        CoreError::InvalidTransition {
            from: self.step,
            action: action.to_string(),
        }
    }

    pub fn set_dates(
        &mut self,
        check_in: Option<NaiveDate>,
        check_out: Option<NaiveDate>,
    ) -> CoreResult<()> {
        self.ensure_editable("change dates")?;
        self.draft.check_in = check_in;
        self.draft.check_out = check_out;
        Ok(())
    }

    pub fn set_guests(&mut self, guests: u32) -> CoreResult<()> {
        self.ensure_editable("change guests")?;
        self.draft.guests = guests;
        Ok(())
    }

    pub fn set_special_requests(&mut self, requests: Option<String>) -> CoreResult<()> {
        self.ensure_editable("change special requests")?;
        self.draft.special_requests = requests.filter(|r| !r.trim().is_empty());
        Ok(())
    }

    pub fn set_payment_provider(&mut self, provider: MobileMoneyProvider) -> CoreResult<()> {
        self.ensure_editable("choose a payment method")?;
        self.payment.provider = Some(provider);
        Ok(())
    }

    pub fn set_phone(&mut self, phone: impl Into<String>) -> CoreResult<()> {
        self.ensure_editable("change the phone number")?;
        self.payment.phone = phone.into();
        Ok(())
    }

    // ---- Transitions ----

    fn validate_details(&self) -> CoreResult<(NaiveDate, NaiveDate)> {
        Ok(validation::validate_booking_details(
            self.draft.check_in,
            self.draft.check_out,
            self.draft.guests,
            self.property.max_guests,
        )?)
    }

    /// `Details → Summary`
    pub fn continue_to_summary(&mut self) -> CoreResult<()> {
        if self.step != BookingStep::Details {
            return Err(self.invalid("continue to summary"));
        }
        self.validate_details()?;
        self.step = BookingStep::Summary;
        Ok(())
    }

    /// `Summary → Payment`, dates re-validated.
    pub fn continue_to_payment(&mut self) -> CoreResult<()> {
        if self.step != BookingStep::Summary {
            return Err(self.invalid("continue to payment"));
        }
        self.validate_details()?;
        self.step = BookingStep::Payment;
        Ok(())
    }

    /// `Summary → Details` or `Payment → Summary`.
    pub fn back(&mut self) -> CoreResult<()> {
        self.step = match self.step {
            BookingStep::Summary => BookingStep::Details,
            BookingStep::Payment => BookingStep::Summary,
            _ => return Err(self.invalid("go back")),
        };
        Ok(())
    }

    /// `Payment → Processing`. Returns the request to send; the phone is
    /// normalized in place.
    pub fn begin_processing(&mut self) -> CoreResult<CreateBookingRequest> {
        if self.step != BookingStep::Payment {
            return Err(self.invalid("submit payment"));
        }
        let (check_in, check_out) = self.validate_details()?;
        let (provider, phone) =
            validation::validate_payment(self.payment.provider, &self.payment.phone)?;

        self.payment.phone.clone_from(&phone);
        self.step = BookingStep::Processing;
        self.booking = None;
        self.error = None;
        self.progress = None;

        Ok(CreateBookingRequest {
            property_id: self.property.id.clone(),
            check_in,
            check_out,
            guests: self.draft.guests,
            special_requests: self.draft.special_requests.clone(),
            payment_method: provider,
            phone,
        })
    }

    pub(crate) fn record_booking(&mut self, booking: Booking) {
        if self.step == BookingStep::Processing {
            self.booking = Some(booking);
        }
    }

    pub(crate) fn record_progress(&mut self, attempt: u32, max_attempts: u32) {
        if self.step == BookingStep::Processing {
            self.progress = Some(PollProgress {
                attempt,
                max_attempts,
            });
        }
    }

    /// `Processing → Success`, with the confirmed booking.
    pub(crate) fn succeed(&mut self, booking: Booking) -> CoreResult<()> {
        if self.step != BookingStep::Processing {
            return Err(self.invalid("confirm payment"));
        }
        self.booking = Some(booking);
        self.step = BookingStep::Success;
        Ok(())
    }

    /// `Processing → Error`
    pub(crate) fn fail(&mut self, message: impl Into<String>) -> CoreResult<()> {
        if self.step != BookingStep::Processing {
            return Err(self.invalid("fail"));
        }
        self.error = Some(message.into());
        self.step = BookingStep::Error;
        Ok(())
    }

    /// `Error → Details`. Clears the attempt, keeps the entered values.
    pub fn retry(&mut self) -> CoreResult<()> {
        if self.step != BookingStep::Error {
            return Err(self.invalid("retry"));
        }
        self.booking = None;
        self.error = None;
        self.progress = None;
        self.step = BookingStep::Details;
        Ok(())
    }

    /// Back to the initial step with no attempt state.
    ///
    /// In-flight polling is stopped by cancelling its token, not here.
    pub fn close(&mut self) {
        self.booking = None;
        self.error = None;
        self.progress = None;
        self.step = self.initial_step;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{booking_fixture, property_fixture};

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2030, 6, d).unwrap()
    }

    fn prefill() -> BookingDraft {
        BookingDraft {
            check_in: Some(date(10)),
            check_out: Some(date(13)),
            guests: 2,
            special_requests: None,
        }
    }

    fn at_payment() -> BookingSession {
        let mut session = BookingSession::new(property_fixture(), Some(prefill()));
        session.continue_to_payment().unwrap();
        session.set_payment_provider(MobileMoneyProvider::Mtn).unwrap();
        session.set_phone("6 70 00 00 00").unwrap();
        session
    }

    #[test]
    fn test_prefilled_starts_at_summary() {
        let session = BookingSession::new(property_fixture(), Some(prefill()));
        assert_eq!(session.step(), BookingStep::Summary);

        let session = BookingSession::new(property_fixture(), None);
        assert_eq!(session.step(), BookingStep::Details);

        let partial = BookingDraft {
            check_out: None,
            ..prefill()
        };
        let session = BookingSession::new(property_fixture(), Some(partial));
        assert_eq!(session.step(), BookingStep::Details);
    }

    #[test]
    fn test_summary_blocked_without_dates() {
        let mut session = BookingSession::new(property_fixture(), None);
        session.set_dates(Some(date(10)), None).unwrap();

        let err = session.continue_to_summary().unwrap_err();
        let CoreError::InvalidInput(fields) = err else {
            panic!("expected InvalidInput, got {err:?}");
        };
        assert!(fields.get("checkOut").is_some());
        assert_eq!(session.step(), BookingStep::Details);

        session.set_dates(None, Some(date(12))).unwrap();
        assert!(session.continue_to_summary().is_err());
        assert_eq!(session.step(), BookingStep::Details);

        session.set_dates(Some(date(10)), Some(date(12))).unwrap();
        session.continue_to_summary().unwrap();
        assert_eq!(session.step(), BookingStep::Summary);
    }

    #[test]
    fn test_capacity_checked() {
        let mut session = BookingSession::new(property_fixture(), Some(prefill()));
        session.set_guests(9).unwrap();
        assert!(matches!(
            session.continue_to_payment(),
            Err(CoreError::InvalidInput(_))
        ));
        assert_eq!(session.step(), BookingStep::Summary);
    }

    #[test]
    fn test_back_navigation() {
        let mut session = at_payment();
        session.back().unwrap();
        assert_eq!(session.step(), BookingStep::Summary);
        session.back().unwrap();
        assert_eq!(session.step(), BookingStep::Details);
        assert!(matches!(
            session.back(),
            Err(CoreError::InvalidTransition {
                from: BookingStep::Details,
                ..
            })
        ));
    }

    #[test]
    fn test_invalid_transition_keeps_state() {
        let mut session = BookingSession::new(property_fixture(), None);
        assert!(session.continue_to_payment().is_err());
        assert!(session.begin_processing().is_err());
        assert!(session.retry().is_err());
        assert_eq!(session.step(), BookingStep::Details);
    }

    #[test]
    fn test_begin_processing_builds_request() {
        let mut session = at_payment();
        let req = session.begin_processing().unwrap();
        assert_eq!(session.step(), BookingStep::Processing);
        assert_eq!(req.property_id, "p1");
        assert_eq!(req.check_in, date(10));
        assert_eq!(req.guests, 2);
        assert_eq!(req.phone, "237670000000");
        assert_eq!(req.payment_method, MobileMoneyProvider::Mtn);

        // no form edits while processing
        assert!(session.set_guests(3).is_err());
    }

    #[test]
    fn test_payment_requires_phone_and_provider() {
        let mut session = BookingSession::new(property_fixture(), Some(prefill()));
        session.continue_to_payment().unwrap();
        session.set_phone("12345").unwrap();
        let err = session.begin_processing().unwrap_err();
        let CoreError::InvalidInput(fields) = err else {
            panic!("expected InvalidInput, got {err:?}");
        };
        assert!(fields.get("phone").is_some());
        assert!(fields.get("paymentMethod").is_some());
        assert_eq!(session.step(), BookingStep::Payment);
    }

    #[test]
    fn test_retry_clears_attempt_keeps_values() {
        let mut session = at_payment();
        session.begin_processing().unwrap();
        session.record_booking(booking_fixture("bk_1"));
        session.record_progress(12, 100);
        session.fail("Payment failed").unwrap();
        assert_eq!(session.step(), BookingStep::Error);
        assert_eq!(session.error(), Some("Payment failed"));

        session.retry().unwrap();
        assert_eq!(session.step(), BookingStep::Details);
        assert!(session.booking().is_none());
        assert!(session.error().is_none());
        assert!(session.progress().is_none());
        assert_eq!(session.draft(), &prefill());
        assert_eq!(session.payment().phone, "237670000000");
    }

    #[test]
    fn test_success_exposes_redirect() {
        let mut session = at_payment();
        assert!(session.redirect_route().is_none());
        session.begin_processing().unwrap();
        session.succeed(booking_fixture("bk_1")).unwrap();
        assert_eq!(session.step(), BookingStep::Success);
        assert_eq!(session.redirect_route(), Some("/dashboard/bookings"));
        assert!(session.fail("late").is_err());
    }

    #[test]
    fn test_close_returns_to_initial_step() {
        let mut session = at_payment();
        session.begin_processing().unwrap();
        session.record_progress(3, 100);
        session.close();
        assert_eq!(session.step(), BookingStep::Summary);
        assert!(session.progress().is_none());
    }

    #[test]
    fn test_price_summary() {
        let session = BookingSession::new(property_fixture(), Some(prefill()));
        let summary = session.price_summary().unwrap();
        assert_eq!(summary.nights, 3);
        assert_eq!(summary.subtotal, 75_000.0);
        assert_eq!(summary.currency, "XAF");

        let session = BookingSession::new(property_fixture(), None);
        assert!(session.price_summary().is_none());
    }
}
