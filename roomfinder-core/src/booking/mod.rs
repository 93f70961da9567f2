//! Booking session, payment polling and the flow that ties them together

mod flow;
mod poller;
mod session;

pub use flow::{BookingFlow, BookingObserver, NoopObserver, PaymentTask};
pub use poller::{
    DEFAULT_MAX_ATTEMPTS, DEFAULT_POLL_INTERVAL, PaymentPoller, PollOutcome, PollingPolicy,
};
pub use session::{
    BOOKINGS_DASHBOARD_ROUTE, BookingDraft, BookingSession, BookingStep, PaymentForm,
    PollProgress, PriceSummary,
};
