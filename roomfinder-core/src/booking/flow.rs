//! Booking submission: create the booking, then poll its payment

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::{CancellationToken, DropGuard};

use roomfinder_backend::{Booking, BookingStatus, Capability, CreateBookingRequest};

use crate::error::{CoreError, CoreResult};
use crate::services::ServiceContext;
use crate::traits::Notifier;

use super::poller::{PaymentPoller, PollOutcome, PollingPolicy};
use super::session::{BookingSession, BookingStep};

/// Receives booking flow events. All methods default to no-ops.
pub trait BookingObserver: Send + Sync {
    fn on_step(&self, _step: BookingStep) {}

    fn on_progress(&self, _attempt: u32, _max_attempts: u32) {}

    /// Called once, with the booking as stored in the session.
    fn on_success(&self, _booking: &Booking) {}
}

/// Observer that ignores every event.
pub struct NoopObserver;

impl BookingObserver for NoopObserver {}

/// Drives `Payment → Processing → Success | Error`.
#[derive(Clone)]
pub struct BookingFlow {
    ctx: Arc<ServiceContext>,
    policy: PollingPolicy,
}

impl BookingFlow {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>, policy: PollingPolicy) -> Self {
        Self { ctx, policy }
    }

    #[must_use]
    pub fn policy(&self) -> PollingPolicy {
        self.policy
    }

    /// Submit the payment step of `session`.
    ///
    /// On success the session is on [`BookingStep::Success`] and holds the
    /// confirmed booking. On failure it is on [`BookingStep::Error`] with the
    /// user message set, except for validation errors (session unchanged)
    /// and cancellation (session closed).
    pub async fn submit(
        &self,
        session: &mut BookingSession,
        cancel: &CancellationToken,
        observer: &dyn BookingObserver,
    ) -> CoreResult<Booking> {
        let request = session.begin_processing()?;
        observer.on_step(BookingStep::Processing);

        let created = tokio::select! {
            () = cancel.cancelled() => Err(CoreError::Cancelled),
            created = self.create(&request) => created,
        };
        let booking = match created {
            Ok(booking) => booking,
            Err(e) => return Err(self.abort(session, observer, e)),
        };
        log::info!(
            "Booking {} created for property {}, waiting for payment",
            booking.id,
            booking.property_id
        );
        session.record_booking(booking.clone());

        let payments = match self.ctx.backend_for(Capability::Payments).await {
            Ok(backend) => backend,
            Err(e) => return Err(self.abort(session, observer, e)),
        };
        let poller = PaymentPoller::new(payments, self.policy);
        let outcome = poller
            .poll(&booking.id, cancel, |attempt, max| {
                session.record_progress(attempt, max);
                observer.on_progress(attempt, max);
            })
            .await;

        let err = match outcome {
            PollOutcome::Confirmed(verification) => {
                let mut booking = booking;
                booking.payment_status = verification.payment_status;
                booking.status = BookingStatus::Confirmed;
                if verification.transaction_id.is_some() {
                    booking.payment_reference = verification.transaction_id;
                }
                let stored = booking.clone();
                session.succeed(booking)?;
                observer.on_step(BookingStep::Success);
                observer.on_success(&stored);
                self.ctx.notifier.success("Booking confirmed!");
                return Ok(stored);
            }
            PollOutcome::Failed(verification) => CoreError::PaymentFailed(
                verification
                    .message
                    .unwrap_or_else(|| verification.payment_status.as_str().to_string()),
            ),
            PollOutcome::Expired(_) => CoreError::PaymentExpired,
            PollOutcome::TimedOut { attempts } => CoreError::PaymentTimeout { attempts },
            PollOutcome::Cancelled { .. } => CoreError::Cancelled,
        };
        Err(self.abort(session, observer, err))
    }

    async fn create(&self, request: &CreateBookingRequest) -> CoreResult<Booking> {
        let backend = self.ctx.backend_for(Capability::Bookings).await?;
        match backend.create_booking(request).await {
            Ok(booking) => Ok(booking),
            Err(e) => Err(self.ctx.handle_backend_error(e).await),
        }
    }

    /// Move the session off `Processing` for `err`.
    fn abort(
        &self,
        session: &mut BookingSession,
        observer: &dyn BookingObserver,
        err: CoreError,
    ) -> CoreError {
        if matches!(err, CoreError::Cancelled) {
            log::info!("Booking flow cancelled");
            session.close();
        } else {
            if err.is_expected() {
                log::warn!("Booking flow failed: {err}");
            } else {
                log::error!("Booking flow failed: {err}");
            }
            let message = err.user_message();
            if session.fail(message.as_str()).is_ok() {
                self.ctx.notifier.error(&message);
            }
        }
        observer.on_step(session.step());
        err
    }

    /// Run [`submit`](Self::submit) on a task.
    ///
    /// The task stops when `parent` is cancelled or the returned handle is
    /// dropped.
    pub fn spawn(
        &self,
        mut session: BookingSession,
        parent: &CancellationToken,
        observer: Arc<dyn BookingObserver>,
    ) -> PaymentTask {
        let token = parent.child_token();
        let flow = self.clone();
        let task_token = token.clone();
        let handle = tokio::spawn(async move {
            let result = flow
                .submit(&mut session, &task_token, observer.as_ref())
                .await;
            (session, result)
        });
        PaymentTask {
            handle,
            token: token.clone(),
            guard: token.drop_guard(),
        }
    }
}

/// Handle to a spawned booking flow. Dropping it cancels the flow.
pub struct PaymentTask {
    handle: JoinHandle<(BookingSession, CoreResult<Booking>)>,
    token: CancellationToken,
    guard: DropGuard,
}

impl PaymentTask {
    /// Stop polling. The session comes back closed from [`join`](Self::join).
    pub fn cancel(&self) {
        self.token.cancel();
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the flow and take back the session.
    ///
    /// A panic inside the flow or an observer is reported as
    /// [`CoreError::TaskFailed`]; the session is lost with it.
    pub async fn join(self) -> CoreResult<(BookingSession, CoreResult<Booking>)> {
        let Self { handle, guard, .. } = self;
        let joined = handle.await;
        let _ = guard.disarm();
        joined.map_err(|e| {
            if e.is_cancelled() {
                log::warn!("Booking task aborted: {e}");
                CoreError::Cancelled
            } else {
                log::error!("Booking task panicked: {e}");
                CoreError::TaskFailed(e.to_string())
            }
        })
    }
}
