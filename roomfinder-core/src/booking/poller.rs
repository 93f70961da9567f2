//! Cancellable payment verification polling

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use roomfinder_backend::{MarketplaceBackend, PaymentStatus, PaymentVerification};

/// Default delay between verification calls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);
/// Default polling ceiling (≈5 minutes at the default interval).
pub const DEFAULT_MAX_ATTEMPTS: u32 = 100;

/// How often and how long to verify a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollingPolicy {
    /// Delay between two verification calls. The first call is immediate.
    pub interval: Duration,
    /// Number of verification calls before giving up.
    pub max_attempts: u32,
}

impl Default for PollingPolicy {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// How polling ended.
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    /// `COMPLETED` or `SUCCESSFUL`.
    Confirmed(PaymentVerification),
    /// `FAILED`.
    Failed(PaymentVerification),
    /// `EXPIRED`.
    Expired(PaymentVerification),
    /// Ceiling reached without a terminal status.
    TimedOut { attempts: u32 },
    /// The token was cancelled.
    Cancelled { attempts: u32 },
}

/// Calls `verify_payment` until a terminal status, the ceiling or cancellation.
pub struct PaymentPoller {
    backend: Arc<dyn MarketplaceBackend>,
    policy: PollingPolicy,
}

impl PaymentPoller {
    #[must_use]
    pub fn new(backend: Arc<dyn MarketplaceBackend>, policy: PollingPolicy) -> Self {
        Self { backend, policy }
    }

    #[must_use]
    pub fn policy(&self) -> PollingPolicy {
        self.policy
    }

    /// Poll `booking_id`. `on_progress(attempt, max_attempts)` runs after
    /// every completed call.
    ///
    /// Transport errors and non-terminal statuses count as an attempt and
    /// polling continues. No call is started once `cancel` fires, and an
    /// in-flight call is abandoned.
    pub async fn poll<F>(
        &self,
        booking_id: &str,
        cancel: &CancellationToken,
        mut on_progress: F,
    ) -> PollOutcome
    where
        F: FnMut(u32, u32) + Send,
    {
        let max = self.policy.max_attempts;
        for attempt in 1..=max {
            if attempt > 1 {
                tokio::select! {
                    () = cancel.cancelled() => return PollOutcome::Cancelled { attempts: attempt - 1 },
                    () = tokio::time::sleep(self.policy.interval) => {}
                }
            }
            if cancel.is_cancelled() {
                return PollOutcome::Cancelled {
                    attempts: attempt - 1,
                };
            }

            let result = tokio::select! {
                () = cancel.cancelled() => return PollOutcome::Cancelled { attempts: attempt - 1 },
                result = self.backend.verify_payment(booking_id) => result,
            };
            on_progress(attempt, max);

            match result {
                Ok(verification) if verification.payment_status.is_success() => {
                    log::info!("Payment for booking {booking_id} confirmed at attempt {attempt}");
                    return PollOutcome::Confirmed(verification);
                }
                Ok(verification) if verification.payment_status == PaymentStatus::Failed => {
                    log::warn!("Payment for booking {booking_id} failed");
                    return PollOutcome::Failed(verification);
                }
                Ok(verification) if verification.payment_status == PaymentStatus::Expired => {
                    log::warn!("Payment for booking {booking_id} expired");
                    return PollOutcome::Expired(verification);
                }
                Ok(verification) => {
                    log::debug!(
                        "Payment for booking {booking_id}: {} ({attempt}/{max})",
                        verification.payment_status.as_str()
                    );
                }
                Err(e) => {
                    log::warn!("Payment verification {attempt}/{max} for {booking_id} failed: {e}");
                }
            }
        }

        log::warn!("Payment verification for booking {booking_id} timed out after {max} attempts");
        PollOutcome::TimedOut { attempts: max }
    }
}
