//! Bookings of the signed-in guest

use std::sync::Arc;

use roomfinder_backend::{
    Booking, Capability, PaginatedResponse, PaginationParams, PaymentVerification,
};

use crate::booking::{BookingDraft, BookingFlow, BookingSession, PollingPolicy};
use crate::error::{CoreError, CoreResult};
use crate::services::ServiceContext;
use crate::traits::Notifier;

/// Booking service
pub struct BookingService {
    ctx: Arc<ServiceContext>,
    policy: PollingPolicy,
}

impl BookingService {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>, policy: PollingPolicy) -> Self {
        Self { ctx, policy }
    }

    /// Open a booking session for a property.
    ///
    /// With complete `prefill` data the session starts on the summary step.
    pub async fn start_session(
        &self,
        property_id: &str,
        prefill: Option<BookingDraft>,
    ) -> CoreResult<BookingSession> {
        self.ctx.require_user().await?;
        let property = self
            .ctx
            .call(Capability::Listings, |b| async move {
                b.get_property(property_id).await
            })
            .await?;
        if !property.is_available {
            return Err(CoreError::ValidationError(
                "This property is not available for booking".to_string(),
            ));
        }
        Ok(BookingSession::new(property, prefill))
    }

    /// Flow that submits sessions with this service's polling policy.
    #[must_use]
    pub fn flow(&self) -> BookingFlow {
        BookingFlow::new(Arc::clone(&self.ctx), self.policy)
    }

    pub async fn list(&self, params: &PaginationParams) -> CoreResult<PaginatedResponse<Booking>> {
        self.ctx.require_user().await?;
        let params = params.validated(100);
        self.ctx
            .call(Capability::Bookings, |b| async move {
                b.list_bookings(&params).await
            })
            .await
    }

    pub async fn get(&self, booking_id: &str) -> CoreResult<Booking> {
        self.ctx.require_user().await?;
        self.ctx
            .call(Capability::Bookings, |b| async move {
                b.get_booking(booking_id).await
            })
            .await
    }

    pub async fn cancel(&self, booking_id: &str) -> CoreResult<Booking> {
        self.ctx.require_user().await?;
        let booking = self
            .ctx
            .call(Capability::Bookings, |b| async move {
                b.cancel_booking(booking_id).await
            })
            .await?;
        log::info!("Booking {booking_id} cancelled");
        self.ctx.notifier.success("Booking cancelled");
        Ok(booking)
    }

    /// One verification call, outside any polling loop.
    pub async fn verify_payment(&self, booking_id: &str) -> CoreResult<PaymentVerification> {
        self.ctx
            .call(Capability::Payments, |b| async move {
                b.verify_payment(booking_id).await
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use roomfinder_backend::{BookingStatus, MobileMoneyProvider, PaymentStatus};
    use tokio_util::sync::CancellationToken;

    use crate::booking::{BookingStep, NoopObserver};
    use crate::test_utils::{create_signed_in_context, create_test_context};

    fn fast() -> PollingPolicy {
        PollingPolicy {
            interval: Duration::ZERO,
            max_attempts: 10,
        }
    }

    #[tokio::test]
    async fn test_start_session_requires_sign_in() {
        let (ctx, _backend, _) = create_test_context();
        let service = BookingService::new(ctx, fast());
        assert!(matches!(
            service.start_session("p1", None).await,
            Err(CoreError::NotAuthenticated)
        ));
    }

    #[tokio::test]
    async fn test_book_list_and_cancel() {
        let (ctx, rest, _legacy) = create_signed_in_context().await;
        rest.script_payment_statuses(&["PENDING", "SUCCESSFUL"]);
        let service = BookingService::new(ctx, fast());

        let prefill = BookingDraft {
            check_in: chrono::NaiveDate::from_ymd_opt(2030, 1, 5),
            check_out: chrono::NaiveDate::from_ymd_opt(2030, 1, 7),
            guests: 1,
            special_requests: Some("Late arrival".into()),
        };
        let mut session = service.start_session("p2", Some(prefill)).await.unwrap();
        assert_eq!(session.step(), BookingStep::Summary);
        session.continue_to_payment().unwrap();
        session.set_payment_provider(MobileMoneyProvider::Mtn).unwrap();
        session.set_phone("+237 670 00 00 00").unwrap();

        let booking = service
            .flow()
            .submit(&mut session, &CancellationToken::new(), &NoopObserver)
            .await
            .unwrap();
        assert_eq!(booking.property_id, "p2");
        assert_eq!(booking.payment_status, PaymentStatus::Successful);
        assert_eq!(booking.payment_reference.as_deref(), Some("TX-bk_1"));

        let page = service.list(&PaginationParams::default()).await.unwrap();
        assert_eq!(page.total_count, 1);
        assert_eq!(
            page.items[0].special_requests.as_deref(),
            Some("Late arrival")
        );

        let cancelled = service.cancel(&booking.id).await.unwrap();
        assert_eq!(cancelled.status, BookingStatus::Cancelled);
    }

    #[tokio::test]
    async fn test_get_unknown_booking() {
        let (ctx, _rest, _legacy) = create_signed_in_context().await;
        let service = BookingService::new(ctx, fast());
        let err = service.get("bk_404").await.unwrap_err();
        assert_eq!(err.user_message(), "Booking not found.");
    }
}
