//! Host payouts

use std::sync::Arc;

use roomfinder_backend::{
    Capability, CreatePayoutRequest, MobileMoneyProvider, PaginatedResponse, PaginationParams,
    PayoutEligibility, PayoutRequest,
};

use crate::error::CoreResult;
use crate::services::ServiceContext;
use crate::traits::Notifier;
use crate::validation;

/// Payout service
pub struct PayoutService {
    ctx: Arc<ServiceContext>,
}

impl PayoutService {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// Amount available for withdrawal and what is still locked.
    pub async fn eligibility(&self) -> CoreResult<PayoutEligibility> {
        self.ctx.require_user().await?;
        self.ctx
            .call(Capability::Payouts, |b| async move {
                b.get_payout_eligibility().await
            })
            .await
    }

    /// Request a payout, checked against a fresh eligibility.
    pub async fn request(
        &self,
        amount: f64,
        provider: MobileMoneyProvider,
        phone: &str,
    ) -> CoreResult<PayoutRequest> {
        let eligibility = self.eligibility().await?;
        let phone = validation::validate_payout(amount, phone, &eligibility)?;
        let req = CreatePayoutRequest {
            amount,
            provider,
            phone,
        };

        let payout = self
            .ctx
            .call(Capability::Payouts, |b| async move {
                b.request_payout(&req).await
            })
            .await?;
        log::info!("Payout {} requested: {} {}", payout.id, payout.amount, payout.currency);
        self.ctx.notifier.success("Payout requested");
        Ok(payout)
    }

    pub async fn list(
        &self,
        params: &PaginationParams,
    ) -> CoreResult<PaginatedResponse<PayoutRequest>> {
        self.ctx.require_user().await?;
        let params = params.validated(100);
        self.ctx
            .call(Capability::Payouts, |b| async move {
                b.list_payouts(&params).await
            })
            .await
    }
}
