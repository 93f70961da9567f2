//! Host verification and payout details

use std::sync::Arc;

use roomfinder_backend::{Capability, HostOnboardingRequest, HostProfile, VerificationStatus};

use crate::error::{CoreError, CoreResult};
use crate::services::ServiceContext;
use crate::traits::Notifier;
use crate::validation;

/// Host onboarding service
pub struct HostOnboardingService {
    ctx: Arc<ServiceContext>,
}

impl HostOnboardingService {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    pub async fn profile(&self) -> CoreResult<HostProfile> {
        self.ctx.require_user().await?;
        self.ctx
            .call(Capability::HostOnboarding, |b| async move {
                b.get_host_profile().await
            })
            .await
    }

    /// Send the onboarding form. Refused while a review is pending or once verified.
    pub async fn submit(&self, req: &HostOnboardingRequest) -> CoreResult<HostProfile> {
        let req = validation::validate_onboarding(req)?;
        let current = self.profile().await?;
        match current.verification_status {
            VerificationStatus::Pending => {
                return Err(CoreError::ValidationError(
                    "Your documents are already under review".to_string(),
                ));
            }
            VerificationStatus::Verified => {
                return Err(CoreError::ValidationError(
                    "Your host account is already verified".to_string(),
                ));
            }
            _ => {}
        }

        let profile = self
            .ctx
            .call(Capability::HostOnboarding, |b| async move {
                b.submit_host_onboarding(&req).await
            })
            .await?;
        log::info!(
            "Host onboarding submitted for {}: {:?}",
            profile.user_id,
            profile.verification_status
        );
        self.ctx
            .notifier
            .success("Documents submitted. We will review them shortly.");
        Ok(profile)
    }
}
