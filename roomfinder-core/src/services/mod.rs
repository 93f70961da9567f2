//! Business logic service layer

mod auth_service;
mod booking_service;
mod content_service;
mod favorite_service;
mod host_onboarding_service;
mod notification_service;
mod payout_service;
mod property_service;
mod review_service;
mod support_service;

pub use auth_service::AuthService;
pub use booking_service::BookingService;
pub use content_service::ContentService;
pub use favorite_service::FavoriteService;
pub use host_onboarding_service::HostOnboardingService;
pub use notification_service::NotificationService;
pub use payout_service::PayoutService;
pub use property_service::PropertyService;
pub use review_service::ReviewService;
pub use support_service::SupportService;

use std::future::Future;
use std::sync::Arc;

use roomfinder_backend::{
    AuthSession, BackendError, Capability, MarketplaceBackend, Result as BackendResult, User,
};

use crate::error::{CoreError, CoreResult};
use crate::traits::{BackendRegistry, Notifier, SessionStore};

/// Service context - holds all dependencies
///
/// The platform layer creates it and injects the backends, the session
/// store and the toast sink.
pub struct ServiceContext {
    /// Capability routing
    pub backend_registry: Arc<dyn BackendRegistry>,
    /// Signed-in user
    pub session_store: Arc<dyn SessionStore>,
    /// Toasts
    pub notifier: Arc<dyn Notifier>,
}

impl ServiceContext {
    /// Create service context
    #[must_use]
    pub fn new(
        backend_registry: Arc<dyn BackendRegistry>,
        session_store: Arc<dyn SessionStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            backend_registry,
            session_store,
            notifier,
        }
    }

    /// Backend serving `capability`
    pub async fn backend_for(
        &self,
        capability: Capability,
    ) -> CoreResult<Arc<dyn MarketplaceBackend>> {
        self.backend_registry
            .resolve(capability)
            .await
            .ok_or(CoreError::CapabilityUnavailable(capability))
    }

    /// Run `op` on the backend serving `capability`, mapping its error.
    pub async fn call<T, F, Fut>(&self, capability: Capability, op: F) -> CoreResult<T>
    where
        F: FnOnce(Arc<dyn MarketplaceBackend>) -> Fut,
        Fut: Future<Output = BackendResult<T>>,
    {
        let backend = self.backend_for(capability).await?;
        match op(backend).await {
            Ok(value) => Ok(value),
            Err(e) => Err(self.handle_backend_error(e).await),
        }
    }

    /// Current session, if signed in
    pub async fn current_session(&self) -> CoreResult<Option<AuthSession>> {
        self.session_store.load().await
    }

    /// Signed-in user or [`CoreError::NotAuthenticated`]
    pub async fn require_user(&self) -> CoreResult<User> {
        self.current_session()
            .await?
            .map(|s| s.user)
            .ok_or(CoreError::NotAuthenticated)
    }

    /// Store the session and hand its token to every backend
    pub async fn sign_in(&self, session: &AuthSession) -> CoreResult<()> {
        self.session_store.save(session).await?;
        self.push_token(Some(&session.token)).await;
        log::info!("Signed in as {}", session.user.id);
        Ok(())
    }

    /// Drop the session and the backends' tokens
    pub async fn sign_out(&self) -> CoreResult<()> {
        self.push_token(None).await;
        self.session_store.clear().await
    }

    async fn push_token(&self, token: Option<&str>) {
        for backend in self.backend_registry.all().await {
            backend.set_auth_token(token.map(str::to_string));
        }
    }

    /// Log a backend error and sign out when it reports an invalid token
    pub async fn handle_backend_error(&self, err: BackendError) -> CoreError {
        if err.is_expected() {
            log::warn!("{err}");
        } else {
            log::error!("{err}");
        }

        if let BackendError::Unauthorized { .. } = &err {
            let signed_in = matches!(self.current_session().await, Ok(Some(_)));
            if signed_in {
                if let Err(e) = self.sign_out().await {
                    log::error!("Failed to clear session: {e}");
                }
                log::warn!("Session rejected by backend, signed out");
                self.notifier
                    .error("Your session has expired. Please sign in again.");
            }
        }
        CoreError::Backend(err)
    }
}
