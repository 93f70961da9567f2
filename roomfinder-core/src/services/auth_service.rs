//! Sign in, registration and the current user

use std::sync::Arc;

use chrono::Utc;

use roomfinder_backend::{AuthSession, Capability, LoginRequest, RegisterRequest, User};

use crate::error::{CoreError, CoreResult};
use crate::services::ServiceContext;
use crate::validation;

/// Authentication service
pub struct AuthService {
    ctx: Arc<ServiceContext>,
}

impl AuthService {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// Sign in and store the session.
    pub async fn sign_in(&self, email: &str, password: &str) -> CoreResult<User> {
        validation::validate_login(email, password)?;
        let req = LoginRequest {
            email: email.trim().to_ascii_lowercase(),
            password: password.to_string(),
        };
        let session = self
            .ctx
            .call(Capability::Auth, |b| async move { b.login(&req).await })
            .await?;
        self.ctx.sign_in(&session).await?;
        Ok(session.user)
    }

    /// Create an account; the new user is signed in.
    pub async fn register(&self, req: &RegisterRequest) -> CoreResult<User> {
        let req = validation::validate_registration(req)?;
        let session = self
            .ctx
            .call(Capability::Auth, |b| async move { b.register(&req).await })
            .await?;
        self.ctx.sign_in(&session).await?;
        self.ctx.notifier.success("Welcome to RoomFinder!");
        Ok(session.user)
    }

    /// Fresh profile of the signed-in user; the stored copy is updated.
    pub async fn current_user(&self) -> CoreResult<User> {
        let Some(mut session) = self.ctx.current_session().await? else {
            return Err(CoreError::NotAuthenticated);
        };
        let user = self
            .ctx
            .call(Capability::Auth, |b| async move { b.current_user().await })
            .await?;
        session.user = user.clone();
        self.ctx.session_store.save(&session).await?;
        Ok(user)
    }

    /// Re-apply a stored session at startup.
    ///
    /// An expired session is cleared and `None` returned.
    pub async fn restore(&self) -> CoreResult<Option<AuthSession>> {
        let Some(session) = self.ctx.current_session().await? else {
            return Ok(None);
        };
        if session.is_expired_at(Utc::now()) {
            log::info!("Stored session expired, signing out");
            self.ctx.sign_out().await?;
            return Ok(None);
        }
        self.ctx.sign_in(&session).await?;
        Ok(Some(session))
    }

    pub async fn sign_out(&self) -> CoreResult<()> {
        self.ctx.sign_out().await?;
        log::info!("Signed out");
        Ok(())
    }
}
