//! Auth session storage abstract Trait

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use roomfinder_backend::AuthSession;

use crate::error::CoreResult;

/// Session Store Trait
///
/// Holds the signed-in user's token and profile. Platform layers decide
/// whether it survives restarts.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Current session, if signed in
    async fn load(&self) -> CoreResult<Option<AuthSession>>;

    /// Replace the current session
    async fn save(&self, session: &AuthSession) -> CoreResult<()>;

    /// Sign out
    async fn clear(&self) -> CoreResult<()>;
}

/// In-memory session store
#[derive(Clone, Default)]
pub struct InMemorySessionStore {
    session: Arc<RwLock<Option<AuthSession>>>,
}

impl InMemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn load(&self) -> CoreResult<Option<AuthSession>> {
        Ok(self.session.read().await.clone())
    }

    async fn save(&self, session: &AuthSession) -> CoreResult<()> {
        *self.session.write().await = Some(session.clone());
        Ok(())
    }

    async fn clear(&self) -> CoreResult<()> {
        *self.session.write().await = None;
        Ok(())
    }
}
