//! Saved properties

use std::sync::Arc;

use roomfinder_backend::{Capability, Property};

use crate::error::CoreResult;
use crate::services::ServiceContext;
use crate::traits::Notifier;

/// Favorite service
pub struct FavoriteService {
    ctx: Arc<ServiceContext>,
}

impl FavoriteService {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    pub async fn list(&self) -> CoreResult<Vec<Property>> {
        let user = self.ctx.require_user().await?;
        self.ctx
            .call(Capability::Favorites, |b| async move {
                b.list_favorites(&user.id).await
            })
            .await
    }

    /// Save or unsave; returns whether the property is now saved.
    pub async fn toggle(&self, property_id: &str) -> CoreResult<bool> {
        let user = self.ctx.require_user().await?;
        let saved = self
            .ctx
            .call(Capability::Favorites, |b| async move {
                b.toggle_favorite(&user.id, property_id).await
            })
            .await?;
        self.ctx.notifier.info(if saved {
            "Added to favourites"
        } else {
            "Removed from favourites"
        });
        Ok(saved)
    }
}
