//! Property reviews

use std::sync::Arc;

use roomfinder_backend::{Capability, CreateReviewRequest, Review};

use crate::error::CoreResult;
use crate::services::ServiceContext;
use crate::traits::Notifier;
use crate::validation;

/// Review service
pub struct ReviewService {
    ctx: Arc<ServiceContext>,
}

impl ReviewService {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    pub async fn list(&self, property_id: &str) -> CoreResult<Vec<Review>> {
        self.ctx
            .call(Capability::Reviews, |b| async move {
                b.list_reviews(property_id).await
            })
            .await
    }

    pub async fn create(&self, property_id: &str, rating: u8, comment: &str) -> CoreResult<()> {
        validation::validate_review(rating, comment)?;
        let user = self.ctx.require_user().await?;
        let req = CreateReviewRequest {
            property_id: property_id.to_string(),
            user_id: user.id,
            rating,
            comment: comment.trim().to_string(),
        };
        self.ctx
            .call(Capability::Reviews, |b| async move {
                b.create_review(&req).await
            })
            .await?;
        self.ctx.notifier.success("Thanks for your review!");
        Ok(())
    }
}
