//! In-app notifications

use std::sync::Arc;

use roomfinder_backend::{Capability, Notification};

use crate::error::CoreResult;
use crate::services::ServiceContext;

/// Notification service
pub struct NotificationService {
    ctx: Arc<ServiceContext>,
}

impl NotificationService {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    pub async fn list(&self) -> CoreResult<Vec<Notification>> {
        let user = self.ctx.require_user().await?;
        self.ctx
            .call(Capability::Notifications, |b| async move {
                b.list_notifications(&user.id).await
            })
            .await
    }

    pub async fn unread_count(&self) -> CoreResult<usize> {
        Ok(self.list().await?.iter().filter(|n| !n.is_read).count())
    }

    pub async fn mark_read(&self, notification_id: &str) -> CoreResult<()> {
        let user = self.ctx.require_user().await?;
        self.ctx
            .call(Capability::Notifications, |b| async move {
                b.mark_notification_read(&user.id, notification_id).await
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::create_signed_in_context;

    #[tokio::test]
    async fn test_unread_count_after_mark_read() {
        let (ctx, _rest, legacy) = create_signed_in_context().await;
        let service = NotificationService::new(ctx);

        assert_eq!(service.unread_count().await.unwrap(), 2);
        service.mark_read("n2").await.unwrap();
        assert_eq!(legacy.read_notifications(), vec!["n2".to_string()]);
        assert_eq!(service.unread_count().await.unwrap(), 1);
    }
}
