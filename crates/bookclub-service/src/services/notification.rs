//! Notification service

use bookclub_core::{AuthenticatedActor, NotificationId};
use tracing::{debug, instrument};

use crate::dto::{ApiResponse, NotificationResponse};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Notification service
pub struct NotificationService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> NotificationService<'a> {
    /// Create a new NotificationService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// The caller's unread notifications, most recent first
    #[instrument(skip(self, actor), fields(user_id = %actor.id))]
    pub async fn unread(
        &self,
        actor: &AuthenticatedActor,
    ) -> ServiceResult<ApiResponse<Vec<NotificationResponse>>> {
        let notifications = self
            .ctx
            .notification_repo()
            .find_unread(actor.id, self.ctx.messaging().notification_limit)
            .await?;

        Ok(ApiResponse::new(
            notifications
                .into_iter()
                .map(NotificationResponse::from)
                .collect(),
        ))
    }

    /// Mark a notification read. Unknown, foreign, and already-read ids are
    /// accepted silently.
    #[instrument(skip(self, actor), fields(user_id = %actor.id))]
    pub async fn mark_read(
        &self,
        actor: &AuthenticatedActor,
        id: NotificationId,
    ) -> ServiceResult<()> {
        let updated = self.ctx.notification_repo().mark_read(actor.id, id).await?;
        debug!(notification_id = %id, updated, "Notification mark-read");
        Ok(())
    }
}
