//! PostgreSQL implementation of NotificationRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use bookclub_core::entities::{NewNotification, Notification};
use bookclub_core::traits::{NotificationRepository, RepoResult};
use bookclub_core::value_objects::{NotificationId, UserId};

use crate::mappers::NotificationInsert;
use crate::models::NotificationModel;

use super::error::map_db_error;

/// PostgreSQL implementation of NotificationRepository
#[derive(Clone)]
pub struct PgNotificationRepository {
    pool: PgPool,
}

impl PgNotificationRepository {
    /// Create a new PgNotificationRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationRepository for PgNotificationRepository {
    #[instrument(skip(self, notification), fields(user_id = %notification.user_id))]
    async fn create(&self, notification: &NewNotification) -> RepoResult<Notification> {
        let insert = NotificationInsert::new(notification);

        let model = sqlx::query_as::<_, NotificationModel>(
            r"
            INSERT INTO notifications (id, user_id, type, data)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, type, data, read_at, created_at
            ",
        )
        .bind(insert.id)
        .bind(insert.user_id)
        .bind(insert.kind)
        .bind(&insert.data)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(Notification::from(model))
    }

    #[instrument(skip(self))]
    async fn find_unread(&self, user_id: UserId, limit: i64) -> RepoResult<Vec<Notification>> {
        let results = sqlx::query_as::<_, NotificationModel>(
            r"
            SELECT id, user_id, type, data, read_at, created_at
            FROM notifications
            WHERE user_id = $1 AND read_at IS NULL
            ORDER BY created_at DESC
            LIMIT $2
            ",
        )
        .bind(user_id.into_inner())
        .bind(limit.clamp(1, 100))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Notification::from).collect())
    }

    #[instrument(skip(self))]
    async fn mark_read(&self, user_id: UserId, id: NotificationId) -> RepoResult<bool> {
        let result = sqlx::query(
            r"
            UPDATE notifications
            SET read_at = COALESCE(read_at, NOW())
            WHERE id = $1 AND user_id = $2
            ",
        )
        .bind(id.into_inner())
        .bind(user_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }
}
