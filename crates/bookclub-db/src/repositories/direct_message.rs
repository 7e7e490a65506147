//! PostgreSQL implementation of DirectMessageRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use bookclub_core::entities::{DirectMessage, NewDirectMessage};
use bookclub_core::traits::{DirectMessageRepository, MessageQuery, RepoResult};
use bookclub_core::value_objects::{ConversationId, DirectMessageId};

use crate::models::DirectMessageModel;

use super::error::{conversation_not_found, map_db_error, map_foreign_key_violation};

/// PostgreSQL implementation of DirectMessageRepository
#[derive(Clone)]
pub struct PgDirectMessageRepository {
    pool: PgPool,
}

impl PgDirectMessageRepository {
    /// Create a new PgDirectMessageRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DirectMessageRepository for PgDirectMessageRepository {
    #[instrument(skip(self, message), fields(conversation_id = %message.conversation_id))]
    async fn create(&self, message: &NewDirectMessage) -> RepoResult<DirectMessage> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let model = sqlx::query_as::<_, DirectMessageModel>(
            r"
            WITH inserted AS (
                INSERT INTO direct_messages (conversation_id, user_id, body)
                VALUES ($1, $2, $3)
                RETURNING id, conversation_id, user_id, body, created_at
            )
            SELECT i.id, i.conversation_id, i.user_id, u.name AS user_name, i.body, i.created_at
            FROM inserted i
            JOIN users u ON u.id = i.user_id
            ",
        )
        .bind(message.conversation_id.into_inner())
        .bind(message.sender_id.into_inner())
        .bind(message.body.as_str())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            map_foreign_key_violation(e, || conversation_not_found(message.conversation_id))
        })?;

        sqlx::query(
            r"
            UPDATE conversations SET updated_at = NOW() WHERE id = $1
            ",
        )
        .bind(message.conversation_id.into_inner())
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;

        Ok(DirectMessage::from(model))
    }

    #[instrument(skip(self))]
    async fn find_by_conversation(
        &self,
        conversation_id: ConversationId,
        query: MessageQuery<DirectMessageId>,
    ) -> RepoResult<Vec<DirectMessage>> {
        let limit = query.clamped_limit();

        let results = match (query.before, query.after) {
            (Some(before), _) => {
                sqlx::query_as::<_, DirectMessageModel>(
                    r"
                    SELECT d.id, d.conversation_id, d.user_id, u.name AS user_name, d.body, d.created_at
                    FROM direct_messages d
                    JOIN users u ON u.id = d.user_id
                    WHERE d.conversation_id = $1 AND d.id < $2
                    ORDER BY d.id DESC
                    LIMIT $3
                    ",
                )
                .bind(conversation_id.into_inner())
                .bind(before.into_inner())
                .bind(limit)
                .fetch_all(&self.pool)
                .await
            }
            (None, Some(after)) => {
                sqlx::query_as::<_, DirectMessageModel>(
                    r"
                    SELECT d.id, d.conversation_id, d.user_id, u.name AS user_name, d.body, d.created_at
                    FROM direct_messages d
                    JOIN users u ON u.id = d.user_id
                    WHERE d.conversation_id = $1 AND d.id > $2
                    ORDER BY d.id ASC
                    LIMIT $3
                    ",
                )
                .bind(conversation_id.into_inner())
                .bind(after.into_inner())
                .bind(limit)
                .fetch_all(&self.pool)
                .await
                .map(|mut rows| {
                    rows.reverse();
                    rows
                })
            }
            (None, None) => {
                sqlx::query_as::<_, DirectMessageModel>(
                    r"
                    SELECT d.id, d.conversation_id, d.user_id, u.name AS user_name, d.body, d.created_at
                    FROM direct_messages d
                    JOIN users u ON u.id = d.user_id
                    WHERE d.conversation_id = $1
                    ORDER BY d.id DESC
                    LIMIT $2
                    ",
                )
                .bind(conversation_id.into_inner())
                .bind(limit)
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(DirectMessage::from).collect())
    }
}
