//! PostgreSQL implementation of ConversationRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};

use bookclub_core::entities::{
    Conversation, ConversationStart, DenyOutcome, DirectPair, DirectRequest, InboxEntry,
    NewNotification, Participant,
};
use bookclub_core::error::DomainError;
use bookclub_core::traits::{ConversationRepository, RepoResult};
use bookclub_core::value_objects::{ConversationId, NotificationId, UserId};

use crate::mappers::NotificationInsert;
use crate::models::{ConversationModel, InboxRowModel, ParticipantModel};

use super::error::{conversation_not_found, map_db_error};

/// PostgreSQL implementation of ConversationRepository
#[derive(Clone)]
pub struct PgConversationRepository {
    pool: PgPool,
}

impl PgConversationRepository {
    /// Create a new PgConversationRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConversationRepository for PgConversationRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: ConversationId) -> RepoResult<Option<Conversation>> {
        let result = sqlx::query_as::<_, ConversationModel>(
            r"
            SELECT id, is_group, direct_low_id, direct_high_id, created_at, updated_at
            FROM conversations
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Conversation::from))
    }

    #[instrument(skip(self))]
    async fn find_direct(&self, pair: DirectPair) -> RepoResult<Option<ConversationId>> {
        let result = sqlx::query_scalar::<_, i64>(
            r"
            SELECT id FROM conversations
            WHERE is_group = FALSE AND direct_low_id = $1 AND direct_high_id = $2
            ",
        )
        .bind(pair.low().into_inner())
        .bind(pair.high().into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(ConversationId::new))
    }

    #[instrument(skip(self, request), fields(initiator = %request.initiator_id, target = %request.target_id))]
    async fn start_direct(&self, request: &DirectRequest) -> RepoResult<ConversationStart> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        // The partial unique index on the pair makes concurrent starts converge
        let inserted = sqlx::query_scalar::<_, i64>(
            r"
            INSERT INTO conversations (is_group, direct_low_id, direct_high_id)
            VALUES (FALSE, $1, $2)
            ON CONFLICT (direct_low_id, direct_high_id) WHERE is_group = FALSE DO NOTHING
            RETURNING id
            ",
        )
        .bind(request.pair.low().into_inner())
        .bind(request.pair.high().into_inner())
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_db_error)?;

        let created = inserted.is_some();
        let conversation_id = match inserted {
            Some(id) => id,
            None => sqlx::query_scalar::<_, i64>(
                r"
                SELECT id FROM conversations
                WHERE is_group = FALSE AND direct_low_id = $1 AND direct_high_id = $2
                FOR UPDATE
                ",
            )
            .bind(request.pair.low().into_inner())
            .bind(request.pair.high().into_inner())
            .fetch_one(&mut *tx)
            .await
            .map_err(map_db_error)?,
        };

        sqlx::query(
            r"
            INSERT INTO conversation_participants (conversation_id, user_id, approved_at, invited_by)
            VALUES ($1, $2, NOW(), $2)
            ON CONFLICT (conversation_id, user_id) DO NOTHING
            ",
        )
        .bind(conversation_id)
        .bind(request.initiator_id.into_inner())
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        let target_added = sqlx::query(
            r"
            INSERT INTO conversation_participants (conversation_id, user_id, approved_at, invited_by)
            VALUES ($1, $2, NULL, $3)
            ON CONFLICT (conversation_id, user_id) DO NOTHING
            ",
        )
        .bind(conversation_id)
        .bind(request.target_id.into_inner())
        .bind(request.initiator_id.into_inner())
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?
        .rows_affected()
            > 0;

        // Only a freshly added recipient gets a request notification
        let notification_id = if target_added {
            let notification = NewNotification::dm_request(
                request.target_id,
                ConversationId::new(conversation_id),
                request.initiator_id,
                request.initiator_name.clone(),
            );
            let insert = NotificationInsert::new(&notification);

            sqlx::query(
                r"
                INSERT INTO notifications (id, user_id, type, data)
                VALUES ($1, $2, $3, $4)
                ",
            )
            .bind(insert.id)
            .bind(insert.user_id)
            .bind(insert.kind)
            .bind(&insert.data)
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

            Some(notification.id)
        } else {
            None
        };

        tx.commit().await.map_err(map_db_error)?;

        debug!(conversation_id, created, target_added, "Direct conversation resolved");

        Ok(ConversationStart {
            conversation_id: ConversationId::new(conversation_id),
            created,
            notification_id,
        })
    }

    #[instrument(skip(self))]
    async fn find_participant(
        &self,
        conversation_id: ConversationId,
        user_id: UserId,
    ) -> RepoResult<Option<Participant>> {
        let result = sqlx::query_as::<_, ParticipantModel>(
            r"
            SELECT conversation_id, user_id, approved_at, invited_by, last_read_at
            FROM conversation_participants
            WHERE conversation_id = $1 AND user_id = $2
            ",
        )
        .bind(conversation_id.into_inner())
        .bind(user_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Participant::from))
    }

    #[instrument(skip(self))]
    async fn participants(&self, conversation_id: ConversationId) -> RepoResult<Vec<Participant>> {
        let results = sqlx::query_as::<_, ParticipantModel>(
            r"
            SELECT conversation_id, user_id, approved_at, invited_by, last_read_at
            FROM conversation_participants
            WHERE conversation_id = $1
            ORDER BY joined_at ASC, user_id ASC
            ",
        )
        .bind(conversation_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Participant::from).collect())
    }

    #[instrument(skip(self))]
    async fn approve(
        &self,
        conversation_id: ConversationId,
        user_id: UserId,
        notification_id: Option<NotificationId>,
    ) -> RepoResult<Participant> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let model = sqlx::query_as::<_, ParticipantModel>(
            r"
            UPDATE conversation_participants
            SET approved_at = COALESCE(approved_at, NOW())
            WHERE conversation_id = $1 AND user_id = $2
            RETURNING conversation_id, user_id, approved_at, invited_by, last_read_at
            ",
        )
        .bind(conversation_id.into_inner())
        .bind(user_id.into_inner())
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_db_error)?
        .ok_or(DomainError::NotParticipant)?;

        if let Some(id) = notification_id {
            mark_notification_read(&mut tx, user_id, id).await?;
        }

        tx.commit().await.map_err(map_db_error)?;

        Ok(Participant::from(model))
    }

    #[instrument(skip(self))]
    async fn withdraw(
        &self,
        conversation_id: ConversationId,
        user_id: UserId,
        notification_id: Option<NotificationId>,
    ) -> RepoResult<DenyOutcome> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        // Lock the conversation so two withdrawals cannot both see one survivor
        sqlx::query_scalar::<_, i64>(
            r"
            SELECT id FROM conversations WHERE id = $1 FOR UPDATE
            ",
        )
        .bind(conversation_id.into_inner())
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_db_error)?
        .ok_or_else(|| conversation_not_found(conversation_id))?;

        let removed = sqlx::query(
            r"
            DELETE FROM conversation_participants
            WHERE conversation_id = $1 AND user_id = $2
            ",
        )
        .bind(conversation_id.into_inner())
        .bind(user_id.into_inner())
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?
        .rows_affected();

        if removed == 0 {
            return Err(DomainError::NotParticipant);
        }

        if let Some(id) = notification_id {
            mark_notification_read(&mut tx, user_id, id).await?;
        }

        let remaining = sqlx::query_scalar::<_, i64>(
            r"
            SELECT COUNT(*) FROM conversation_participants WHERE conversation_id = $1
            ",
        )
        .bind(conversation_id.into_inner())
        .fetch_one(&mut *tx)
        .await
        .map_err(map_db_error)?;

        // A direct conversation with one side gone is dissolved
        let conversation_deleted = remaining <= 1;
        if conversation_deleted {
            sqlx::query(
                r"
                DELETE FROM conversations WHERE id = $1
                ",
            )
            .bind(conversation_id.into_inner())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;
        }

        tx.commit().await.map_err(map_db_error)?;

        Ok(DenyOutcome {
            conversation_deleted,
        })
    }

    #[instrument(skip(self))]
    async fn mark_read(&self, conversation_id: ConversationId, user_id: UserId) -> RepoResult<()> {
        sqlx::query(
            r"
            UPDATE conversation_participants
            SET last_read_at = NOW()
            WHERE conversation_id = $1 AND user_id = $2
            ",
        )
        .bind(conversation_id.into_inner())
        .bind(user_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn inbox(&self, user_id: UserId, limit: i64) -> RepoResult<Vec<InboxEntry>> {
        let results = sqlx::query_as::<_, InboxRowModel>(
            r"
            SELECT
                c.id AS conversation_id,
                c.updated_at,
                me.approved_at,
                me.last_read_at,
                ou.id AS other_id,
                ou.name AS other_name,
                last.id AS last_id,
                last.user_id AS last_sender_id,
                last.body AS last_body,
                last.created_at AS last_created_at
            FROM conversation_participants me
            JOIN conversations c ON c.id = me.conversation_id AND c.is_group = FALSE
            LEFT JOIN conversation_participants other
                ON other.conversation_id = c.id AND other.user_id <> me.user_id
            LEFT JOIN users ou ON ou.id = other.user_id
            LEFT JOIN LATERAL (
                SELECT d.id, d.user_id, d.body, d.created_at
                FROM direct_messages d
                WHERE d.conversation_id = c.id
                ORDER BY d.id DESC
                LIMIT 1
            ) last ON TRUE
            WHERE me.user_id = $1
            ORDER BY c.updated_at DESC, c.id DESC
            LIMIT $2
            ",
        )
        .bind(user_id.into_inner())
        .bind(limit.clamp(1, 200))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(InboxEntry::from).collect())
    }
}

/// Mark a notification read inside an open transaction, scoped to its owner
async fn mark_notification_read(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    user_id: UserId,
    id: NotificationId,
) -> RepoResult<()> {
    sqlx::query(
        r"
        UPDATE notifications
        SET read_at = COALESCE(read_at, NOW())
        WHERE id = $1 AND user_id = $2
        ",
    )
    .bind(id.into_inner())
    .bind(user_id.into_inner())
    .execute(&mut **tx)
    .await
    .map_err(map_db_error)?;

    Ok(())
}
