//! PostgreSQL implementation of ClubMessageRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use bookclub_core::entities::{ClubMessage, NewClubMessage};
use bookclub_core::traits::{ClubMessageRepository, MessageQuery, RepoResult};
use bookclub_core::value_objects::{ClubId, MessageId};

use crate::models::ClubMessageModel;

use super::error::{club_not_found, map_db_error, map_foreign_key_violation};

/// PostgreSQL implementation of ClubMessageRepository
#[derive(Clone)]
pub struct PgClubMessageRepository {
    pool: PgPool,
}

impl PgClubMessageRepository {
    /// Create a new PgClubMessageRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClubMessageRepository for PgClubMessageRepository {
    #[instrument(skip(self, message), fields(club_id = %message.club_id))]
    async fn create(&self, message: &NewClubMessage) -> RepoResult<ClubMessage> {
        let model = sqlx::query_as::<_, ClubMessageModel>(
            r"
            WITH inserted AS (
                INSERT INTO messages (club_id, user_id, type, body)
                VALUES ($1, $2, $3, $4)
                RETURNING id, club_id, user_id, type, body, created_at
            )
            SELECT i.id, i.club_id, i.user_id, u.name AS user_name, i.type, i.body, i.created_at
            FROM inserted i
            LEFT JOIN users u ON u.id = i.user_id
            ",
        )
        .bind(message.club_id.into_inner())
        .bind(message.author_id.map(|id| id.into_inner()))
        .bind(message.kind.as_str())
        .bind(message.body.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_foreign_key_violation(e, || club_not_found(message.club_id)))?;

        Ok(ClubMessage::from(model))
    }

    #[instrument(skip(self))]
    async fn find_by_club(
        &self,
        club_id: ClubId,
        query: MessageQuery<MessageId>,
    ) -> RepoResult<Vec<ClubMessage>> {
        let limit = query.clamped_limit();

        let results = match (query.before, query.after) {
            (Some(before), _) => {
                // Older page (scrolling up)
                sqlx::query_as::<_, ClubMessageModel>(
                    r"
                    SELECT m.id, m.club_id, m.user_id, u.name AS user_name, m.type, m.body, m.created_at
                    FROM messages m
                    LEFT JOIN users u ON u.id = m.user_id
                    WHERE m.club_id = $1 AND m.id < $2
                    ORDER BY m.id DESC
                    LIMIT $3
                    ",
                )
                .bind(club_id.into_inner())
                .bind(before.into_inner())
                .bind(limit)
                .fetch_all(&self.pool)
                .await
            }
            (None, Some(after)) => {
                // Newer messages (polling); fetched oldest first so the
                // page starts right after the cursor, then flipped below
                sqlx::query_as::<_, ClubMessageModel>(
                    r"
                    SELECT m.id, m.club_id, m.user_id, u.name AS user_name, m.type, m.body, m.created_at
                    FROM messages m
                    LEFT JOIN users u ON u.id = m.user_id
                    WHERE m.club_id = $1 AND m.id > $2
                    ORDER BY m.id ASC
                    LIMIT $3
                    ",
                )
                .bind(club_id.into_inner())
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
                sqlx::query_as::<_, ClubMessageModel>(
                    r"
                    SELECT m.id, m.club_id, m.user_id, u.name AS user_name, m.type, m.body, m.created_at
                    FROM messages m
                    LEFT JOIN users u ON u.id = m.user_id
                    WHERE m.club_id = $1
                    ORDER BY m.id DESC
                    LIMIT $2
                    ",
                )
                .bind(club_id.into_inner())
                .bind(limit)
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(ClubMessage::from).collect())
    }
}
