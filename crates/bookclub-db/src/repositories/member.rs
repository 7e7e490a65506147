//! PostgreSQL implementation of ClubMemberRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use bookclub_core::entities::{ClubMember, ClubRole};
use bookclub_core::traits::{ClubMemberRepository, RepoResult};
use bookclub_core::value_objects::{ClubId, UserId};

use crate::models::ClubMemberModel;

use super::error::map_db_error;

/// PostgreSQL implementation of ClubMemberRepository
#[derive(Clone)]
pub struct PgClubMemberRepository {
    pool: PgPool,
}

impl PgClubMemberRepository {
    /// Create a new PgClubMemberRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClubMemberRepository for PgClubMemberRepository {
    #[instrument(skip(self))]
    async fn find(&self, club_id: ClubId, user_id: UserId) -> RepoResult<Option<ClubMember>> {
        let result = sqlx::query_as::<_, ClubMemberModel>(
            r"
            SELECT club_id, user_id, role, joined_at
            FROM club_members
            WHERE club_id = $1 AND user_id = $2
            ",
        )
        .bind(club_id.into_inner())
        .bind(user_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(ClubMember::from))
    }

    #[instrument(skip(self))]
    async fn add(&self, club_id: ClubId, user_id: UserId, role: ClubRole) -> RepoResult<bool> {
        let result = sqlx::query(
            r"
            INSERT INTO club_members (club_id, user_id, role)
            VALUES ($1, $2, $3)
            ON CONFLICT (club_id, user_id) DO NOTHING
            ",
        )
        .bind(club_id.into_inner())
        .bind(user_id.into_inner())
        .bind(role.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn remove(&self, club_id: ClubId, user_id: UserId) -> RepoResult<bool> {
        let result = sqlx::query(
            r"
            DELETE FROM club_members WHERE club_id = $1 AND user_id = $2
            ",
        )
        .bind(club_id.into_inner())
        .bind(user_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }
}
