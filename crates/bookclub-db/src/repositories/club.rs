//! PostgreSQL implementation of ClubRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use bookclub_core::entities::{Club, ClubFilter, ClubRole, ClubSummary, NewClub};
use bookclub_core::traits::{ClubRepository, RepoResult};
use bookclub_core::value_objects::ClubId;

use crate::models::{ClubModel, ClubSummaryModel};

use super::error::{club_not_found, map_db_error};

/// PostgreSQL implementation of ClubRepository
#[derive(Clone)]
pub struct PgClubRepository {
    pool: PgPool,
}

impl PgClubRepository {
    /// Create a new PgClubRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Escape `%`, `_` and `\` so user input matches literally inside ILIKE
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[async_trait]
impl ClubRepository for PgClubRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: ClubId) -> RepoResult<Option<Club>> {
        let result = sqlx::query_as::<_, ClubModel>(
            r"
            SELECT id, owner_id, book_id, name, is_public, cover_image, created_at, updated_at
            FROM clubs
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Club::from))
    }

    #[instrument(skip(self))]
    async fn list_public(&self, filter: &ClubFilter) -> RepoResult<Vec<ClubSummary>> {
        let search = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(escape_like);

        let results = sqlx::query_as::<_, ClubSummaryModel>(
            r"
            SELECT c.id, c.owner_id, c.book_id, c.name, c.is_public, c.cover_image,
                   c.created_at, c.updated_at, COUNT(m.user_id) AS member_count
            FROM clubs c
            LEFT JOIN club_members m ON m.club_id = c.id
            WHERE c.is_public = TRUE
              AND ($1::BIGINT IS NULL OR c.book_id = $1)
              AND ($2::TEXT IS NULL OR c.name ILIKE '%' || $2 || '%')
            GROUP BY c.id
            ORDER BY member_count DESC, c.id DESC
            LIMIT $3 OFFSET $4
            ",
        )
        .bind(filter.book_id.map(|id| id.into_inner()))
        .bind(search)
        .bind(filter.limit())
        .bind(filter.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(ClubSummary::from).collect())
    }

    #[instrument(skip(self))]
    async fn member_count(&self, club_id: ClubId) -> RepoResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r"
            SELECT COUNT(*) FROM club_members WHERE club_id = $1
            ",
        )
        .bind(club_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(count)
    }

    #[instrument(skip(self))]
    async fn create_private(&self, club: &NewClub) -> RepoResult<Club> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let model = sqlx::query_as::<_, ClubModel>(
            r"
            INSERT INTO clubs (owner_id, book_id, name, is_public)
            VALUES ($1, $2, $3, FALSE)
            RETURNING id, owner_id, book_id, name, is_public, cover_image, created_at, updated_at
            ",
        )
        .bind(club.owner_id.into_inner())
        .bind(club.book_id.map(|id| id.into_inner()))
        .bind(&club.name)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_db_error)?;

        sqlx::query(
            r"
            INSERT INTO club_members (club_id, user_id, role)
            VALUES ($1, $2, $3)
            ON CONFLICT (club_id, user_id) DO UPDATE SET role = EXCLUDED.role
            ",
        )
        .bind(model.id)
        .bind(club.owner_id.into_inner())
        .bind(ClubRole::Owner.as_str())
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;

        Ok(Club::from(model))
    }

    #[instrument(skip(self))]
    async fn rename(&self, club_id: ClubId, name: &str) -> RepoResult<Club> {
        let result = sqlx::query_as::<_, ClubModel>(
            r"
            UPDATE clubs
            SET name = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, owner_id, book_id, name, is_public, cover_image, created_at, updated_at
            ",
        )
        .bind(club_id.into_inner())
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Club::from).ok_or_else(|| club_not_found(club_id))
    }

    #[instrument(skip(self))]
    async fn delete(&self, club_id: ClubId) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            DELETE FROM clubs WHERE id = $1
            ",
        )
        .bind(club_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(club_not_found(club_id));
        }

        Ok(())
    }
}
