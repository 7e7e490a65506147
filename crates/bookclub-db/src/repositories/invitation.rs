//! PostgreSQL implementation of InvitationRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use bookclub_core::entities::{Invitation, NewInvitation};
use bookclub_core::error::DomainError;
use bookclub_core::traits::{InvitationRepository, RepoResult};
use bookclub_core::value_objects::UserId;

use crate::models::InvitationModel;

use super::error::{map_db_error, map_unique_violation};

/// PostgreSQL implementation of InvitationRepository
#[derive(Clone)]
pub struct PgInvitationRepository {
    pool: PgPool,
}

impl PgInvitationRepository {
    /// Create a new PgInvitationRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InvitationRepository for PgInvitationRepository {
    #[instrument(skip(self, invitation), fields(club_id = %invitation.club_id))]
    async fn create(&self, invitation: &NewInvitation) -> RepoResult<Invitation> {
        let model = sqlx::query_as::<_, InvitationModel>(
            r"
            INSERT INTO invitations (club_id, inviter_id, invitee_id, email, token, expires_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, club_id, inviter_id, invitee_id, email, token, expires_at, accepted_at, created_at
            ",
        )
        .bind(invitation.club_id.into_inner())
        .bind(invitation.inviter_id.into_inner())
        .bind(invitation.invitee_id.map(|id| id.into_inner()))
        .bind(invitation.email.as_deref())
        .bind(&invitation.token)
        .bind(invitation.expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::InvitationTokenExists))?;

        Ok(Invitation::from(model))
    }

    #[instrument(skip(self, token))]
    async fn find_by_token(&self, token: &str) -> RepoResult<Option<Invitation>> {
        let result = sqlx::query_as::<_, InvitationModel>(
            r"
            SELECT id, club_id, inviter_id, invitee_id, email, token, expires_at, accepted_at, created_at
            FROM invitations
            WHERE token = $1
            ",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Invitation::from))
    }

    #[instrument(skip(self, invitation), fields(invitation_id = %invitation.id))]
    async fn accept(&self, invitation: &Invitation, user_id: UserId) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let stamped = sqlx::query(
            r"
            UPDATE invitations
            SET accepted_at = NOW()
            WHERE id = $1 AND accepted_at IS NULL
            ",
        )
        .bind(invitation.id.into_inner())
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?
        .rows_affected();

        if stamped == 0 {
            return Err(DomainError::InvitationAlreadyAccepted);
        }

        sqlx::query(
            r"
            INSERT INTO club_members (club_id, user_id, role)
            VALUES ($1, $2, 'member')
            ON CONFLICT (club_id, user_id) DO NOTHING
            ",
        )
        .bind(invitation.club_id.into_inner())
        .bind(user_id.into_inner())
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;

        Ok(())
    }
}
