//! Invitation service
//!
//! Token invitations into private clubs.

use bookclub_core::entities::{InvitationTarget, NewInvitation};
use bookclub_core::{AuthenticatedActor, ClubId, DomainError, ManageAction};
use chrono::Utc;
use tracing::{info, instrument};

use crate::dto::{CreateInvitationRequest, InvitationResponse};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::gate::ClubGate;

/// Invitation service
pub struct InvitationService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> InvitationService<'a> {
    /// Create a new InvitationService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Invite a user (by id) or an address (by email) into a private club
    #[instrument(skip(self, actor, request), fields(user_id = %actor.id))]
    pub async fn create(
        &self,
        club_id: ClubId,
        actor: &AuthenticatedActor,
        request: CreateInvitationRequest,
    ) -> ServiceResult<InvitationResponse> {
        let access = ClubGate::new(self.ctx)
            .authorize_manage(club_id, actor, ManageAction::Invite)
            .await?;

        if access.club.is_public {
            return Err(DomainError::PublicClubNotInvitable.into());
        }

        let target = match (request.invitee_id, request.email) {
            (Some(invitee_id), _) => {
                self.ctx
                    .user_repo()
                    .find_by_id(invitee_id)
                    .await?
                    .ok_or(DomainError::UserNotFound(invitee_id))?;
                InvitationTarget::User(invitee_id)
            }
            (None, Some(email)) => InvitationTarget::Email(email.trim().to_lowercase()),
            (None, None) => {
                return Err(ServiceError::validation(
                    "Either invitee_id or email is required",
                ))
            }
        };

        let invitation = self
            .ctx
            .invitation_repo()
            .create(&NewInvitation::new(club_id, actor.id, target, Utc::now()))
            .await?;

        info!(invitation_id = %invitation.id, club_id = %club_id, "Invitation created");

        Ok(InvitationResponse::from(invitation))
    }

    /// Redeem an invitation token, joining its club as a member
    #[instrument(skip(self, actor, token), fields(user_id = %actor.id))]
    pub async fn accept(&self, token: &str, actor: &AuthenticatedActor) -> ServiceResult<()> {
        let invitation = self
            .ctx
            .invitation_repo()
            .find_by_token(token)
            .await?
            .ok_or(DomainError::InvitationNotFound)?;

        invitation.ensure_acceptable_by(actor.id, Utc::now())?;
        self.ctx.invitation_repo().accept(&invitation, actor.id).await?;

        info!(invitation_id = %invitation.id, club_id = %invitation.club_id, "Invitation accepted");
        Ok(())
    }
}
