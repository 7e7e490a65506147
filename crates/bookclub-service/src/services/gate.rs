//! Club membership and visibility gate
//!
//! Loads a club with the caller's membership and applies the club policy.
//! Every club entry point (feed, post, live subscription, management)
//! goes through here.

use bookclub_core::entities::{Club, ClubMember};
use bookclub_core::{
    authorize_manage, authorize_post, authorize_view, Actor, AuthenticatedActor, ClubId,
    DomainError, ManageAction, UserId,
};
use tracing::instrument;

use super::context::ServiceContext;
use super::error::ServiceResult;

/// A club together with the caller's membership row
#[derive(Debug, Clone)]
pub struct ClubAccess {
    pub club: Club,
    pub membership: Option<ClubMember>,
}

/// Club gate
pub struct ClubGate<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ClubGate<'a> {
    /// Create a new ClubGate
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Load a club and, for non-owners, the user's membership
    #[instrument(skip(self))]
    pub async fn load(&self, club_id: ClubId, user_id: Option<UserId>) -> ServiceResult<ClubAccess> {
        let club = self
            .ctx
            .club_repo()
            .find_by_id(club_id)
            .await?
            .ok_or(DomainError::ClubNotFound(club_id))?;

        let membership = match user_id {
            Some(user_id) if !club.is_owned_by(user_id) => {
                self.ctx.member_repo().find(club_id, user_id).await?
            }
            _ => None,
        };

        Ok(ClubAccess { club, membership })
    }

    /// Load a club the actor may read
    pub async fn authorize_view(&self, club_id: ClubId, actor: &Actor) -> ServiceResult<ClubAccess> {
        let access = self.load(club_id, actor.id()).await?;
        authorize_view(actor, &access.club, access.membership.as_ref())?;
        Ok(access)
    }

    /// Load a club the actor may post to
    pub async fn authorize_post(&self, club_id: ClubId, actor: &Actor) -> ServiceResult<ClubAccess> {
        let access = self.load(club_id, actor.id()).await?;
        authorize_post(actor, &access.club, access.membership.as_ref())?;
        Ok(access)
    }

    /// Load a club the actor may manage with `action`
    pub async fn authorize_manage(
        &self,
        club_id: ClubId,
        actor: &AuthenticatedActor,
        action: ManageAction,
    ) -> ServiceResult<ClubAccess> {
        let access = self.load(club_id, Some(actor.id)).await?;
        authorize_manage(actor, &access.club, access.membership.as_ref(), action)?;
        Ok(access)
    }
}
