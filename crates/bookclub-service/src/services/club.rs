//! Club service
//!
//! Handles the public club directory and the lifecycle of private clubs:
//! create, join, leave, direct member adds, rename, and delete.

use bookclub_core::entities::{Club, ClubFilter, ClubRole, ClubSummary, NewClub, User};
use bookclub_core::{Actor, AuthenticatedActor, ClubId, DomainError, ManageAction};
use tracing::{info, instrument};

use crate::dto::{
    AddMemberRequest, AddMemberResponse, ClubListQuery, ClubPageResponse, ClubResponse,
    CreateClubRequest, RenameClubRequest,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::gate::ClubGate;

/// Club service
pub struct ClubService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ClubService<'a> {
    /// Create a new ClubService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// List public clubs, most members first
    #[instrument(skip(self))]
    pub async fn list_public(&self, query: ClubListQuery) -> ServiceResult<ClubPageResponse> {
        let filter = ClubFilter {
            book_id: query.book_id,
            search: query
                .q
                .map(|q| q.trim().to_string())
                .filter(|q| !q.is_empty()),
            page: query.page.unwrap_or(1).max(1),
            ..ClubFilter::default()
        };

        let clubs = self.ctx.club_repo().list_public(&filter).await?;
        let per_page = filter.limit();
        let has_more = i64::try_from(clubs.len()).unwrap_or(i64::MAX) >= per_page;

        Ok(ClubPageResponse {
            data: clubs.into_iter().map(ClubResponse::from).collect(),
            page: filter.page,
            per_page,
            has_more,
        })
    }

    /// Show a club the actor may view
    #[instrument(skip(self, actor))]
    pub async fn show(&self, club_id: ClubId, actor: &Actor) -> ServiceResult<ClubResponse> {
        let access = ClubGate::new(self.ctx).authorize_view(club_id, actor).await?;
        self.with_member_count(access.club).await
    }

    /// Create a private club owned by the caller
    #[instrument(skip(self, actor, request), fields(user_id = %actor.id))]
    pub async fn create_private(
        &self,
        actor: &AuthenticatedActor,
        request: CreateClubRequest,
    ) -> ServiceResult<ClubResponse> {
        if request.is_public {
            return Err(DomainError::PublicClubRequiresAdmin.into());
        }

        let draft = NewClub::private(actor.id, &request.name, request.book_id)?;
        let club = self.ctx.club_repo().create_private(&draft).await?;

        info!(club_id = %club.id, "Private club created");

        Ok(ClubResponse::from(ClubSummary {
            club,
            member_count: 1,
        }))
    }

    /// Join a public club; joining twice is a no-op
    #[instrument(skip(self, actor), fields(user_id = %actor.id))]
    pub async fn join(&self, club_id: ClubId, actor: &AuthenticatedActor) -> ServiceResult<()> {
        let club = self.find_club(club_id).await?;
        if club.is_private() {
            return Err(DomainError::PrivateClubRequiresInvitation.into());
        }

        let added = self
            .ctx
            .member_repo()
            .add(club_id, actor.id, ClubRole::Member)
            .await?;

        if added {
            info!(club_id = %club_id, "Joined club");
        }

        Ok(())
    }

    /// Leave a club. The owner of a private club has to delete it instead.
    #[instrument(skip(self, actor), fields(user_id = %actor.id))]
    pub async fn leave(&self, club_id: ClubId, actor: &AuthenticatedActor) -> ServiceResult<()> {
        let club = self.find_club(club_id).await?;
        if club.is_private() && club.is_owned_by(actor.id) {
            return Err(DomainError::CannotLeaveOwnedClub.into());
        }

        if self.ctx.member_repo().remove(club_id, actor.id).await? {
            info!(club_id = %club_id, "Left club");
        }

        Ok(())
    }

    /// Add a user to the club directly, by id or exact name
    #[instrument(skip(self, actor, request), fields(user_id = %actor.id))]
    pub async fn add_member(
        &self,
        club_id: ClubId,
        actor: &AuthenticatedActor,
        request: AddMemberRequest,
    ) -> ServiceResult<AddMemberResponse> {
        ClubGate::new(self.ctx)
            .authorize_manage(club_id, actor, ManageAction::Invite)
            .await?;

        let user = self.resolve_user(&request).await?;
        let added = self
            .ctx
            .member_repo()
            .add(club_id, user.id, ClubRole::Member)
            .await?;

        if added {
            info!(club_id = %club_id, member_id = %user.id, "Member added");
        }

        Ok(AddMemberResponse { added })
    }

    /// Rename a club (owner only)
    #[instrument(skip(self, actor, request), fields(user_id = %actor.id))]
    pub async fn rename(
        &self,
        club_id: ClubId,
        actor: &AuthenticatedActor,
        request: RenameClubRequest,
    ) -> ServiceResult<ClubResponse> {
        let access = ClubGate::new(self.ctx)
            .authorize_manage(club_id, actor, ManageAction::Rename)
            .await?;

        let name = access.club.validate_rename(&request.name)?;
        let club = self.ctx.club_repo().rename(club_id, &name).await?;

        info!(club_id = %club_id, "Club renamed");

        self.with_member_count(club).await
    }

    /// Delete a private club (owner only)
    #[instrument(skip(self, actor), fields(user_id = %actor.id))]
    pub async fn delete(&self, club_id: ClubId, actor: &AuthenticatedActor) -> ServiceResult<()> {
        let access = ClubGate::new(self.ctx)
            .authorize_manage(club_id, actor, ManageAction::Delete)
            .await?;

        if access.club.is_public {
            return Err(DomainError::CannotDeletePublicClub.into());
        }

        self.ctx.club_repo().delete(club_id).await?;

        info!(club_id = %club_id, "Club deleted");
        Ok(())
    }

    async fn find_club(&self, club_id: ClubId) -> ServiceResult<Club> {
        self.ctx
            .club_repo()
            .find_by_id(club_id)
            .await?
            .ok_or_else(|| DomainError::ClubNotFound(club_id).into())
    }

    async fn resolve_user(&self, request: &AddMemberRequest) -> ServiceResult<User> {
        if let Some(user_id) = request.user_id {
            return self
                .ctx
                .user_repo()
                .find_by_id(user_id)
                .await?
                .ok_or_else(|| DomainError::UserNotFound(user_id).into());
        }

        match request.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => self
                .ctx
                .user_repo()
                .find_by_name(name)
                .await?
                .ok_or_else(|| ServiceError::not_found("User", name)),
            _ => Err(ServiceError::validation("Either user_id or name is required")),
        }
    }

    async fn with_member_count(&self, club: Club) -> ServiceResult<ClubResponse> {
        let member_count = self.ctx.club_repo().member_count(club.id).await?;
        Ok(ClubResponse::from(ClubSummary { club, member_count }))
    }
}
