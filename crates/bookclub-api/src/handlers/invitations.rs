//! Invitation handlers

use axum::{
    extract::{Path, State},
    Json,
};
use bookclub_core::ClubId;
use bookclub_service::dto::{CreateInvitationRequest, InvitationResponse};
use bookclub_service::InvitationService;

use crate::extractors::{CurrentUser, IdPath, ValidatedJson};
use crate::response::{ApiResult, Created, NoContent};
use crate::state::AppState;

/// Invite a user or an email address to a private club
///
/// POST /clubs/{club_id}/invites
pub async fn create_invitation(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    IdPath(club_id): IdPath<ClubId>,
    ValidatedJson(request): ValidatedJson<CreateInvitationRequest>,
) -> ApiResult<Created<Json<InvitationResponse>>> {
    let service = InvitationService::new(state.service_context());
    let invitation = service.create(club_id, &actor, request).await?;
    Ok(Created(Json(invitation)))
}

/// Accept an invitation by token
///
/// POST /invites/{token}/accept
pub async fn accept_invitation(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(token): Path<String>,
) -> ApiResult<NoContent> {
    let service = InvitationService::new(state.service_context());
    service.accept(&token, &actor).await?;
    Ok(NoContent)
}
