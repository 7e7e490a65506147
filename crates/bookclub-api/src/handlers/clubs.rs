//! Club handlers
//!
//! Directory, lifecycle, and membership endpoints.

use axum::{
    extract::{Query, State},
    Json,
};
use bookclub_core::ClubId;
use bookclub_service::dto::{
    AddMemberRequest, AddMemberResponse, ClubListQuery, ClubPageResponse, ClubResponse,
    CreateClubRequest, RenameClubRequest,
};
use bookclub_service::ClubService;

use crate::extractors::{CurrentUser, IdPath, MaybeUser, ValidatedJson};
use crate::response::{ApiError, ApiResult, Created, NoContent};
use crate::state::AppState;

/// List public clubs
///
/// GET /clubs?book_id=&q=&page=
pub async fn list_clubs(
    State(state): State<AppState>,
    query: Result<Query<ClubListQuery>, axum::extract::rejection::QueryRejection>,
) -> ApiResult<Json<ClubPageResponse>> {
    let Query(query) = query.map_err(|e| ApiError::invalid_query(e.body_text()))?;

    let service = ClubService::new(state.service_context());
    let page = service.list_public(query).await?;
    Ok(Json(page))
}

/// Create a private club owned by the caller
///
/// POST /clubs
pub async fn create_club(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    ValidatedJson(request): ValidatedJson<CreateClubRequest>,
) -> ApiResult<Created<Json<ClubResponse>>> {
    let service = ClubService::new(state.service_context());
    let club = service.create_private(&actor, request).await?;
    Ok(Created(Json(club)))
}

/// Show a club the caller may view
///
/// GET /clubs/{club_id}
pub async fn get_club(
    State(state): State<AppState>,
    MaybeUser(actor): MaybeUser,
    IdPath(club_id): IdPath<ClubId>,
) -> ApiResult<Json<ClubResponse>> {
    let service = ClubService::new(state.service_context());
    let club = service.show(club_id, &actor).await?;
    Ok(Json(club))
}

/// Rename a club (owner only)
///
/// PATCH /clubs/{club_id}
pub async fn rename_club(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    IdPath(club_id): IdPath<ClubId>,
    ValidatedJson(request): ValidatedJson<RenameClubRequest>,
) -> ApiResult<Json<ClubResponse>> {
    let service = ClubService::new(state.service_context());
    let club = service.rename(club_id, &actor, request).await?;
    Ok(Json(club))
}

/// Delete a private club (owner only)
///
/// DELETE /clubs/{club_id}
pub async fn delete_club(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    IdPath(club_id): IdPath<ClubId>,
) -> ApiResult<NoContent> {
    let service = ClubService::new(state.service_context());
    service.delete(club_id, &actor).await?;
    Ok(NoContent)
}

/// Join a public club
///
/// POST /clubs/{club_id}/join
pub async fn join_club(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    IdPath(club_id): IdPath<ClubId>,
) -> ApiResult<NoContent> {
    let service = ClubService::new(state.service_context());
    service.join(club_id, &actor).await?;
    Ok(NoContent)
}

/// Leave a club
///
/// POST /clubs/{club_id}/leave
pub async fn leave_club(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    IdPath(club_id): IdPath<ClubId>,
) -> ApiResult<NoContent> {
    let service = ClubService::new(state.service_context());
    service.leave(club_id, &actor).await?;
    Ok(NoContent)
}

/// Add a member by id or name (owner or moderator)
///
/// POST /clubs/{club_id}/members
pub async fn add_member(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    IdPath(club_id): IdPath<ClubId>,
    ValidatedJson(request): ValidatedJson<AddMemberRequest>,
) -> ApiResult<Json<AddMemberResponse>> {
    let service = ClubService::new(state.service_context());
    let response = service.add_member(club_id, &actor, request).await?;
    Ok(Json(response))
}
