//! Message feed handlers
//!
//! Club messages and direct messages share the keyset cursor. Bodies are
//! checked by the services after authorization.

use axum::{extract::State, Json};
use bookclub_core::{Actor, ClubId, ConversationId};
use bookclub_service::dto::{
    ClubMessageResponse, DirectMessageResponse, PaginatedResponse, PostMessageRequest,
};
use bookclub_service::{ClubMessageService, DirectMessageService};

use crate::extractors::{CurrentUser, FeedQuery, IdPath, MaybeUser, JsonBody};
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// List club messages, newest first
///
/// GET /clubs/{club_id}/messages?before=&after=&limit=
pub async fn list_club_messages(
    State(state): State<AppState>,
    MaybeUser(actor): MaybeUser,
    IdPath(club_id): IdPath<ClubId>,
    FeedQuery(cursor): FeedQuery,
) -> ApiResult<Json<PaginatedResponse<ClubMessageResponse>>> {
    let service = ClubMessageService::new(state.service_context());
    let page = service.list(club_id, &actor, cursor).await?;
    Ok(Json(page))
}

/// Post a club message
///
/// POST /clubs/{club_id}/messages
pub async fn post_club_message(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    IdPath(club_id): IdPath<ClubId>,
    JsonBody(request): JsonBody<PostMessageRequest>,
) -> ApiResult<Created<Json<ClubMessageResponse>>> {
    let service = ClubMessageService::new(state.service_context());
    let message = service.post(club_id, &Actor::User(actor), request).await?;
    Ok(Created(Json(message)))
}

/// List direct messages, newest first; marks the conversation read
///
/// GET /api/dm/{conversation_id}/messages?before=&after=&limit=
pub async fn list_direct_messages(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    IdPath(conversation_id): IdPath<ConversationId>,
    FeedQuery(cursor): FeedQuery,
) -> ApiResult<Json<PaginatedResponse<DirectMessageResponse>>> {
    let service = DirectMessageService::new(state.service_context());
    let page = service.list(conversation_id, &actor, cursor).await?;
    Ok(Json(page))
}

/// Post a direct message
///
/// POST /api/dm/{conversation_id}/messages
pub async fn post_direct_message(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    IdPath(conversation_id): IdPath<ConversationId>,
    JsonBody(request): JsonBody<PostMessageRequest>,
) -> ApiResult<Created<Json<DirectMessageResponse>>> {
    let service = DirectMessageService::new(state.service_context());
    let message = service.post(conversation_id, &actor, request).await?;
    Ok(Created(Json(message)))
}
