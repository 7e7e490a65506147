//! Conversation handlers
//!
//! Starting a direct conversation, the inbox, the thread view, and the
//! accept/deny decisions on message requests.

use axum::{extract::State, Json};
use bookclub_core::{ConversationId, UserId};
use bookclub_service::dto::{
    ApiResponse, ConversationStartResponse, DenyResponse, InboxEntryResponse,
    ParticipantResponse, RequestDecision, ThreadResponse,
};
use bookclub_service::ConversationService;

use crate::extractors::{CurrentUser, IdPath, OptionalJson};
use crate::response::{ApiResult, Found};
use crate::state::AppState;

/// Find or start the conversation with a user and redirect to its thread
///
/// POST /dm/{user_id}
pub async fn start_conversation(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    IdPath(target_id): IdPath<UserId>,
) -> ApiResult<Found<ConversationStartResponse>> {
    let service = ConversationService::new(state.service_context());
    let started = service.start(&actor, target_id).await?;

    Ok(Found {
        location: started.location.clone(),
        body: started,
    })
}

/// The caller's conversations, most recently active first
///
/// GET /messages
pub async fn inbox(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
) -> ApiResult<Json<ApiResponse<Vec<InboxEntryResponse>>>> {
    let service = ConversationService::new(state.service_context());
    let entries = service.inbox(&actor).await?;
    Ok(Json(entries))
}

/// Latest messages of a conversation, oldest first; marks it read
///
/// GET /messages/{conversation_id}
pub async fn thread(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    IdPath(conversation_id): IdPath<ConversationId>,
) -> ApiResult<Json<ThreadResponse>> {
    let service = ConversationService::new(state.service_context());
    let thread = service.thread(&actor, conversation_id).await?;
    Ok(Json(thread))
}

/// Accept a message request
///
/// POST /dm-requests/{conversation_id}/accept
pub async fn accept_request(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    IdPath(conversation_id): IdPath<ConversationId>,
    OptionalJson(decision): OptionalJson<RequestDecision>,
) -> ApiResult<Json<ParticipantResponse>> {
    let service = ConversationService::new(state.service_context());
    let participant = service.accept(&actor, conversation_id, decision).await?;
    Ok(Json(participant))
}

/// Deny a message request, deleting the conversation
///
/// POST /dm-requests/{conversation_id}/deny
pub async fn deny_request(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    IdPath(conversation_id): IdPath<ConversationId>,
    OptionalJson(decision): OptionalJson<RequestDecision>,
) -> ApiResult<Json<DenyResponse>> {
    let service = ConversationService::new(state.service_context());
    let outcome = service.deny(&actor, conversation_id, decision).await?;
    Ok(Json(outcome))
}
