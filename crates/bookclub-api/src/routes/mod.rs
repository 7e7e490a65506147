//! Route definitions
//!
//! Paths follow the public web routes: clubs and their feeds, the
//! conversation inbox, JSON direct message endpoints under `/api/dm`, and
//! notifications.

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{clubs, conversations, health, invitations, live, messages, notifications};
use crate::state::AppState;

/// Create the main router with all routes (excluding health for separate middleware handling)
pub fn create_router() -> Router<AppState> {
    Router::new()
        .merge(club_routes())
        .merge(invitation_routes())
        .merge(conversation_routes())
        .merge(direct_message_routes())
        .merge(notification_routes())
}

/// Health check routes (exported separately to bypass rate limiting)
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

/// Club directory, lifecycle, membership, and feed routes
fn club_routes() -> Router<AppState> {
    Router::new()
        .route("/clubs", get(clubs::list_clubs).post(clubs::create_club))
        .route(
            "/clubs/:club_id",
            get(clubs::get_club)
                .patch(clubs::rename_club)
                .delete(clubs::delete_club),
        )
        .route("/clubs/:club_id/join", post(clubs::join_club))
        .route("/clubs/:club_id/leave", post(clubs::leave_club))
        .route("/clubs/:club_id/members", post(clubs::add_member))
        .route("/clubs/:club_id/invites", post(invitations::create_invitation))
        .route(
            "/clubs/:club_id/messages",
            get(messages::list_club_messages).post(messages::post_club_message),
        )
        .route("/clubs/:club_id/live", get(live::club_live))
}

/// Invitation acceptance
fn invitation_routes() -> Router<AppState> {
    Router::new().route("/invites/:token/accept", post(invitations::accept_invitation))
}

/// Conversation start, inbox, thread, and request decisions
fn conversation_routes() -> Router<AppState> {
    Router::new()
        .route("/dm/:user_id", post(conversations::start_conversation))
        .route("/messages", get(conversations::inbox))
        .route("/messages/:conversation_id", get(conversations::thread))
        .route(
            "/dm-requests/:conversation_id/accept",
            post(conversations::accept_request),
        )
        .route(
            "/dm-requests/:conversation_id/deny",
            post(conversations::deny_request),
        )
}

/// Direct message feed and push
fn direct_message_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/dm/:conversation_id/messages",
            get(messages::list_direct_messages).post(messages::post_direct_message),
        )
        .route("/api/dm/:conversation_id/live", get(live::dm_live))
}

/// Notification routes
fn notification_routes() -> Router<AppState> {
    Router::new()
        .route("/notifications", get(notifications::unread_notifications))
        .route(
            "/notifications/:id/read",
            post(notifications::mark_notification_read),
        )
}
