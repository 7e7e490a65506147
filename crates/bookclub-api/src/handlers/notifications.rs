//! Notification handlers

use axum::{extract::State, Json};
use bookclub_core::NotificationId;
use bookclub_service::dto::{ApiResponse, NotificationResponse};
use bookclub_service::NotificationService;

use crate::extractors::{CurrentUser, IdPath};
use crate::response::{ApiResult, NoContent};
use crate::state::AppState;

/// Unread notifications, newest first
///
/// GET /notifications
pub async fn unread_notifications(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
) -> ApiResult<Json<ApiResponse<Vec<NotificationResponse>>>> {
    let service = NotificationService::new(state.service_context());
    let notifications = service.unread(&actor).await?;
    Ok(Json(notifications))
}

/// Mark one of the caller's notifications read
///
/// Always succeeds; ids owned by someone else are left untouched.
///
/// POST /notifications/{id}/read
pub async fn mark_notification_read(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    IdPath(id): IdPath<NotificationId>,
) -> ApiResult<NoContent> {
    let service = NotificationService::new(state.service_context());
    service.mark_read(&actor, id).await?;
    Ok(NoContent)
}
