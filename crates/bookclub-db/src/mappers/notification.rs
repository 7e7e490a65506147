//! Notification model <-> entity mapper

use bookclub_core::entities::{NewNotification, Notification};
use bookclub_core::value_objects::{NotificationId, UserId};
use uuid::Uuid;

use crate::models::NotificationModel;

/// Convert NotificationModel to Notification entity
impl From<NotificationModel> for Notification {
    fn from(model: NotificationModel) -> Self {
        Notification {
            id: NotificationId::from_uuid(model.id),
            user_id: UserId::new(model.user_id),
            kind: model.kind,
            data: model.data,
            created_at: model.created_at,
            read_at: model.read_at,
        }
    }
}

/// Column values for inserting a notification
pub struct NotificationInsert {
    pub id: Uuid,
    pub user_id: i64,
    pub kind: &'static str,
    pub data: serde_json::Value,
}

impl NotificationInsert {
    pub fn new(notification: &NewNotification) -> Self {
        Self {
            id: notification.id.into_inner(),
            user_id: notification.user_id.into_inner(),
            kind: notification.payload.kind(),
            data: notification.payload.to_data(),
        }
    }
}
