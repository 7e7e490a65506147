//! Stored notifications

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::value_objects::{ConversationId, NotificationId, UserId};

/// Typed notification content. Serialized into the `data` column with its
/// `type` tag, so clients can dispatch on `data.type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NotificationPayload {
    DmRequest {
        conversation_id: ConversationId,
        from_user_id: UserId,
        from_user_name: String,
    },
}

impl NotificationPayload {
    /// Value of the `type` column
    pub fn kind(&self) -> &'static str {
        match self {
            Self::DmRequest { .. } => "dm_request",
        }
    }

    pub fn conversation_id(&self) -> Option<ConversationId> {
        match self {
            Self::DmRequest {
                conversation_id, ..
            } => Some(*conversation_id),
        }
    }

    pub fn to_data(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Notification entity
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: NotificationId,
    pub user_id: UserId,
    pub kind: String,
    pub data: Value,
    pub created_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
}

impl Notification {
    #[inline]
    pub fn is_read(&self) -> bool {
        self.read_at.is_some()
    }

    /// Decode the typed payload; `None` for kinds this build does not know
    pub fn payload(&self) -> Option<NotificationPayload> {
        serde_json::from_value(self.data.clone()).ok()
    }
}

/// Draft of a notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNotification {
    pub id: NotificationId,
    pub user_id: UserId,
    pub payload: NotificationPayload,
}

impl NewNotification {
    pub fn new(user_id: UserId, payload: NotificationPayload) -> Self {
        Self {
            id: NotificationId::generate(),
            user_id,
            payload,
        }
    }

    /// Message request sent to the recipient of a new direct conversation
    pub fn dm_request(
        recipient: UserId,
        conversation_id: ConversationId,
        from_user_id: UserId,
        from_user_name: impl Into<String>,
    ) -> Self {
        Self::new(
            recipient,
            NotificationPayload::DmRequest {
                conversation_id,
                from_user_id,
                from_user_name: from_user_name.into(),
            },
        )
    }
}
