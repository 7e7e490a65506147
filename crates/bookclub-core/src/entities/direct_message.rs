//! Direct message within a conversation

use chrono::{DateTime, Utc};

use super::MessageAuthor;
use crate::value_objects::{ConversationId, DirectMessageId, MessageBody, UserId};

/// Direct message entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectMessage {
    pub id: DirectMessageId,
    pub conversation_id: ConversationId,
    pub sender: MessageAuthor,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// Draft of a direct message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDirectMessage {
    pub conversation_id: ConversationId,
    pub sender_id: UserId,
    pub body: MessageBody,
}

impl NewDirectMessage {
    pub fn new(conversation_id: ConversationId, sender_id: UserId, body: MessageBody) -> Self {
        Self {
            conversation_id,
            sender_id,
            body,
        }
    }
}
