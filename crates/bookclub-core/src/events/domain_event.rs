//! Domain events - emitted after a message is stored
//!
//! Events are fanned out to live subscribers of the club or conversation
//! topic. The wire form is `{"event": "<name>", "data": {...}}`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::{ClubMessage, DirectMessage, MessageAuthor, MessageType};
use crate::value_objects::{ClubId, ConversationId, DirectMessageId, MessageId};

/// All live events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum DomainEvent {
    #[serde(rename = "message.created")]
    MessageCreated(MessageCreatedEvent),

    #[serde(rename = "direct_message.created")]
    DirectMessageCreated(DirectMessageCreatedEvent),
}

impl DomainEvent {
    /// Event name as sent on the wire
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::MessageCreated(_) => "message.created",
            Self::DirectMessageCreated(_) => "direct_message.created",
        }
    }

    /// Id of the carried message; ids grow in insertion order per table
    pub fn message_id(&self) -> i64 {
        match self {
            Self::MessageCreated(e) => e.id.into_inner(),
            Self::DirectMessageCreated(e) => e.id.into_inner(),
        }
    }
}

/// A club message was stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageCreatedEvent {
    pub id: MessageId,
    pub club_id: ClubId,
    #[serde(rename = "type")]
    pub kind: MessageType,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub user: Option<MessageAuthor>,
}

impl From<&ClubMessage> for MessageCreatedEvent {
    fn from(msg: &ClubMessage) -> Self {
        Self {
            id: msg.id,
            club_id: msg.club_id,
            kind: msg.kind,
            body: msg.body.clone(),
            created_at: msg.created_at,
            user: msg.author.clone(),
        }
    }
}

/// A direct message was stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectMessageCreatedEvent {
    pub id: DirectMessageId,
    pub conversation_id: ConversationId,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub sender: MessageAuthor,
}

impl From<&DirectMessage> for DirectMessageCreatedEvent {
    fn from(msg: &DirectMessage) -> Self {
        Self {
            id: msg.id,
            conversation_id: msg.conversation_id,
            body: msg.body.clone(),
            created_at: msg.created_at,
            sender: msg.sender.clone(),
        }
    }
}
