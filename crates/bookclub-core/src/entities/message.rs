//! Club chat message

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_objects::{ClubId, MessageBody, MessageId, UserId};

/// Kind of club message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    Text,
    /// Generated by the server (joins, renames); has no author
    System,
}

impl MessageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::System => "system",
        }
    }

    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "text" => Ok(Self::Text),
            "system" => Ok(Self::System),
            other => Err(DomainError::ValidationError(format!(
                "Unknown message type: {other}"
            ))),
        }
    }
}

/// Author projection embedded in messages and events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageAuthor {
    pub id: UserId,
    pub name: String,
}

impl MessageAuthor {
    pub fn new(id: UserId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Message entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClubMessage {
    pub id: MessageId,
    pub club_id: ClubId,
    pub author: Option<MessageAuthor>,
    pub kind: MessageType,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl ClubMessage {
    #[inline]
    pub fn is_system(&self) -> bool {
        self.kind == MessageType::System
    }
}

/// Draft of a club message before the store assigns its id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewClubMessage {
    pub club_id: ClubId,
    pub author_id: Option<UserId>,
    pub kind: MessageType,
    pub body: MessageBody,
}

impl NewClubMessage {
    pub fn text(club_id: ClubId, author_id: UserId, body: MessageBody) -> Self {
        Self {
            club_id,
            author_id: Some(author_id),
            kind: MessageType::Text,
            body,
        }
    }

    pub fn system(club_id: ClubId, body: MessageBody) -> Self {
        Self {
            club_id,
            author_id: None,
            kind: MessageType::System,
            body,
        }
    }
}
