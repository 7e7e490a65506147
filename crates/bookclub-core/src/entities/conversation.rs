//! Conversations, participants, and the inbox projection
//!
//! A direct conversation holds exactly two participants. The initiator is
//! approved on creation; the recipient starts pending and either accepts the
//! request or withdraws. At most one direct conversation exists per
//! unordered pair of users, enforced by the store on `(low, high)`.

use chrono::{DateTime, Utc};

use super::MessageAuthor;
use crate::error::DomainError;
use crate::value_objects::{ConversationId, DirectMessageId, NotificationId, UserId};

/// Conversation entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    pub id: ConversationId,
    pub is_group: bool,
    pub created_at: DateTime<Utc>,
    /// Bumped on every new message
    pub updated_at: DateTime<Utc>,
}

/// Whether a participant has accepted the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticipantState {
    Pending,
    Approved { at: DateTime<Utc> },
}

impl ParticipantState {
    /// Map the nullable `approved_at` column
    pub fn from_approved_at(approved_at: Option<DateTime<Utc>>) -> Self {
        match approved_at {
            Some(at) => Self::Approved { at },
            None => Self::Pending,
        }
    }

    pub fn approved_at(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Approved { at } => Some(*at),
            Self::Pending => None,
        }
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

/// Participant of a conversation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub conversation_id: ConversationId,
    pub user_id: UserId,
    pub state: ParticipantState,
    /// Who added this participant (the initiator, for recipients)
    pub invited_by: Option<UserId>,
    pub last_read_at: Option<DateTime<Utc>>,
}

impl Participant {
    #[inline]
    pub fn is_approved(&self) -> bool {
        !self.state.is_pending()
    }

    /// Pending participants can neither read nor write
    pub fn ensure_approved(&self) -> Result<(), DomainError> {
        if self.is_approved() {
            Ok(())
        } else {
            Err(DomainError::PendingApproval)
        }
    }
}

/// Unordered pair of distinct users, stored as `(low, high)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DirectPair {
    low: UserId,
    high: UserId,
}

impl DirectPair {
    pub fn new(a: UserId, b: UserId) -> Result<Self, DomainError> {
        if a == b {
            return Err(DomainError::SelfMessage);
        }
        Ok(Self {
            low: a.min(b),
            high: a.max(b),
        })
    }

    #[inline]
    pub fn low(&self) -> UserId {
        self.low
    }

    #[inline]
    pub fn high(&self) -> UserId {
        self.high
    }

    /// The other member of the pair
    pub fn other(&self, user_id: UserId) -> Option<UserId> {
        if user_id == self.low {
            Some(self.high)
        } else if user_id == self.high {
            Some(self.low)
        } else {
            None
        }
    }
}

/// A request to open (or reuse) a direct conversation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectRequest {
    pub pair: DirectPair,
    pub initiator_id: UserId,
    pub initiator_name: String,
    pub target_id: UserId,
}

impl DirectRequest {
    pub fn new(
        initiator_id: UserId,
        initiator_name: impl Into<String>,
        target_id: UserId,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            pair: DirectPair::new(initiator_id, target_id)?,
            initiator_id,
            initiator_name: initiator_name.into(),
            target_id,
        })
    }
}

/// Result of starting a direct conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversationStart {
    pub conversation_id: ConversationId,
    /// `false` when an existing conversation was reused
    pub created: bool,
    /// The request notification, when one was recorded
    pub notification_id: Option<NotificationId>,
}

/// Result of withdrawing from a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DenyOutcome {
    pub conversation_deleted: bool,
}

/// Latest message shown in an inbox row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboxPreview {
    pub id: DirectMessageId,
    pub sender_id: UserId,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// One row of a user's inbox
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboxEntry {
    pub conversation_id: ConversationId,
    /// The other participant; `None` once they have withdrawn
    pub other: Option<MessageAuthor>,
    /// Whether the inbox owner still has to accept this conversation
    pub pending: bool,
    pub last_message: Option<InboxPreview>,
    pub last_read_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl InboxEntry {
    /// Unread when the latest message came from someone else after the last read
    pub fn has_unread(&self, owner: UserId) -> bool {
        match &self.last_message {
            Some(msg) if msg.sender_id != owner => match self.last_read_at {
                Some(read_at) => msg.created_at > read_at,
                None => true,
            },
            _ => false,
        }
    }
}
