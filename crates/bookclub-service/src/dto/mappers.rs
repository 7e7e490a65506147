//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.

use bookclub_core::entities::{
    ClubMessage, ClubSummary, DirectMessage, InboxEntry, InboxPreview, Invitation, Notification,
    Participant,
};
use bookclub_core::UserId;

use super::responses::{
    ClubMessageResponse, ClubResponse, DirectMessageResponse, InboxEntryResponse,
    InboxMessageResponse, InvitationResponse, NotificationResponse, ParticipantResponse,
};

// ============================================================================
// Message Mappers
// ============================================================================

impl From<&ClubMessage> for ClubMessageResponse {
    fn from(message: &ClubMessage) -> Self {
        Self {
            id: message.id,
            club_id: message.club_id,
            kind: message.kind,
            body: message.body.clone(),
            created_at: message.created_at,
            user: message.author.clone(),
        }
    }
}

impl From<ClubMessage> for ClubMessageResponse {
    fn from(message: ClubMessage) -> Self {
        Self {
            id: message.id,
            club_id: message.club_id,
            kind: message.kind,
            body: message.body,
            created_at: message.created_at,
            user: message.author,
        }
    }
}

impl From<&DirectMessage> for DirectMessageResponse {
    fn from(message: &DirectMessage) -> Self {
        Self {
            id: message.id,
            conversation_id: message.conversation_id,
            body: message.body.clone(),
            created_at: message.created_at,
            sender: message.sender.clone(),
        }
    }
}

impl From<DirectMessage> for DirectMessageResponse {
    fn from(message: DirectMessage) -> Self {
        Self {
            id: message.id,
            conversation_id: message.conversation_id,
            body: message.body,
            created_at: message.created_at,
            sender: message.sender,
        }
    }
}

// ============================================================================
// Club Mappers
// ============================================================================

impl From<ClubSummary> for ClubResponse {
    fn from(summary: ClubSummary) -> Self {
        let club = summary.club;
        Self {
            id: club.id,
            name: club.name,
            is_public: club.is_public,
            book_id: club.book_id,
            owner_id: club.owner_id,
            cover_image: club.cover_image,
            member_count: summary.member_count,
            created_at: club.created_at,
        }
    }
}

// ============================================================================
// Conversation Mappers
// ============================================================================

impl From<InboxPreview> for InboxMessageResponse {
    fn from(preview: InboxPreview) -> Self {
        Self {
            id: preview.id,
            sender_id: preview.sender_id,
            body: preview.body,
            created_at: preview.created_at,
        }
    }
}

impl InboxEntryResponse {
    /// Build the row as seen by `owner`
    pub fn for_owner(entry: InboxEntry, owner: UserId) -> Self {
        let has_unread = entry.has_unread(owner);
        Self {
            conversation_id: entry.conversation_id,
            other: entry.other,
            pending: entry.pending,
            has_unread,
            last_message: entry.last_message.map(InboxMessageResponse::from),
            updated_at: entry.updated_at,
        }
    }
}

impl From<Participant> for ParticipantResponse {
    fn from(participant: Participant) -> Self {
        Self {
            conversation_id: participant.conversation_id,
            user_id: participant.user_id,
            approved_at: participant.state.approved_at(),
        }
    }
}

// ============================================================================
// Notification Mappers
// ============================================================================

impl From<Notification> for NotificationResponse {
    fn from(notification: Notification) -> Self {
        Self {
            id: notification.id,
            kind: notification.kind,
            data: notification.data,
            created_at: notification.created_at,
            read_at: notification.read_at,
        }
    }
}

// ============================================================================
// Invitation Mappers
// ============================================================================

impl From<Invitation> for InvitationResponse {
    fn from(invitation: Invitation) -> Self {
        Self {
            id: invitation.id,
            club_id: invitation.club_id,
            inviter_id: invitation.inviter_id,
            invitee_id: invitation.invitee_id,
            email: invitation.email,
            token: invitation.token,
            expires_at: invitation.expires_at,
        }
    }
}
