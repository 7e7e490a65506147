//! Request DTOs for API endpoints
//!
//! Request DTOs implement `Deserialize`; most also implement `Validate`.
//! Length rules that depend on trimming (message bodies, club names) are
//! enforced again by the domain types.

use bookclub_core::{BookId, NotificationId, UserId};
use serde::Deserialize;
use validator::Validate;

// ============================================================================
// Message Requests
// ============================================================================

/// Post a message to a club or a conversation
///
/// The body is checked by `MessageBody` once the caller is authorized.
#[derive(Debug, Clone, Deserialize)]
pub struct PostMessageRequest {
    pub body: String,
}

/// Keyset cursor over a message feed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedCursor {
    /// Page of messages older than this id
    pub before: Option<i64>,
    /// Messages strictly newer than this id
    pub after: Option<i64>,
    /// Page size; the feed default applies when absent
    pub limit: Option<i64>,
}

impl FeedCursor {
    /// Only messages newer than `after`
    pub fn after(after: Option<i64>) -> Self {
        Self {
            after,
            ..Self::default()
        }
    }
}

// ============================================================================
// Club Requests
// ============================================================================

/// Create club request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateClubRequest {
    #[validate(length(min = 1, max = 120, message = "Club name must be 1-120 characters"))]
    pub name: String,

    /// Must be false; public clubs come from the admin flow
    #[serde(default)]
    pub is_public: bool,

    pub book_id: Option<BookId>,
}

/// Rename club request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RenameClubRequest {
    #[validate(length(min = 1, max = 120, message = "Club name must be 1-120 characters"))]
    pub name: String,
}

/// Add a member directly, by id or by exact name
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AddMemberRequest {
    pub user_id: Option<UserId>,

    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: Option<String>,
}

/// Public club directory query
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClubListQuery {
    pub book_id: Option<BookId>,
    /// Case-insensitive name search
    pub q: Option<String>,
    pub page: Option<i64>,
}

// ============================================================================
// Invitation Requests
// ============================================================================

/// Create invitation request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateInvitationRequest {
    pub invitee_id: Option<UserId>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
}

// ============================================================================
// Conversation Requests
// ============================================================================

/// Accept or deny a message request
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct RequestDecision {
    /// The request notification to mark read alongside the decision
    pub notification_id: Option<NotificationId>,
}
