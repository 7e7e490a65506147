//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output.
//! Row ids are JSON numbers; notification ids are UUID strings.

use bookclub_core::{
    BookId, ClubId, ConversationId, DirectMessageId, InvitationId, MessageAuthor, MessageId,
    MessageType, NotificationId, UserId,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

// ============================================================================
// Common Response Types
// ============================================================================

/// Generic API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Message feed with keyset cursors
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, before: Option<i64>, after: Option<i64>, has_more: bool, limit: i64) -> Self {
        Self {
            data,
            pagination: PaginationMeta {
                before,
                after,
                has_more,
                limit,
            },
        }
    }
}

/// Pagination metadata
#[derive(Debug, Serialize)]
pub struct PaginationMeta {
    /// Cursor for fetching older messages (oldest id on this page)
    pub before: Option<i64>,
    /// Cursor for polling newer messages (newest id on this page)
    pub after: Option<i64>,
    /// Whether the page was full
    pub has_more: bool,
    /// Page size limit used
    pub limit: i64,
}

// ============================================================================
// Message Responses
// ============================================================================

/// Club message
#[derive(Debug, Clone, Serialize)]
pub struct ClubMessageResponse {
    pub id: MessageId,
    pub club_id: ClubId,
    #[serde(rename = "type")]
    pub kind: MessageType,
    pub body: String,
    pub created_at: DateTime<Utc>,
    /// `null` for system messages and deleted authors
    pub user: Option<MessageAuthor>,
}

/// Direct message
#[derive(Debug, Clone, Serialize)]
pub struct DirectMessageResponse {
    pub id: DirectMessageId,
    pub conversation_id: ConversationId,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub sender: MessageAuthor,
}

// ============================================================================
// Club Responses
// ============================================================================

/// Club response
#[derive(Debug, Clone, Serialize)]
pub struct ClubResponse {
    pub id: ClubId,
    pub name: String,
    pub is_public: bool,
    pub book_id: Option<BookId>,
    pub owner_id: Option<UserId>,
    pub cover_image: Option<String>,
    pub member_count: i64,
    pub created_at: DateTime<Utc>,
}

/// One page of the public club directory
#[derive(Debug, Serialize)]
pub struct ClubPageResponse {
    pub data: Vec<ClubResponse>,
    pub page: i64,
    pub per_page: i64,
    pub has_more: bool,
}

/// Result of adding a member directly
#[derive(Debug, Clone, Copy, Serialize)]
pub struct AddMemberResponse {
    /// `false` when the user already belonged to the club
    pub added: bool,
}

// ============================================================================
// Conversation Responses
// ============================================================================

/// Result of starting (or finding) a direct conversation
#[derive(Debug, Clone, Serialize)]
pub struct ConversationStartResponse {
    pub conversation_id: ConversationId,
    pub created: bool,
    /// Thread URL the client is redirected to
    pub location: String,
}

/// Latest message of an inbox row
#[derive(Debug, Clone, Serialize)]
pub struct InboxMessageResponse {
    pub id: DirectMessageId,
    pub sender_id: UserId,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// One conversation in the inbox
#[derive(Debug, Clone, Serialize)]
pub struct InboxEntryResponse {
    pub conversation_id: ConversationId,
    pub other: Option<MessageAuthor>,
    /// The caller has not accepted this request yet
    pub pending: bool,
    pub has_unread: bool,
    pub last_message: Option<InboxMessageResponse>,
    pub updated_at: DateTime<Utc>,
}

/// Thread view: the latest messages, oldest first
#[derive(Debug, Clone, Serialize)]
pub struct ThreadResponse {
    pub conversation_id: ConversationId,
    pub other: Option<MessageAuthor>,
    pub pending: bool,
    pub messages: Vec<DirectMessageResponse>,
}

/// A participant after accepting a request
#[derive(Debug, Clone, Serialize)]
pub struct ParticipantResponse {
    pub conversation_id: ConversationId,
    pub user_id: UserId,
    pub approved_at: Option<DateTime<Utc>>,
}

/// Result of denying a request
#[derive(Debug, Clone, Copy, Serialize)]
pub struct DenyResponse {
    pub conversation_deleted: bool,
}

// ============================================================================
// Notification Responses
// ============================================================================

/// Notification response
#[derive(Debug, Clone, Serialize)]
pub struct NotificationResponse {
    pub id: NotificationId,
    #[serde(rename = "type")]
    pub kind: String,
    pub data: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
}

// ============================================================================
// Invitation Responses
// ============================================================================

/// Invitation response
#[derive(Debug, Clone, Serialize)]
pub struct InvitationResponse {
    pub id: InvitationId,
    pub club_id: ClubId,
    pub inviter_id: UserId,
    pub invitee_id: Option<UserId>,
    pub email: Option<String>,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

// ============================================================================
// Health Responses
// ============================================================================

/// Basic health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
}

/// Health check status for each dependency
#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub database: String,
}

impl ReadinessResponse {
    pub fn ready(database_healthy: bool) -> Self {
        Self {
            status: if database_healthy { "ready" } else { "not_ready" }.to_string(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                database: if database_healthy { "healthy" } else { "unhealthy" }.to_string(),
            },
        }
    }
}
