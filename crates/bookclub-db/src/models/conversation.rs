//! Conversation database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for conversations table
#[derive(Debug, Clone, FromRow)]
pub struct ConversationModel {
    pub id: i64,
    pub is_group: bool,
    pub direct_low_id: Option<i64>,
    pub direct_high_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Database model for conversation_participants table
#[derive(Debug, Clone, FromRow)]
pub struct ParticipantModel {
    pub conversation_id: i64,
    pub user_id: i64,
    pub approved_at: Option<DateTime<Utc>>,
    pub invited_by: Option<i64>,
    pub last_read_at: Option<DateTime<Utc>>,
}

/// One inbox row: the caller's participation, the other side, and the latest message
#[derive(Debug, Clone, FromRow)]
pub struct InboxRowModel {
    pub conversation_id: i64,
    pub updated_at: DateTime<Utc>,
    pub approved_at: Option<DateTime<Utc>>,
    pub last_read_at: Option<DateTime<Utc>>,
    pub other_id: Option<i64>,
    pub other_name: Option<String>,
    pub last_id: Option<i64>,
    pub last_sender_id: Option<i64>,
    pub last_body: Option<String>,
    pub last_created_at: Option<DateTime<Utc>>,
}
