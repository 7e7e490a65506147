//! Message database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Club message joined with its author's name
#[derive(Debug, Clone, FromRow)]
pub struct ClubMessageModel {
    pub id: i64,
    pub club_id: i64,
    pub user_id: Option<i64>,
    pub user_name: Option<String>,
    #[sqlx(rename = "type")]
    pub kind: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl ClubMessageModel {
    /// System messages carry no author
    #[inline]
    pub fn is_system(&self) -> bool {
        self.kind == "system"
    }
}

/// Direct message joined with its sender's name
#[derive(Debug, Clone, FromRow)]
pub struct DirectMessageModel {
    pub id: i64,
    pub conversation_id: i64,
    pub user_id: i64,
    pub user_name: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}
