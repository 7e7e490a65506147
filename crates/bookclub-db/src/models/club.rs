//! Club and membership database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for clubs table
#[derive(Debug, Clone, FromRow)]
pub struct ClubModel {
    pub id: i64,
    pub owner_id: Option<i64>,
    pub book_id: Option<i64>,
    pub name: String,
    pub is_public: bool,
    pub cover_image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Club row joined with its member count
#[derive(Debug, Clone, FromRow)]
pub struct ClubSummaryModel {
    #[sqlx(flatten)]
    pub club: ClubModel,
    pub member_count: i64,
}

/// Database model for club_members table
#[derive(Debug, Clone, FromRow)]
pub struct ClubMemberModel {
    pub club_id: i64,
    pub user_id: i64,
    pub role: String,
    pub joined_at: DateTime<Utc>,
}
