//! User database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for the columns of `users` this service reads
#[derive(Debug, Clone, FromRow)]
pub struct UserModel {
    pub id: i64,
    pub name: String,
    pub is_banned: bool,
    pub muted_until: Option<DateTime<Utc>>,
}
