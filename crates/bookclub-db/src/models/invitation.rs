//! Invitation database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for invitations table
#[derive(Debug, Clone, FromRow)]
pub struct InvitationModel {
    pub id: i64,
    pub club_id: i64,
    pub inviter_id: i64,
    pub invitee_id: Option<i64>,
    pub email: Option<String>,
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub accepted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl InvitationModel {
    /// Check if invitation was redeemed
    #[inline]
    pub fn is_accepted(&self) -> bool {
        self.accepted_at.is_some()
    }
}
