//! User entity - the parts of an account this service reads

use chrono::{DateTime, Utc};

use crate::value_objects::{ActorStatus, UserId};

/// User account (read-only here; owned by the identity service)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub is_banned: bool,
    pub muted_until: Option<DateTime<Utc>>,
}

impl User {
    pub fn new(id: UserId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            is_banned: false,
            muted_until: None,
        }
    }

    /// Moderation status at `now`
    pub fn status(&self, now: DateTime<Utc>) -> ActorStatus {
        ActorStatus::resolve(self.is_banned, self.muted_until, now)
    }
}
