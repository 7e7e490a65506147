//! Club membership

use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;
use crate::value_objects::{ClubId, UserId};

/// Role of a member within a club
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClubRole {
    Owner,
    Moderator,
    Member,
}

impl ClubRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Moderator => "moderator",
            Self::Member => "member",
        }
    }
}

impl fmt::Display for ClubRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClubRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "owner" => Ok(Self::Owner),
            "moderator" => Ok(Self::Moderator),
            "member" => Ok(Self::Member),
            other => Err(DomainError::ValidationError(format!(
                "Unknown club role: {other}"
            ))),
        }
    }
}

/// A user's membership in a club
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClubMember {
    pub club_id: ClubId,
    pub user_id: UserId,
    pub role: ClubRole,
    pub joined_at: DateTime<Utc>,
}

impl ClubMember {
    pub fn new(club_id: ClubId, user_id: UserId, role: ClubRole) -> Self {
        Self {
            club_id,
            user_id,
            role,
            joined_at: Utc::now(),
        }
    }

    #[inline]
    pub fn is_owner(&self) -> bool {
        self.role == ClubRole::Owner
    }

    /// Owners and moderators may invite
    #[inline]
    pub fn can_moderate(&self) -> bool {
        matches!(self.role, ClubRole::Owner | ClubRole::Moderator)
    }
}
