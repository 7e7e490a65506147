//! Club entity - a reading group with its own chat room

use chrono::{DateTime, Utc};

use crate::error::DomainError;
use crate::value_objects::{BookId, ClubId, UserId};

/// Maximum club name length in characters
pub const MAX_CLUB_NAME_LENGTH: usize = 120;

/// Club entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Club {
    pub id: ClubId,
    /// `None` for public clubs created by the admin flow
    pub owner_id: Option<UserId>,
    pub book_id: Option<BookId>,
    pub name: String,
    pub is_public: bool,
    pub cover_image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Club {
    #[inline]
    pub fn is_private(&self) -> bool {
        !self.is_public
    }

    /// Check if user owns this club
    #[inline]
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.owner_id == Some(user_id)
    }

    /// Validate a new name for this club
    pub fn validate_rename(&self, name: &str) -> Result<String, DomainError> {
        validate_club_name(name)
    }
}

/// Draft of a private club created by a signed-in user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewClub {
    pub owner_id: UserId,
    pub book_id: Option<BookId>,
    pub name: String,
}

impl NewClub {
    /// Validate a private club draft. The name is trimmed.
    pub fn private(
        owner_id: UserId,
        name: &str,
        book_id: Option<BookId>,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            owner_id,
            book_id,
            name: validate_club_name(name)?,
        })
    }
}

/// Trim and validate a club name
fn validate_club_name(name: &str) -> Result<String, DomainError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DomainError::ValidationError(
            "Club name cannot be empty".to_string(),
        ));
    }
    if name.chars().count() > MAX_CLUB_NAME_LENGTH {
        return Err(DomainError::ValidationError(format!(
            "Club name must be at most {MAX_CLUB_NAME_LENGTH} characters"
        )));
    }
    Ok(name.to_string())
}

/// Club listing row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClubSummary {
    pub club: Club,
    pub member_count: i64,
}

/// Filter for the public club directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClubFilter {
    pub book_id: Option<BookId>,
    /// Case-insensitive substring match on the name
    pub search: Option<String>,
    /// 1-based page number
    pub page: i64,
    pub per_page: i64,
}

impl ClubFilter {
    pub const DEFAULT_PER_PAGE: i64 = 20;
    pub const MAX_PER_PAGE: i64 = 100;

    #[inline]
    pub fn offset(&self) -> i64 {
        (self.page.max(1) - 1) * self.limit()
    }

    #[inline]
    pub fn limit(&self) -> i64 {
        self.per_page.clamp(1, Self::MAX_PER_PAGE)
    }
}

impl Default for ClubFilter {
    fn default() -> Self {
        Self {
            book_id: None,
            search: None,
            page: 1,
            per_page: Self::DEFAULT_PER_PAGE,
        }
    }
}
