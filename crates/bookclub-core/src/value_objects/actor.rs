//! The caller of an operation, resolved once per request

use chrono::{DateTime, Utc};

use super::UserId;
use crate::entities::User;
use crate::error::DomainError;

/// Moderation state of an account at a point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorStatus {
    Active,
    MutedUntil(DateTime<Utc>),
    Banned,
}

impl ActorStatus {
    /// Resolve the status from the stored moderation columns.
    /// A ban wins over a mute; a mute in the past is ignored.
    pub fn resolve(is_banned: bool, muted_until: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Self {
        if is_banned {
            return Self::Banned;
        }
        match muted_until {
            Some(until) if until > now => Self::MutedUntil(until),
            _ => Self::Active,
        }
    }

    #[inline]
    pub fn is_banned(&self) -> bool {
        matches!(self, Self::Banned)
    }

    pub fn muted_until(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::MutedUntil(until) => Some(*until),
            _ => None,
        }
    }

    /// Check that this account may write messages
    pub fn ensure_can_post(&self) -> Result<(), DomainError> {
        match self {
            Self::Active => Ok(()),
            Self::MutedUntil(until) => Err(DomainError::Muted { until: *until }),
            Self::Banned => Err(DomainError::UserBanned),
        }
    }
}

/// A signed-in caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedActor {
    pub id: UserId,
    pub name: String,
    pub status: ActorStatus,
}

impl AuthenticatedActor {
    pub fn new(id: UserId, name: impl Into<String>, status: ActorStatus) -> Self {
        Self {
            id,
            name: name.into(),
            status,
        }
    }

    /// Build the actor for a loaded user account
    pub fn from_user(user: &User, now: DateTime<Utc>) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            status: user.status(now),
        }
    }
}

/// Anyone making a request, signed in or not
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Actor {
    Guest,
    User(AuthenticatedActor),
}

impl Actor {
    pub fn id(&self) -> Option<UserId> {
        self.authenticated().map(|a| a.id)
    }

    pub fn authenticated(&self) -> Option<&AuthenticatedActor> {
        match self {
            Self::Guest => None,
            Self::User(actor) => Some(actor),
        }
    }

    /// Require a signed-in caller
    pub fn require_authenticated(&self) -> Result<&AuthenticatedActor, DomainError> {
        self.authenticated().ok_or(DomainError::Unauthenticated)
    }

    #[inline]
    pub fn is_guest(&self) -> bool {
        matches!(self, Self::Guest)
    }
}

impl From<AuthenticatedActor> for Actor {
    fn from(actor: AuthenticatedActor) -> Self {
        Self::User(actor)
    }
}
