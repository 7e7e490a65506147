//! Invitation entity - a token granting membership in a private club

use chrono::{DateTime, Duration, Utc};

use crate::error::DomainError;
use crate::value_objects::{ClubId, InvitationId, UserId};

/// Length of generated invitation tokens
pub const INVITATION_TOKEN_LENGTH: usize = 48;

/// Days an invitation stays valid
pub const INVITATION_TTL_DAYS: i64 = 7;

/// Who an invitation is addressed to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvitationTarget {
    User(UserId),
    Email(String),
}

/// Invitation entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invitation {
    pub id: InvitationId,
    pub club_id: ClubId,
    pub inviter_id: UserId,
    pub invitee_id: Option<UserId>,
    pub email: Option<String>,
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub accepted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Invitation {
    #[inline]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    #[inline]
    pub fn is_accepted(&self) -> bool {
        self.accepted_at.is_some()
    }

    /// Check that `user_id` may redeem this invitation at `now`.
    /// Invitations addressed by email can be redeemed by any signed-in user
    /// holding the token.
    pub fn ensure_acceptable_by(&self, user_id: UserId, now: DateTime<Utc>) -> Result<(), DomainError> {
        if self.is_accepted() {
            return Err(DomainError::InvitationAlreadyAccepted);
        }
        if self.is_expired(now) {
            return Err(DomainError::InvitationExpired);
        }
        match self.invitee_id {
            Some(invitee) if invitee != user_id => Err(DomainError::InvitationForAnotherUser),
            _ => Ok(()),
        }
    }
}

/// Draft of an invitation with a freshly generated token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInvitation {
    pub club_id: ClubId,
    pub inviter_id: UserId,
    pub invitee_id: Option<UserId>,
    pub email: Option<String>,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl NewInvitation {
    pub fn new(club_id: ClubId, inviter_id: UserId, target: InvitationTarget, now: DateTime<Utc>) -> Self {
        let (invitee_id, email) = match target {
            InvitationTarget::User(id) => (Some(id), None),
            InvitationTarget::Email(email) => (None, Some(email)),
        };
        Self {
            club_id,
            inviter_id,
            invitee_id,
            email,
            token: generate_invitation_token(),
            expires_at: now + Duration::days(INVITATION_TTL_DAYS),
        }
    }
}

/// Generate a cryptographically secure random invitation token
pub fn generate_invitation_token() -> String {
    use rand::Rng;

    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

    let mut rng = rand::thread_rng();
    (0..INVITATION_TOKEN_LENGTH)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect()
}
