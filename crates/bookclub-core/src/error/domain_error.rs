//! Domain errors - error types for the domain layer

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::value_objects::{ClubId, ConversationId, NotificationId, UserId};

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("User not found: {0}")]
    UserNotFound(UserId),

    #[error("Club not found: {0}")]
    ClubNotFound(ClubId),

    #[error("Conversation not found: {0}")]
    ConversationNotFound(ConversationId),

    #[error("Notification not found: {0}")]
    NotificationNotFound(NotificationId),

    #[error("Invitation not found")]
    InvitationNotFound,

    #[error("Member not found in club")]
    MemberNotFound,

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Message body cannot be empty")]
    EmptyMessage,

    #[error("Content too long: max {max} characters")]
    ContentTooLong { max: usize },

    #[error("You cannot message yourself.")]
    SelfMessage,

    // =========================================================================
    // Authentication Errors
    // =========================================================================
    #[error("Authentication required")]
    Unauthenticated,

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("You are not a member of this club")]
    NotClubMember,

    #[error("Not club owner")]
    NotClubOwner,

    #[error("Only club owners and moderators can do that")]
    NotClubModerator,

    #[error("Private clubs require an invitation.")]
    PrivateClubRequiresInvitation,

    #[error("You are not a participant in this conversation")]
    NotParticipant,

    #[error("Accept the message request before replying")]
    PendingApproval,

    #[error("This invitation was issued to another user")]
    InvitationForAnotherUser,

    #[error("You are muted until {}", .until.format("%Y-%m-%d %H:%M UTC"))]
    Muted { until: DateTime<Utc> },

    #[error("User is banned")]
    UserBanned,

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Already a member of this club")]
    AlreadyMember,

    #[error("Invitation has already been accepted")]
    InvitationAlreadyAccepted,

    #[error("Invitation token already exists")]
    InvitationTokenExists,

    // =========================================================================
    // Business Rule Violations
    // =========================================================================
    #[error("Use admin flow to create public clubs.")]
    PublicClubRequiresAdmin,

    #[error("Public clubs do not use invitations")]
    PublicClubNotInvitable,

    #[error("Public clubs cannot be deleted")]
    CannotDeletePublicClub,

    #[error("Cannot leave owned club (delete it instead)")]
    CannotLeaveOwnedClub,

    #[error("Invitation has expired")]
    InvitationExpired,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::UserNotFound(_) => "UNKNOWN_USER",
            Self::ClubNotFound(_) => "UNKNOWN_CLUB",
            Self::ConversationNotFound(_) => "UNKNOWN_CONVERSATION",
            Self::NotificationNotFound(_) => "UNKNOWN_NOTIFICATION",
            Self::InvitationNotFound => "UNKNOWN_INVITATION",
            Self::MemberNotFound => "UNKNOWN_MEMBER",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::EmptyMessage => "EMPTY_MESSAGE",
            Self::ContentTooLong { .. } => "CONTENT_TOO_LONG",
            Self::SelfMessage => "SELF_MESSAGE",

            // Authentication
            Self::Unauthenticated => "UNAUTHENTICATED",

            // Authorization
            Self::NotClubMember => "NOT_CLUB_MEMBER",
            Self::NotClubOwner => "NOT_CLUB_OWNER",
            Self::NotClubModerator => "NOT_CLUB_MODERATOR",
            Self::PrivateClubRequiresInvitation => "INVITATION_REQUIRED",
            Self::NotParticipant => "NOT_PARTICIPANT",
            Self::PendingApproval => "PENDING_APPROVAL",
            Self::InvitationForAnotherUser => "INVITATION_FOR_ANOTHER_USER",
            Self::Muted { .. } => "USER_MUTED",
            Self::UserBanned => "USER_BANNED",

            // Conflict
            Self::AlreadyMember => "ALREADY_MEMBER",
            Self::InvitationAlreadyAccepted => "INVITATION_ALREADY_ACCEPTED",
            Self::InvitationTokenExists => "INVITATION_TOKEN_EXISTS",

            // Business Rules
            Self::PublicClubRequiresAdmin => "PUBLIC_CLUB_REQUIRES_ADMIN",
            Self::PublicClubNotInvitable => "PUBLIC_CLUB_NOT_INVITABLE",
            Self::CannotDeletePublicClub => "CANNOT_DELETE_PUBLIC_CLUB",
            Self::CannotLeaveOwnedClub => "CANNOT_LEAVE_OWNED_CLUB",
            Self::InvitationExpired => "INVITATION_EXPIRED",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UserNotFound(_)
                | Self::ClubNotFound(_)
                | Self::ConversationNotFound(_)
                | Self::NotificationNotFound(_)
                | Self::InvitationNotFound
                | Self::MemberNotFound
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_)
                | Self::EmptyMessage
                | Self::ContentTooLong { .. }
                | Self::SelfMessage
        )
    }

    /// Check if the caller is not signed in
    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::Unauthenticated)
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(
            self,
            Self::NotClubMember
                | Self::NotClubOwner
                | Self::NotClubModerator
                | Self::PrivateClubRequiresInvitation
                | Self::NotParticipant
                | Self::PendingApproval
                | Self::InvitationForAnotherUser
                | Self::Muted { .. }
                | Self::UserBanned
        )
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::AlreadyMember | Self::InvitationAlreadyAccepted | Self::InvitationTokenExists
        )
    }

    /// Check if this is a business rule violation
    pub fn is_business_rule(&self) -> bool {
        matches!(
            self,
            Self::PublicClubRequiresAdmin
                | Self::PublicClubNotInvitable
                | Self::CannotDeletePublicClub
                | Self::CannotLeaveOwnedClub
                | Self::InvitationExpired
        )
    }
}
