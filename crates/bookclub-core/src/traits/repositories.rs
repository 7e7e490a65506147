//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation. Operations that must be atomic (starting a
//! conversation, withdrawing from one, accepting an invitation) are single
//! repository calls so the implementation can wrap them in one transaction.

use async_trait::async_trait;

use crate::entities::{
    Club, ClubFilter, ClubMember, ClubMessage, ClubRole, ClubSummary, Conversation,
    ConversationStart, DenyOutcome, DirectMessage, DirectPair, DirectRequest, InboxEntry,
    Invitation, NewClub, NewClubMessage, NewDirectMessage, NewInvitation, NewNotification,
    Notification, Participant, User,
};
use crate::error::DomainError;
use crate::value_objects::{
    ClubId, ConversationId, DirectMessageId, MessageId, NotificationId, UserId,
};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

/// Keyset pagination over a message feed.
///
/// `before` yields the page of ids below the cursor, `after` the page above
/// it, and neither yields the latest page. Implementations return rows
/// newest first in every case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageQuery<I> {
    pub before: Option<I>,
    pub after: Option<I>,
    pub limit: i64,
}

impl<I> MessageQuery<I> {
    pub const MAX_LIMIT: i64 = 100;

    pub fn latest(limit: i64) -> Self {
        Self {
            before: None,
            after: None,
            limit,
        }
    }

    /// Limit clamped to `1..=MAX_LIMIT`
    #[inline]
    pub fn clamped_limit(&self) -> i64 {
        self.limit.clamp(1, Self::MAX_LIMIT)
    }
}

// ============================================================================
// User Repository
// ============================================================================

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: UserId) -> RepoResult<Option<User>>;

    /// Find user by exact name
    async fn find_by_name(&self, name: &str) -> RepoResult<Option<User>>;
}

// ============================================================================
// Club Repository
// ============================================================================

#[async_trait]
pub trait ClubRepository: Send + Sync {
    /// Find club by ID
    async fn find_by_id(&self, id: ClubId) -> RepoResult<Option<Club>>;

    /// Page through public clubs, newest first
    async fn list_public(&self, filter: &ClubFilter) -> RepoResult<Vec<ClubSummary>>;

    /// Get member count for a club
    async fn member_count(&self, club_id: ClubId) -> RepoResult<i64>;

    /// Create a private club and its owner membership together
    async fn create_private(&self, club: &NewClub) -> RepoResult<Club>;

    /// Rename a club
    async fn rename(&self, club_id: ClubId, name: &str) -> RepoResult<Club>;

    /// Delete a club with its members, messages, and invitations
    async fn delete(&self, club_id: ClubId) -> RepoResult<()>;
}

// ============================================================================
// Club Member Repository
// ============================================================================

#[async_trait]
pub trait ClubMemberRepository: Send + Sync {
    /// Find a user's membership in a club
    async fn find(&self, club_id: ClubId, user_id: UserId) -> RepoResult<Option<ClubMember>>;

    /// Add a member; returns `false` if the user was already a member
    async fn add(&self, club_id: ClubId, user_id: UserId, role: ClubRole) -> RepoResult<bool>;

    /// Remove a member; returns `false` if there was no membership
    async fn remove(&self, club_id: ClubId, user_id: UserId) -> RepoResult<bool>;
}

// ============================================================================
// Club Message Repository
// ============================================================================

#[async_trait]
pub trait ClubMessageRepository: Send + Sync {
    /// Store a message and return it with its author projection
    async fn create(&self, message: &NewClubMessage) -> RepoResult<ClubMessage>;

    /// List messages in a club with pagination
    async fn find_by_club(
        &self,
        club_id: ClubId,
        query: MessageQuery<MessageId>,
    ) -> RepoResult<Vec<ClubMessage>>;
}

// ============================================================================
// Conversation Repository
// ============================================================================

#[async_trait]
pub trait ConversationRepository: Send + Sync {
    /// Find conversation by ID
    async fn find_by_id(&self, id: ConversationId) -> RepoResult<Option<Conversation>>;

    /// Find the direct conversation for a pair, if any
    async fn find_direct(&self, pair: DirectPair) -> RepoResult<Option<ConversationId>>;

    /// Find or create the direct conversation for the request's pair.
    ///
    /// On creation this writes the conversation, both participants, and the
    /// recipient's request notification in one transaction. Concurrent calls
    /// for the same pair resolve to the same conversation.
    async fn start_direct(&self, request: &DirectRequest) -> RepoResult<ConversationStart>;

    /// Find a user's participant row
    async fn find_participant(
        &self,
        conversation_id: ConversationId,
        user_id: UserId,
    ) -> RepoResult<Option<Participant>>;

    /// All participants of a conversation
    async fn participants(&self, conversation_id: ConversationId) -> RepoResult<Vec<Participant>>;

    /// Approve a pending participant and optionally mark the triggering
    /// notification read. Approving twice keeps the first timestamp.
    async fn approve(
        &self,
        conversation_id: ConversationId,
        user_id: UserId,
        notification_id: Option<NotificationId>,
    ) -> RepoResult<Participant>;

    /// Remove a participant, optionally marking the triggering notification
    /// read, and delete the conversation if nobody is left
    async fn withdraw(
        &self,
        conversation_id: ConversationId,
        user_id: UserId,
        notification_id: Option<NotificationId>,
    ) -> RepoResult<DenyOutcome>;

    /// Record that the user has read the conversation up to now
    async fn mark_read(&self, conversation_id: ConversationId, user_id: UserId) -> RepoResult<()>;

    /// The user's conversations, most recently active first
    async fn inbox(&self, user_id: UserId, limit: i64) -> RepoResult<Vec<InboxEntry>>;
}

// ============================================================================
// Direct Message Repository
// ============================================================================

#[async_trait]
pub trait DirectMessageRepository: Send + Sync {
    /// Store a message and bump the conversation's activity time
    async fn create(&self, message: &NewDirectMessage) -> RepoResult<DirectMessage>;

    /// List messages in a conversation with pagination
    async fn find_by_conversation(
        &self,
        conversation_id: ConversationId,
        query: MessageQuery<DirectMessageId>,
    ) -> RepoResult<Vec<DirectMessage>>;
}

// ============================================================================
// Notification Repository
// ============================================================================

#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Store a notification
    async fn create(&self, notification: &NewNotification) -> RepoResult<Notification>;

    /// Unread notifications for a user, newest first
    async fn find_unread(&self, user_id: UserId, limit: i64) -> RepoResult<Vec<Notification>>;

    /// Mark one of the user's notifications read; returns `false` if the
    /// user has no such notification
    async fn mark_read(&self, user_id: UserId, id: NotificationId) -> RepoResult<bool>;
}

// ============================================================================
// Invitation Repository
// ============================================================================

#[async_trait]
pub trait InvitationRepository: Send + Sync {
    /// Store an invitation
    async fn create(&self, invitation: &NewInvitation) -> RepoResult<Invitation>;

    /// Find invitation by token
    async fn find_by_token(&self, token: &str) -> RepoResult<Option<Invitation>>;

    /// Add the user as a member and stamp the invitation accepted, in one
    /// transaction. Fails with `InvitationAlreadyAccepted` if it was
    /// accepted concurrently.
    async fn accept(&self, invitation: &Invitation, user_id: UserId) -> RepoResult<()>;
}
