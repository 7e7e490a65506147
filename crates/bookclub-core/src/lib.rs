//! # bookclub-core
//!
//! Domain layer for club chat and direct messaging: entities, value objects,
//! the club access policy, repository traits, and domain events.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod events;
pub mod policy;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    generate_invitation_token, Club, ClubFilter, ClubMember, ClubMessage, ClubRole, ClubSummary,
    Conversation, ConversationStart, DenyOutcome, DirectMessage, DirectPair, DirectRequest,
    InboxEntry, InboxPreview, Invitation, InvitationTarget, MessageAuthor, MessageType,
    NewClub, NewClubMessage, NewDirectMessage, NewInvitation, NewNotification, Notification,
    NotificationPayload, Participant, ParticipantState, User,
};
pub use error::DomainError;
pub use events::{DirectMessageCreatedEvent, DomainEvent, MessageCreatedEvent};
pub use policy::{authorize_manage, authorize_post, authorize_view, ManageAction};
pub use traits::{
    ClubMemberRepository, ClubMessageRepository, ClubRepository, ConversationRepository,
    DirectMessageRepository, InvitationRepository, MessageQuery, NotificationRepository,
    RepoResult, UserRepository,
};
pub use value_objects::{
    Actor, ActorStatus, AuthenticatedActor, BookId, ClubId, ConversationId, DirectMessageId,
    IdParseError, InvitationId, MessageBody, MessageId, NotificationId, UserId,
    MAX_MESSAGE_LENGTH,
};
