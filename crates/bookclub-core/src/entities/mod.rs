//! Domain entities - core business objects

mod club;
mod conversation;
mod direct_message;
mod invitation;
mod member;
mod message;
mod notification;
mod user;

pub use club::{Club, ClubFilter, ClubSummary, NewClub, MAX_CLUB_NAME_LENGTH};
pub use conversation::{
    Conversation, ConversationStart, DenyOutcome, DirectPair, DirectRequest, InboxEntry,
    InboxPreview, Participant, ParticipantState,
};
pub use direct_message::{DirectMessage, NewDirectMessage};
pub use invitation::{
    generate_invitation_token, Invitation, InvitationTarget, NewInvitation,
    INVITATION_TOKEN_LENGTH, INVITATION_TTL_DAYS,
};
pub use member::{ClubMember, ClubRole};
pub use message::{ClubMessage, MessageAuthor, MessageType, NewClubMessage};
pub use notification::{NewNotification, Notification, NotificationPayload};
pub use user::User;
