//! Value objects - immutable types that represent domain concepts

mod actor;
mod ids;
mod message_body;

pub use actor::{Actor, ActorStatus, AuthenticatedActor};
pub use ids::{
    BookId, ClubId, ConversationId, DirectMessageId, IdParseError, InvitationId, MessageId,
    NotificationId, UserId,
};
pub use message_body::{MessageBody, MAX_MESSAGE_LENGTH};
