//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in bookclub-core.
//! Each repository handles database operations for a specific domain entity.

mod club;
mod conversation;
mod direct_message;
mod error;
mod invitation;
mod member;
mod message;
mod notification;
mod user;

pub use club::PgClubRepository;
pub use conversation::PgConversationRepository;
pub use direct_message::PgDirectMessageRepository;
pub use invitation::PgInvitationRepository;
pub use member::PgClubMemberRepository;
pub use message::PgClubMessageRepository;
pub use notification::PgNotificationRepository;
pub use user::PgUserRepository;
