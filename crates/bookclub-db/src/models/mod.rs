//! Database models - SQLx-compatible structs for PostgreSQL tables

mod club;
mod conversation;
mod invitation;
mod message;
mod notification;
mod user;

pub use club::{ClubMemberModel, ClubModel, ClubSummaryModel};
pub use conversation::{ConversationModel, InboxRowModel, ParticipantModel};
pub use invitation::InvitationModel;
pub use message::{ClubMessageModel, DirectMessageModel};
pub use notification::NotificationModel;
pub use user::UserModel;
