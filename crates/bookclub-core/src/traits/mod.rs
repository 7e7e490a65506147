//! Repository traits (ports)

mod repositories;

pub use repositories::{
    ClubMemberRepository, ClubMessageRepository, ClubRepository, ConversationRepository,
    DirectMessageRepository, InvitationRepository, MessageQuery, NotificationRepository,
    RepoResult, UserRepository,
};
