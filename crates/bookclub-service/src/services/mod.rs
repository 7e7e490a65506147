//! Business logic services
//!
//! This module contains all service layer implementations that handle
//! business logic, validation, and orchestration of domain operations.

pub mod club;
pub mod club_message;
pub mod context;
pub mod conversation;
pub mod direct_message;
pub mod error;
mod feed;
pub mod gate;
pub mod invitation;
pub mod notification;
pub mod throttle;

// Re-export all services for convenience
pub use club::ClubService;
pub use club_message::ClubMessageService;
pub use context::{ServiceContext, ServiceContextBuilder};
pub use conversation::{thread_location, ConversationService, THREAD_MESSAGE_LIMIT};
pub use direct_message::DirectMessageService;
pub use error::{ServiceError, ServiceResult};
pub use gate::{ClubAccess, ClubGate};
pub use invitation::InvitationService;
pub use notification::NotificationService;
pub use throttle::PostThrottle;
