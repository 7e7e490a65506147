//! # bookclub-service
//!
//! Application layer: club and conversation services, request/response
//! DTOs, and the in-process delivery hub for live subscribers.

pub mod delivery;
pub mod dto;
pub mod services;

pub use delivery::{DeliveryHub, Replay, Subscription, Topic};
pub use services::{
    ClubMessageService, ClubService, ConversationService, DirectMessageService,
    InvitationService, NotificationService, PostThrottle, ServiceContext, ServiceContextBuilder,
    ServiceError, ServiceResult,
};
