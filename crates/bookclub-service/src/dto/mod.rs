//! Data transfer objects for API requests and responses
//!
//! This module provides:
//! - Request DTOs with validation for API inputs
//! - Response DTOs for serializing API outputs
//! - Mappers for converting domain entities to DTOs

pub mod mappers;
pub mod requests;
pub mod responses;

pub use requests::{
    AddMemberRequest, ClubListQuery, CreateClubRequest, CreateInvitationRequest, FeedCursor,
    PostMessageRequest, RenameClubRequest, RequestDecision,
};

pub use responses::{
    AddMemberResponse, ApiResponse, ClubMessageResponse, ClubPageResponse, ClubResponse,
    ConversationStartResponse, DenyResponse, DirectMessageResponse, HealthChecks, HealthResponse,
    InboxEntryResponse, InboxMessageResponse, InvitationResponse, NotificationResponse,
    PaginatedResponse, PaginationMeta, ParticipantResponse, ReadinessResponse, ThreadResponse,
};
