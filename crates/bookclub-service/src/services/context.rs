//! Service context - dependency container for services
//!
//! Holds all repositories, the delivery hub, and the messaging limits
//! needed by services.

use std::sync::Arc;

use bookclub_common::{JwtService, MessagingConfig};
use bookclub_core::traits::{
    ClubMemberRepository, ClubMessageRepository, ClubRepository, ConversationRepository,
    DirectMessageRepository, InvitationRepository, NotificationRepository, UserRepository,
};
use bookclub_db::{
    PgClubMemberRepository, PgClubMessageRepository, PgClubRepository, PgConversationRepository,
    PgDirectMessageRepository, PgInvitationRepository, PgNotificationRepository, PgPool,
    PgUserRepository,
};

use crate::delivery::DeliveryHub;

use super::error::{ServiceError, ServiceResult};
use super::throttle::PostThrottle;

/// Service context containing all dependencies
///
/// This is the main dependency container that gets passed to all services.
/// It provides access to:
/// - Repositories (PostgreSQL in production, in-memory in tests)
/// - The live delivery hub
/// - JWT service for bearer token validation
/// - Messaging limits and the shared post throttle
#[derive(Clone)]
pub struct ServiceContext {
    // Database pool, absent when repositories are not backed by PostgreSQL
    pool: Option<PgPool>,

    // Repositories
    user_repo: Arc<dyn UserRepository>,
    club_repo: Arc<dyn ClubRepository>,
    member_repo: Arc<dyn ClubMemberRepository>,
    message_repo: Arc<dyn ClubMessageRepository>,
    conversation_repo: Arc<dyn ConversationRepository>,
    direct_message_repo: Arc<dyn DirectMessageRepository>,
    notification_repo: Arc<dyn NotificationRepository>,
    invitation_repo: Arc<dyn InvitationRepository>,

    // Delivery
    hub: DeliveryHub,

    // Services
    jwt_service: Arc<JwtService>,
    messaging: MessagingConfig,
    post_throttle: Arc<PostThrottle>,
}

impl ServiceContext {
    /// Wire PostgreSQL repositories over one pool
    pub fn postgres(
        pool: PgPool,
        jwt_service: Arc<JwtService>,
        messaging: MessagingConfig,
    ) -> ServiceResult<Self> {
        ServiceContextBuilder::new()
            .user_repo(Arc::new(PgUserRepository::new(pool.clone())))
            .club_repo(Arc::new(PgClubRepository::new(pool.clone())))
            .member_repo(Arc::new(PgClubMemberRepository::new(pool.clone())))
            .message_repo(Arc::new(PgClubMessageRepository::new(pool.clone())))
            .conversation_repo(Arc::new(PgConversationRepository::new(pool.clone())))
            .direct_message_repo(Arc::new(PgDirectMessageRepository::new(pool.clone())))
            .notification_repo(Arc::new(PgNotificationRepository::new(pool.clone())))
            .invitation_repo(Arc::new(PgInvitationRepository::new(pool.clone())))
            .hub(DeliveryHub::new(messaging.delivery_buffer))
            .jwt_service(jwt_service)
            .messaging(messaging)
            .pool(pool)
            .build()
    }

    // === Database Pool ===

    /// Get the PostgreSQL connection pool
    pub fn pool(&self) -> Option<&PgPool> {
        self.pool.as_ref()
    }

    // === Repositories ===

    pub fn user_repo(&self) -> &dyn UserRepository {
        self.user_repo.as_ref()
    }

    pub fn club_repo(&self) -> &dyn ClubRepository {
        self.club_repo.as_ref()
    }

    pub fn member_repo(&self) -> &dyn ClubMemberRepository {
        self.member_repo.as_ref()
    }

    pub fn message_repo(&self) -> &dyn ClubMessageRepository {
        self.message_repo.as_ref()
    }

    pub fn conversation_repo(&self) -> &dyn ConversationRepository {
        self.conversation_repo.as_ref()
    }

    pub fn direct_message_repo(&self) -> &dyn DirectMessageRepository {
        self.direct_message_repo.as_ref()
    }

    pub fn notification_repo(&self) -> &dyn NotificationRepository {
        self.notification_repo.as_ref()
    }

    pub fn invitation_repo(&self) -> &dyn InvitationRepository {
        self.invitation_repo.as_ref()
    }

    // === Delivery ===

    /// Get the live delivery hub
    pub fn hub(&self) -> &DeliveryHub {
        &self.hub
    }

    // === Services ===

    /// Get the JWT service
    pub fn jwt_service(&self) -> &JwtService {
        self.jwt_service.as_ref()
    }

    /// Feed sizes, throttle, and live delivery settings
    pub fn messaging(&self) -> &MessagingConfig {
        &self.messaging
    }

    /// Per-user posting budget shared by club and direct messages
    pub fn post_throttle(&self) -> &PostThrottle {
        &self.post_throttle
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("pool", &self.pool.as_ref().map(|_| "PgPool"))
            .field("repositories", &"...")
            .field("hub", &self.hub)
            .field("messaging", &self.messaging)
            .field("post_throttle", &self.post_throttle)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
#[derive(Default)]
pub struct ServiceContextBuilder {
    pool: Option<PgPool>,
    user_repo: Option<Arc<dyn UserRepository>>,
    club_repo: Option<Arc<dyn ClubRepository>>,
    member_repo: Option<Arc<dyn ClubMemberRepository>>,
    message_repo: Option<Arc<dyn ClubMessageRepository>>,
    conversation_repo: Option<Arc<dyn ConversationRepository>>,
    direct_message_repo: Option<Arc<dyn DirectMessageRepository>>,
    notification_repo: Option<Arc<dyn NotificationRepository>>,
    invitation_repo: Option<Arc<dyn InvitationRepository>>,
    hub: Option<DeliveryHub>,
    jwt_service: Option<Arc<JwtService>>,
    messaging: Option<MessagingConfig>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pool(mut self, pool: PgPool) -> Self {
        self.pool = Some(pool);
        self
    }

    pub fn user_repo(mut self, repo: Arc<dyn UserRepository>) -> Self {
        self.user_repo = Some(repo);
        self
    }

    pub fn club_repo(mut self, repo: Arc<dyn ClubRepository>) -> Self {
        self.club_repo = Some(repo);
        self
    }

    pub fn member_repo(mut self, repo: Arc<dyn ClubMemberRepository>) -> Self {
        self.member_repo = Some(repo);
        self
    }

    pub fn message_repo(mut self, repo: Arc<dyn ClubMessageRepository>) -> Self {
        self.message_repo = Some(repo);
        self
    }

    pub fn conversation_repo(mut self, repo: Arc<dyn ConversationRepository>) -> Self {
        self.conversation_repo = Some(repo);
        self
    }

    pub fn direct_message_repo(mut self, repo: Arc<dyn DirectMessageRepository>) -> Self {
        self.direct_message_repo = Some(repo);
        self
    }

    pub fn notification_repo(mut self, repo: Arc<dyn NotificationRepository>) -> Self {
        self.notification_repo = Some(repo);
        self
    }

    pub fn invitation_repo(mut self, repo: Arc<dyn InvitationRepository>) -> Self {
        self.invitation_repo = Some(repo);
        self
    }

    pub fn hub(mut self, hub: DeliveryHub) -> Self {
        self.hub = Some(hub);
        self
    }

    pub fn jwt_service(mut self, service: Arc<JwtService>) -> Self {
        self.jwt_service = Some(service);
        self
    }

    pub fn messaging(mut self, messaging: MessagingConfig) -> Self {
        self.messaging = Some(messaging);
        self
    }

    /// Build the ServiceContext
    ///
    /// The pool is optional. The hub and messaging limits fall back to
    /// defaults; every repository and the JWT service are required.
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        let messaging = self.messaging.unwrap_or_default();
        Ok(ServiceContext {
            pool: self.pool,
            user_repo: self.user_repo.ok_or_else(|| missing("user_repo"))?,
            club_repo: self.club_repo.ok_or_else(|| missing("club_repo"))?,
            member_repo: self.member_repo.ok_or_else(|| missing("member_repo"))?,
            message_repo: self.message_repo.ok_or_else(|| missing("message_repo"))?,
            conversation_repo: self
                .conversation_repo
                .ok_or_else(|| missing("conversation_repo"))?,
            direct_message_repo: self
                .direct_message_repo
                .ok_or_else(|| missing("direct_message_repo"))?,
            notification_repo: self
                .notification_repo
                .ok_or_else(|| missing("notification_repo"))?,
            invitation_repo: self
                .invitation_repo
                .ok_or_else(|| missing("invitation_repo"))?,
            hub: self
                .hub
                .unwrap_or_else(|| DeliveryHub::new(messaging.delivery_buffer)),
            jwt_service: self.jwt_service.ok_or_else(|| missing("jwt_service"))?,
            post_throttle: Arc::new(PostThrottle::per_minute(messaging.post_throttle_per_minute)),
            messaging,
        })
    }
}

fn missing(name: &str) -> ServiceError {
    ServiceError::validation(format!("{name} is required"))
}
