//! Club message service
//!
//! Handles the club feed, posting, and live subscriptions.

use bookclub_core::entities::NewClubMessage;
use bookclub_core::traits::MessageQuery;
use bookclub_core::{Actor, ClubId, DomainEvent, MessageBody, MessageCreatedEvent, MessageId};
use tracing::{info, instrument};

use crate::delivery::{Replay, Subscription, Topic, REPLAY_LIMIT};
use crate::dto::{ClubMessageResponse, FeedCursor, PaginatedResponse, PostMessageRequest};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::feed::{message_query, page};
use super::gate::ClubGate;

/// Club message service
pub struct ClubMessageService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ClubMessageService<'a> {
    /// Create a new ClubMessageService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// List a club's messages, newest first
    #[instrument(skip(self, actor))]
    pub async fn list(
        &self,
        club_id: ClubId,
        actor: &Actor,
        cursor: FeedCursor,
    ) -> ServiceResult<PaginatedResponse<ClubMessageResponse>> {
        ClubGate::new(self.ctx).authorize_view(club_id, actor).await?;
        self.feed(club_id, cursor).await
    }

    /// Post a text message
    ///
    /// The gate runs before the body is parsed and the throttle is spent
    /// last; nothing is stored when any of them rejects.
    #[instrument(skip(self, actor, request))]
    pub async fn post(
        &self,
        club_id: ClubId,
        actor: &Actor,
        request: PostMessageRequest,
    ) -> ServiceResult<ClubMessageResponse> {
        ClubGate::new(self.ctx).authorize_post(club_id, actor).await?;
        let author = actor.require_authenticated()?;
        let body = MessageBody::parse(&request.body)?;
        self.ctx.post_throttle().check(author.id)?;

        let message = self
            .ctx
            .message_repo()
            .create(&NewClubMessage::text(club_id, author.id, body))
            .await?;

        info!(message_id = %message.id, club_id = %club_id, user_id = %author.id, "Club message created");

        self.ctx.hub().publish(
            Topic::Club(club_id),
            DomainEvent::MessageCreated(MessageCreatedEvent::from(&message)),
        );

        Ok(ClubMessageResponse::from(message))
    }

    /// Authorize a live subscription and register it
    ///
    /// The receiver is registered before any replay so nothing stored
    /// between the replay query and the first live event is lost.
    #[instrument(skip(self, actor))]
    pub async fn subscribe(&self, club_id: ClubId, actor: &Actor) -> ServiceResult<Subscription> {
        ClubGate::new(self.ctx).authorize_view(club_id, actor).await?;
        Ok(self.ctx.hub().subscribe(Topic::Club(club_id)))
    }

    /// Stored messages newer than `after`, oldest first, for live replay
    #[instrument(skip(self))]
    pub async fn replay(&self, club_id: ClubId, after: MessageId) -> ServiceResult<Replay> {
        let query = MessageQuery {
            before: None,
            after: Some(after),
            limit: REPLAY_LIMIT as i64,
        };
        let messages = self.ctx.message_repo().find_by_club(club_id, query).await?;
        let truncated = messages.len() >= REPLAY_LIMIT;

        let events = messages
            .iter()
            .rev()
            .map(|m| DomainEvent::MessageCreated(MessageCreatedEvent::from(m)))
            .collect();

        Ok(Replay { events, truncated })
    }

    async fn feed(
        &self,
        club_id: ClubId,
        cursor: FeedCursor,
    ) -> ServiceResult<PaginatedResponse<ClubMessageResponse>> {
        let query = message_query::<MessageId>(cursor, self.ctx.messaging().club_feed_limit);
        let limit = query.clamped_limit();

        let messages = self.ctx.message_repo().find_by_club(club_id, query).await?;
        let items = messages.into_iter().map(ClubMessageResponse::from).collect();

        Ok(page(items, limit, |m: &ClubMessageResponse| m.id.into_inner()))
    }
}
