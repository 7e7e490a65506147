//! Direct message service
//!
//! Handles the conversation feed, posting, and live subscriptions.
//! Only approved participants may read or write.

use bookclub_core::entities::{NewDirectMessage, Participant};
use bookclub_core::traits::MessageQuery;
use bookclub_core::{
    AuthenticatedActor, ConversationId, DirectMessageCreatedEvent, DirectMessageId, DomainEvent,
    MessageBody,
};
use tracing::{info, instrument};

use crate::delivery::{Replay, Subscription, Topic, REPLAY_LIMIT};
use crate::dto::{DirectMessageResponse, FeedCursor, PaginatedResponse, PostMessageRequest};

use super::context::ServiceContext;
use super::conversation::load_participant;
use super::error::ServiceResult;
use super::feed::{message_query, page};

/// Direct message service
pub struct DirectMessageService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> DirectMessageService<'a> {
    /// Create a new DirectMessageService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    async fn require_approved(
        &self,
        conversation_id: ConversationId,
        actor: &AuthenticatedActor,
    ) -> ServiceResult<Participant> {
        let participant = load_participant(self.ctx, conversation_id, actor.id).await?;
        participant.ensure_approved()?;
        Ok(participant)
    }

    /// List a conversation's messages, newest first, and mark it read
    #[instrument(skip(self, actor), fields(user_id = %actor.id))]
    pub async fn list(
        &self,
        conversation_id: ConversationId,
        actor: &AuthenticatedActor,
        cursor: FeedCursor,
    ) -> ServiceResult<PaginatedResponse<DirectMessageResponse>> {
        self.require_approved(conversation_id, actor).await?;

        let query = message_query::<DirectMessageId>(cursor, self.ctx.messaging().dm_feed_limit);
        let limit = query.clamped_limit();

        let messages = self
            .ctx
            .direct_message_repo()
            .find_by_conversation(conversation_id, query)
            .await?;

        self.ctx
            .conversation_repo()
            .mark_read(conversation_id, actor.id)
            .await?;

        let items = messages.into_iter().map(DirectMessageResponse::from).collect();
        Ok(page(items, limit, |m: &DirectMessageResponse| m.id.into_inner()))
    }

    /// Post a direct message
    ///
    /// Only an approved, unmuted participant with a valid body spends the
    /// post throttle.
    #[instrument(skip(self, actor, request), fields(user_id = %actor.id))]
    pub async fn post(
        &self,
        conversation_id: ConversationId,
        actor: &AuthenticatedActor,
        request: PostMessageRequest,
    ) -> ServiceResult<DirectMessageResponse> {
        self.require_approved(conversation_id, actor).await?;
        actor.status.ensure_can_post()?;
        let body = MessageBody::parse(&request.body)?;
        self.ctx.post_throttle().check(actor.id)?;

        let message = self
            .ctx
            .direct_message_repo()
            .create(&NewDirectMessage::new(conversation_id, actor.id, body))
            .await?;

        info!(message_id = %message.id, conversation_id = %conversation_id, "Direct message created");

        self.ctx.hub().publish(
            Topic::Conversation(conversation_id),
            DomainEvent::DirectMessageCreated(DirectMessageCreatedEvent::from(&message)),
        );

        Ok(DirectMessageResponse::from(message))
    }

    /// Authorize a live subscription and register it
    #[instrument(skip(self, actor), fields(user_id = %actor.id))]
    pub async fn subscribe(
        &self,
        conversation_id: ConversationId,
        actor: &AuthenticatedActor,
    ) -> ServiceResult<Subscription> {
        self.require_approved(conversation_id, actor).await?;
        Ok(self.ctx.hub().subscribe(Topic::Conversation(conversation_id)))
    }

    /// Stored messages newer than `after`, oldest first, for live replay
    #[instrument(skip(self))]
    pub async fn replay(
        &self,
        conversation_id: ConversationId,
        after: DirectMessageId,
    ) -> ServiceResult<Replay> {
        let query = MessageQuery {
            before: None,
            after: Some(after),
            limit: REPLAY_LIMIT as i64,
        };
        let messages = self
            .ctx
            .direct_message_repo()
            .find_by_conversation(conversation_id, query)
            .await?;
        let truncated = messages.len() >= REPLAY_LIMIT;

        let events = messages
            .iter()
            .rev()
            .map(|m| DomainEvent::DirectMessageCreated(DirectMessageCreatedEvent::from(m)))
            .collect();

        Ok(Replay { events, truncated })
    }
}
