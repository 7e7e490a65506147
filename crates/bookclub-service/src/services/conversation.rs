//! Conversation service
//!
//! Handles 1:1 conversation start, the message-request accept/deny flow,
//! the inbox, and the thread view.

use bookclub_core::entities::{DirectRequest, Participant};
use bookclub_core::traits::MessageQuery;
use bookclub_core::{
    AuthenticatedActor, ConversationId, DirectMessageId, DomainError, MessageAuthor, UserId,
};
use tracing::{info, instrument};

use crate::dto::{
    ApiResponse, ConversationStartResponse, DenyResponse, DirectMessageResponse,
    InboxEntryResponse, ParticipantResponse, RequestDecision, ThreadResponse,
};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Messages shown in the thread view
pub const THREAD_MESSAGE_LIMIT: i64 = 50;

/// Thread URL for a conversation
pub fn thread_location(conversation_id: ConversationId) -> String {
    format!("/messages/{conversation_id}")
}

/// Load the caller's participant row, failing with 404 for a missing
/// conversation and 403 for an outsider
pub(crate) async fn load_participant(
    ctx: &ServiceContext,
    conversation_id: ConversationId,
    user_id: UserId,
) -> ServiceResult<Participant> {
    if ctx
        .conversation_repo()
        .find_by_id(conversation_id)
        .await?
        .is_none()
    {
        return Err(DomainError::ConversationNotFound(conversation_id).into());
    }

    let participant = ctx
        .conversation_repo()
        .find_participant(conversation_id, user_id)
        .await?
        .ok_or(DomainError::NotParticipant)?;

    Ok(participant)
}

/// Conversation service
pub struct ConversationService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ConversationService<'a> {
    /// Create a new ConversationService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Find or create the direct conversation with `target_id`
    ///
    /// A new conversation is stored with both participants and the
    /// recipient's request notification in one transaction.
    #[instrument(skip(self, actor), fields(user_id = %actor.id))]
    pub async fn start(
        &self,
        actor: &AuthenticatedActor,
        target_id: UserId,
    ) -> ServiceResult<ConversationStartResponse> {
        let request = DirectRequest::new(actor.id, actor.name.clone(), target_id)?;

        self.ctx
            .user_repo()
            .find_by_id(target_id)
            .await?
            .ok_or(DomainError::UserNotFound(target_id))?;

        let start = self.ctx.conversation_repo().start_direct(&request).await?;

        if start.created {
            info!(
                conversation_id = %start.conversation_id,
                target_id = %target_id,
                "Direct conversation created"
            );
        }

        Ok(ConversationStartResponse {
            conversation_id: start.conversation_id,
            created: start.created,
            location: thread_location(start.conversation_id),
        })
    }

    /// Accept a message request
    #[instrument(skip(self, actor), fields(user_id = %actor.id))]
    pub async fn accept(
        &self,
        actor: &AuthenticatedActor,
        conversation_id: ConversationId,
        decision: RequestDecision,
    ) -> ServiceResult<ParticipantResponse> {
        self.ctx
            .conversation_repo()
            .find_by_id(conversation_id)
            .await?
            .ok_or(DomainError::ConversationNotFound(conversation_id))?;

        let participant = self
            .ctx
            .conversation_repo()
            .approve(conversation_id, actor.id, decision.notification_id)
            .await?;

        info!(conversation_id = %conversation_id, "Message request accepted");

        Ok(ParticipantResponse::from(participant))
    }

    /// Deny a message request, leaving the conversation
    #[instrument(skip(self, actor), fields(user_id = %actor.id))]
    pub async fn deny(
        &self,
        actor: &AuthenticatedActor,
        conversation_id: ConversationId,
        decision: RequestDecision,
    ) -> ServiceResult<DenyResponse> {
        let outcome = self
            .ctx
            .conversation_repo()
            .withdraw(conversation_id, actor.id, decision.notification_id)
            .await?;

        info!(
            conversation_id = %conversation_id,
            deleted = outcome.conversation_deleted,
            "Message request denied"
        );

        Ok(DenyResponse {
            conversation_deleted: outcome.conversation_deleted,
        })
    }

    /// The caller's conversations, most recently active first
    #[instrument(skip(self, actor), fields(user_id = %actor.id))]
    pub async fn inbox(
        &self,
        actor: &AuthenticatedActor,
    ) -> ServiceResult<ApiResponse<Vec<InboxEntryResponse>>> {
        let entries = self
            .ctx
            .conversation_repo()
            .inbox(actor.id, self.ctx.messaging().inbox_limit)
            .await?;

        Ok(ApiResponse::new(
            entries
                .into_iter()
                .map(|entry| InboxEntryResponse::for_owner(entry, actor.id))
                .collect(),
        ))
    }

    /// Thread view: the other participant and the latest messages, oldest
    /// first. Open to pending participants so they can read the request
    /// before deciding. Marks the thread read.
    #[instrument(skip(self, actor), fields(user_id = %actor.id))]
    pub async fn thread(
        &self,
        actor: &AuthenticatedActor,
        conversation_id: ConversationId,
    ) -> ServiceResult<ThreadResponse> {
        let participant = load_participant(self.ctx, conversation_id, actor.id).await?;
        let repo = self.ctx.conversation_repo();

        let other_id = repo
            .participants(conversation_id)
            .await?
            .into_iter()
            .map(|p| p.user_id)
            .find(|id| *id != actor.id);

        let other = match other_id {
            Some(id) => self
                .ctx
                .user_repo()
                .find_by_id(id)
                .await?
                .map(|user| MessageAuthor::new(user.id, user.name)),
            None => None,
        };

        let mut messages = self
            .ctx
            .direct_message_repo()
            .find_by_conversation(
                conversation_id,
                MessageQuery::<DirectMessageId>::latest(THREAD_MESSAGE_LIMIT),
            )
            .await?;
        messages.reverse();

        repo.mark_read(conversation_id, actor.id).await?;

        Ok(ThreadResponse {
            conversation_id,
            other,
            pending: !participant.is_approved(),
            messages: messages.into_iter().map(DirectMessageResponse::from).collect(),
        })
    }
}
