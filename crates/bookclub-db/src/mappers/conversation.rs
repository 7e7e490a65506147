//! Conversation model -> entity mappers

use bookclub_core::entities::{
    Conversation, InboxEntry, InboxPreview, MessageAuthor, Participant, ParticipantState,
};
use bookclub_core::value_objects::{ConversationId, DirectMessageId, UserId};

use crate::models::{ConversationModel, InboxRowModel, ParticipantModel};

impl From<ConversationModel> for Conversation {
    fn from(model: ConversationModel) -> Self {
        Conversation {
            id: ConversationId::new(model.id),
            is_group: model.is_group,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<ParticipantModel> for Participant {
    fn from(model: ParticipantModel) -> Self {
        Participant {
            conversation_id: ConversationId::new(model.conversation_id),
            user_id: UserId::new(model.user_id),
            state: ParticipantState::from_approved_at(model.approved_at),
            invited_by: model.invited_by.map(UserId::new),
            last_read_at: model.last_read_at,
        }
    }
}

impl From<InboxRowModel> for InboxEntry {
    fn from(model: InboxRowModel) -> Self {
        let other = match (model.other_id, model.other_name) {
            (Some(id), Some(name)) => Some(MessageAuthor::new(UserId::new(id), name)),
            _ => None,
        };
        let last_message = match (
            model.last_id,
            model.last_sender_id,
            model.last_body,
            model.last_created_at,
        ) {
            (Some(id), Some(sender), Some(body), Some(created_at)) => Some(InboxPreview {
                id: DirectMessageId::new(id),
                sender_id: UserId::new(sender),
                body,
                created_at,
            }),
            _ => None,
        };
        InboxEntry {
            conversation_id: ConversationId::new(model.conversation_id),
            other,
            pending: model.approved_at.is_none(),
            last_message,
            last_read_at: model.last_read_at,
            updated_at: model.updated_at,
        }
    }
}
