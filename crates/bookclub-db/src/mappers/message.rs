//! Club and direct message model -> entity mappers

use bookclub_core::entities::{ClubMessage, DirectMessage, MessageAuthor, MessageType};
use bookclub_core::value_objects::{ClubId, ConversationId, DirectMessageId, MessageId, UserId};

use crate::models::{ClubMessageModel, DirectMessageModel};

/// Convert ClubMessageModel to ClubMessage entity
impl From<ClubMessageModel> for ClubMessage {
    fn from(model: ClubMessageModel) -> Self {
        let author = match (model.user_id, model.user_name) {
            (Some(id), Some(name)) => Some(MessageAuthor::new(UserId::new(id), name)),
            _ => None,
        };
        ClubMessage {
            id: MessageId::new(model.id),
            club_id: ClubId::new(model.club_id),
            author,
            kind: MessageType::parse(&model.kind).unwrap_or(MessageType::Text),
            body: model.body,
            created_at: model.created_at,
        }
    }
}

/// Convert DirectMessageModel to DirectMessage entity
impl From<DirectMessageModel> for DirectMessage {
    fn from(model: DirectMessageModel) -> Self {
        DirectMessage {
            id: DirectMessageId::new(model.id),
            conversation_id: ConversationId::new(model.conversation_id),
            sender: MessageAuthor::new(UserId::new(model.user_id), model.user_name),
            body: model.body,
            created_at: model.created_at,
        }
    }
}
