//! Invitation model -> entity mapper

use bookclub_core::entities::Invitation;
use bookclub_core::value_objects::{ClubId, InvitationId, UserId};

use crate::models::InvitationModel;

impl From<InvitationModel> for Invitation {
    fn from(model: InvitationModel) -> Self {
        Invitation {
            id: InvitationId::new(model.id),
            club_id: ClubId::new(model.club_id),
            inviter_id: UserId::new(model.inviter_id),
            invitee_id: model.invitee_id.map(UserId::new),
            email: model.email,
            token: model.token,
            expires_at: model.expires_at,
            accepted_at: model.accepted_at,
            created_at: model.created_at,
        }
    }
}
