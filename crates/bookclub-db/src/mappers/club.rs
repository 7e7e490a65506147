//! Club and membership model -> entity mappers

use bookclub_core::entities::{Club, ClubMember, ClubRole, ClubSummary};
use bookclub_core::value_objects::{BookId, ClubId, UserId};

use crate::models::{ClubMemberModel, ClubModel, ClubSummaryModel};

/// Convert ClubModel to Club entity
impl From<ClubModel> for Club {
    fn from(model: ClubModel) -> Self {
        Club {
            id: ClubId::new(model.id),
            owner_id: model.owner_id.map(UserId::new),
            book_id: model.book_id.map(BookId::new),
            name: model.name,
            is_public: model.is_public,
            cover_image: model.cover_image,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<ClubSummaryModel> for ClubSummary {
    fn from(model: ClubSummaryModel) -> Self {
        ClubSummary {
            club: model.club.into(),
            member_count: model.member_count,
        }
    }
}

/// Convert ClubMemberModel to ClubMember entity.
/// Unknown role strings degrade to a plain member.
impl From<ClubMemberModel> for ClubMember {
    fn from(model: ClubMemberModel) -> Self {
        ClubMember {
            club_id: ClubId::new(model.club_id),
            user_id: UserId::new(model.user_id),
            role: model.role.parse().unwrap_or(ClubRole::Member),
            joined_at: model.joined_at,
        }
    }
}
