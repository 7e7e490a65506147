//! User model -> entity mapper

use bookclub_core::entities::User;
use bookclub_core::value_objects::UserId;

use crate::models::UserModel;

impl From<UserModel> for User {
    fn from(model: UserModel) -> Self {
        User {
            id: UserId::new(model.id),
            name: model.name,
            is_banned: model.is_banned,
            muted_until: model.muted_until,
        }
    }
}
