//! Access policy - who may see, post in, and manage a club

mod club_policy;

pub use club_policy::{
    authorize_manage, authorize_post, authorize_view, can_post, can_view, ManageAction,
};
