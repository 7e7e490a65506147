//! Axum extractors for request handling
//!
//! Custom extractors for authentication, validation, ids, and feed cursors.

mod auth;
mod feed;
mod path;
mod validated;

pub use auth::{CurrentUser, MaybeUser};
pub use feed::{FeedParams, FeedQuery};
pub use path::IdPath;
pub use validated::{JsonBody, OptionalJson, ValidatedJson};
