//! Model to entity mappers
//!
//! This module provides conversions between database models and domain entities (bookclub-core).
//! - `From<Model> for Entity`: Convert database rows to domain objects
//! - `*Insert` structs: Prepare draft data for database writes

mod club;
mod conversation;
mod invitation;
mod message;
mod notification;
mod user;

pub use notification::NotificationInsert;
