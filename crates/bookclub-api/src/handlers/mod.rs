//! HTTP request handlers
//!
//! Handlers extract the caller and inputs, delegate to a service, and map
//! the result to a response.

pub mod clubs;
pub mod conversations;
pub mod health;
pub mod invitations;
pub mod live;
pub mod messages;
pub mod notifications;
