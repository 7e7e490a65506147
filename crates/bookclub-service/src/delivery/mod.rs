//! In-process live delivery
//!
//! Stored messages are published to a topic per club or conversation;
//! live connections subscribe to the topic they were authorized for.

mod hub;

use bookclub_core::DomainEvent;

pub use hub::{DeliveryHub, Subscription, Topic, DEFAULT_TOPIC_CAPACITY};

/// Most stored messages replayed to a new live connection
pub const REPLAY_LIMIT: usize = 100;

/// Stored events a live connection missed, oldest first
#[derive(Debug, Clone, Default)]
pub struct Replay {
    pub events: Vec<DomainEvent>,
    /// More messages were missed than fit in one replay; the client has
    /// to re-fetch with its cursor
    pub truncated: bool,
}
