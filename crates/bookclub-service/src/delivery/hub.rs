//! Topic hub
//!
//! Uses `DashMap` for concurrent access to the per-topic broadcast senders.
//! A topic exists while it has subscribers; publishing to a topic nobody
//! listens on is a no-op.

use std::fmt;
use std::sync::Arc;

use bookclub_core::{ClubId, ConversationId, DomainEvent};
use dashmap::DashMap;
use tokio::sync::broadcast;

/// Default number of events buffered per topic
pub const DEFAULT_TOPIC_CAPACITY: usize = 256;

/// A live delivery topic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    Club(ClubId),
    Conversation(ConversationId),
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Club(id) => write!(f, "club:{id}"),
            Self::Conversation(id) => write!(f, "conversation:{id}"),
        }
    }
}

/// Receiving half handed to a live connection
pub type Subscription = broadcast::Receiver<Arc<DomainEvent>>;

/// Fan-out of stored messages to live subscribers
#[derive(Clone)]
pub struct DeliveryHub {
    topics: Arc<DashMap<Topic, broadcast::Sender<Arc<DomainEvent>>>>,
    capacity: usize,
}

impl DeliveryHub {
    /// Create a hub buffering `capacity` events per topic
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            topics: Arc::new(DashMap::new()),
            capacity: capacity.max(1),
        }
    }

    /// Subscribe to a topic, creating it on first use
    pub fn subscribe(&self, topic: Topic) -> Subscription {
        let receiver = self
            .topics
            .entry(topic)
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .subscribe();

        tracing::debug!(topic = %topic, "Live subscriber added");

        receiver
    }

    /// Publish an event; returns the number of subscribers reached
    pub fn publish(&self, topic: Topic, event: DomainEvent) -> usize {
        let event = Arc::new(event);

        let delivered = match self.topics.get(&topic) {
            Some(sender) => sender.send(event).unwrap_or(0),
            None => return 0,
        };

        if delivered == 0 {
            self.prune(topic);
        }

        tracing::trace!(topic = %topic, delivered, "Event published");

        delivered
    }

    /// Drop the topic if its last subscriber has gone
    pub fn prune(&self, topic: Topic) {
        self.topics
            .remove_if(&topic, |_, sender| sender.receiver_count() == 0);
    }

    /// Number of live subscribers on a topic
    pub fn subscriber_count(&self, topic: Topic) -> usize {
        self.topics
            .get(&topic)
            .map_or(0, |sender| sender.receiver_count())
    }

    /// Number of topics with a sender
    pub fn topic_count(&self) -> usize {
        self.topics.len()
    }
}

impl Default for DeliveryHub {
    fn default() -> Self {
        Self::new(DEFAULT_TOPIC_CAPACITY)
    }
}

impl fmt::Debug for DeliveryHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeliveryHub")
            .field("topics", &self.topics.len())
            .field("capacity", &self.capacity)
            .finish()
    }
}
