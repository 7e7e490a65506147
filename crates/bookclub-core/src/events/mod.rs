//! Domain events published to live subscribers

mod domain_event;

pub use domain_event::{DirectMessageCreatedEvent, DomainEvent, MessageCreatedEvent};
