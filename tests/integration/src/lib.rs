//! Integration test utilities for the book club messaging server
//!
//! Boots the real application against PostgreSQL and drives it over HTTP
//! and WebSocket.

pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
