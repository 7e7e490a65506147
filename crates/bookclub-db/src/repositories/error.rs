//! Error handling utilities for repositories

use bookclub_core::error::DomainError;
use bookclub_core::value_objects::{ClubId, ConversationId};
use sqlx::Error as SqlxError;

/// Convert SQLx error to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    DomainError::DatabaseError(e.to_string())
}

/// Check for unique violation and return appropriate error or fallback
pub fn map_unique_violation<F>(e: SqlxError, on_unique: F) -> DomainError
where
    F: FnOnce() -> DomainError,
{
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return on_unique();
        }
    }
    DomainError::DatabaseError(e.to_string())
}

/// Check for a foreign key violation, which means a referenced row was
/// deleted after it was checked
pub fn map_foreign_key_violation<F>(e: SqlxError, on_missing: F) -> DomainError
where
    F: FnOnce() -> DomainError,
{
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_foreign_key_violation() {
            return on_missing();
        }
    }
    DomainError::DatabaseError(e.to_string())
}

/// Create a "club not found" error
pub fn club_not_found(id: ClubId) -> DomainError {
    DomainError::ClubNotFound(id)
}

/// Create a "conversation not found" error
pub fn conversation_not_found(id: ConversationId) -> DomainError {
    DomainError::ConversationNotFound(id)
}
