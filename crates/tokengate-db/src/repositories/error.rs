//! Error handling utilities for repositories

use sqlx::Error as SqlxError;
use tokengate_core::{DomainError, UserId};

/// Constraint names from the bootstrap schema
pub const USERS_EMAIL_KEY: &str = "users_email_key";
pub const USERS_USERNAME_KEY: &str = "users_username_key";

/// Convert SQLx error to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    DomainError::DatabaseError(e.to_string())
}

/// Check for unique violation and return appropriate error or fallback
///
/// The callback receives the violated constraint name, when the driver reports one.
pub fn map_unique_violation<F>(e: SqlxError, on_unique: F) -> DomainError
where
    F: FnOnce(Option<&str>) -> DomainError,
{
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return on_unique(db_err.constraint());
        }
    }
    DomainError::DatabaseError(e.to_string())
}

/// Which user field a unique violation refers to
pub fn user_conflict(constraint: Option<&str>) -> DomainError {
    match constraint {
        Some(USERS_USERNAME_KEY) => DomainError::UsernameAlreadyExists,
        _ => DomainError::EmailAlreadyExists,
    }
}

/// Create a "user not found" error
pub fn user_not_found(id: UserId) -> DomainError {
    DomainError::UserNotFound(id)
}
