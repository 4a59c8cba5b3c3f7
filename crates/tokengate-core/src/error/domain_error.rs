//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::UserId;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("User not found: {0}")]
    UserNotFound(UserId),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Email already registered")]
    EmailAlreadyExists,

    #[error("Username already registered")]
    UsernameAlreadyExists,

    #[error("Refresh token already stored")]
    DuplicateRefreshToken,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::UserNotFound(_) => "USER_NOT_FOUND",
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::EmailAlreadyExists => "EMAIL_ALREADY_REGISTERED",
            Self::UsernameAlreadyExists => "USERNAME_ALREADY_REGISTERED",
            Self::DuplicateRefreshToken => "DUPLICATE_REFRESH_TOKEN",
            Self::DatabaseError(_) => "PERSISTENCE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::UserNotFound(_))
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::ValidationError(_))
    }

    /// Check if this is a uniqueness conflict on a user field
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::EmailAlreadyExists | Self::UsernameAlreadyExists)
    }

    /// Check if this came from the storage layer
    pub fn is_persistence(&self) -> bool {
        matches!(self, Self::DatabaseError(_) | Self::DuplicateRefreshToken)
    }
}
