//! Application error types
//!
//! Unified error handling for the entire application.

use serde::Serialize;
use std::fmt;
use tokengate_core::DomainError;
use tracing::error;

use crate::auth::TokenError;

/// Which unique user field collided on signup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateField {
    Email,
    Username,
}

impl fmt::Display for DuplicateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Email => f.write_str("Email"),
            Self::Username => f.write_str("Username"),
        }
    }
}

/// Application-wide error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Authentication errors
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid or expired token")]
    InvalidOrExpiredToken,

    #[error("Not authenticated")]
    Unauthenticated,

    #[error("Missing refresh token")]
    MissingToken,

    // Resource errors
    #[error("User not found")]
    UserNotFound,

    #[error("{field} already registered")]
    DuplicateUser { field: DuplicateField },

    // Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    // Storage errors; the detail is for logs, never for clients
    #[error("Persistence error")]
    Persistence(String),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Internal errors
    #[error("Internal server error")]
    Internal(#[source] anyhow::Error),
}

impl AppError {
    /// Get HTTP status code for this error
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            // 400 Bad Request
            Self::Validation(_) => 400,

            // 401 Unauthorized
            Self::InvalidCredentials
            | Self::InvalidOrExpiredToken
            | Self::Unauthenticated
            | Self::MissingToken => 401,

            // 404 Not Found
            Self::UserNotFound => 404,

            // 409 Conflict
            Self::DuplicateUser { .. } => 409,

            // 500 Internal Server Error
            Self::Persistence(_) | Self::Config(_) | Self::Internal(_) => 500,
        }
    }

    /// Get error code for API responses
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::InvalidOrExpiredToken => "INVALID_OR_EXPIRED_TOKEN",
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::MissingToken => "MISSING_TOKEN",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::DuplicateUser {
                field: DuplicateField::Email,
            } => "EMAIL_ALREADY_REGISTERED",
            Self::DuplicateUser {
                field: DuplicateField::Username,
            } => "USERNAME_ALREADY_REGISTERED",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Persistence(_) => "PERSISTENCE_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a client error (4xx)
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        let status = self.status_code();
        (400..500).contains(&status)
    }

    /// Check if this is a server error (5xx)
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        let status = self.status_code();
        (500..600).contains(&status)
    }

    /// Check if this came from the storage layer
    #[must_use]
    pub fn is_persistence(&self) -> bool {
        matches!(self, Self::Persistence(_))
    }

    /// Create a validation error
    #[must_use]
    pub fn validation(msg: impl fmt::Display) -> Self {
        Self::Validation(msg.to_string())
    }

    /// Create an internal error from any error
    pub fn internal(err: impl Into<anyhow::Error>) -> Self {
        Self::Internal(err.into())
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::UserNotFound(_) => Self::UserNotFound,
            DomainError::EmailAlreadyExists => Self::DuplicateUser {
                field: DuplicateField::Email,
            },
            DomainError::UsernameAlreadyExists => Self::DuplicateUser {
                field: DuplicateField::Username,
            },
            DomainError::ValidationError(msg) => Self::Validation(msg),
            DomainError::DuplicateRefreshToken => {
                error!("Refresh token collided with an existing record");
                Self::Persistence("duplicate refresh token".to_string())
            }
            DomainError::DatabaseError(detail) => {
                error!(error = %detail, "Storage operation failed");
                Self::Persistence(detail)
            }
            DomainError::InternalError(msg) => Self::Internal(anyhow::anyhow!(msg)),
        }
    }
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Encoding(msg) => {
                Self::Internal(anyhow::anyhow!("Failed to encode JWT: {msg}"))
            }
            TokenError::Expired
            | TokenError::InvalidSignature
            | TokenError::Malformed
            | TokenError::WrongKind => Self::InvalidOrExpiredToken,
        }
    }
}

/// Error response structure for API responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<&AppError> for ErrorResponse {
    fn from(err: &AppError) -> Self {
        Self {
            code: err.error_code().to_string(),
            message: err.to_string(),
            details: None,
        }
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
