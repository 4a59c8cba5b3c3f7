//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

// ============================================================================
// Common Response Types
// ============================================================================

/// Plain `{"message": ...}` body
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Liveness response
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    #[schema(value_type = String, example = "healthy")]
    pub status: &'static str,
    #[schema(value_type = String)]
    pub version: &'static str,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy",
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

// ============================================================================
// Auth Responses
// ============================================================================

/// Token pair as returned to clients
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Access token lifetime in seconds
    #[schema(example = 900)]
    pub expires_in: i64,
    /// Refresh token lifetime in seconds
    #[schema(example = 604_800)]
    pub refresh_expires_in: i64,
}

// ============================================================================
// User Responses
// ============================================================================

/// User profile; never carries the password hash
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[schema(example = "user")]
    pub role: String,
    pub created_at: DateTime<Utc>,
}
