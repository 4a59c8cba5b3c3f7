//! Request DTOs for API endpoints
//!
//! Bodies that carry user input implement `Validate`.

use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

// ============================================================================
// Auth Requests
// ============================================================================

/// User registration request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SignupRequest {
    #[schema(example = "admin", min_length = 3, max_length = 32)]
    #[validate(length(min = 3, max = 32, message = "Username must be 3-32 characters"))]
    pub username: String,

    #[schema(example = "admin@mail.com")]
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[schema(min_length = 1)]
    #[validate(length(min = 1, message = "Password must not be empty"))]
    pub password: String,

    #[validate(length(max = 100, message = "First name must be at most 100 characters"))]
    pub first_name: Option<String>,

    #[validate(length(max = 100, message = "Last name must be at most 100 characters"))]
    pub last_name: Option<String>,
}

/// User login request
///
/// Accepts the email under either `email` or `username`.
#[derive(Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[serde(alias = "username")]
    #[schema(example = "admin@mail.com")]
    #[validate(length(min = 1, message = "Email must not be empty"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password must not be empty"))]
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Token refresh request; the cookie takes precedence when both are sent
#[derive(Debug, Clone, Deserialize, Default, ToSchema)]
pub struct RefreshTokenRequest {
    pub refresh_token: Option<String>,
}

/// Logout request (optional refresh token to revoke)
#[derive(Debug, Clone, Deserialize, Default, ToSchema)]
pub struct LogoutRequest {
    pub refresh_token: Option<String>,
}
