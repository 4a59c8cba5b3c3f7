//! Authenticated caller extractor
//!
//! Reads the user resolved by [`crate::middleware::require_auth`] from the
//! request extensions.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use tokengate_common::AppError;
use tokengate_core::User;

use crate::response::ApiError;

/// The user behind the current request
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Missing only when a route forgot the auth layer
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or(ApiError::App(AppError::Unauthenticated))
    }
}
