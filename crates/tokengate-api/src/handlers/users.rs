//! User handlers

use axum::Json;
use tokengate_service::dto::UserResponse;

use crate::extractors::CurrentUser;

/// Get current user
///
/// GET /users/me
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    tag = "users",
    security(("bearer" = []), ("access_cookie" = [])),
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Missing, invalid or expired credentials"),
    )
)]
pub async fn me(CurrentUser(user): CurrentUser) -> Json<UserResponse> {
    Json(UserResponse::from(user))
}
