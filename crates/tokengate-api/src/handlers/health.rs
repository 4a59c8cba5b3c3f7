//! Root and health check handlers

use axum::Json;
use tokengate_service::dto::{HealthResponse, MessageResponse};

/// Service greeting
///
/// GET /
#[utoipa::path(
    get,
    path = "/",
    tag = "health",
    responses((status = 200, description = "Greeting", body = MessageResponse))
)]
pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse::new("Hello World"))
}

/// Basic health check (liveness)
///
/// GET /health
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
