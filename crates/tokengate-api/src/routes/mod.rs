//! Route definitions
//!
//! Public routes at the root, the API mounted under /api/v1, and the
//! Swagger UI at /api/docs.

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::docs::{ApiDoc, DOCS_PATH, OPENAPI_PATH};
use crate::handlers::{auth, health, users};
use crate::middleware::require_auth;
use crate::state::AppState;

/// Create the main router with all routes
pub fn create_router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health_check))
        .nest("/api/v1", api_v1_routes(state))
        .merge(SwaggerUi::new(DOCS_PATH).url(OPENAPI_PATH, ApiDoc::openapi()))
}

/// API v1 routes
fn api_v1_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .merge(auth_routes())
        .merge(user_routes(state))
}

/// Authentication routes
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(auth::signup))
        .route("/auth/signin", post(auth::signin))
        .route("/auth/refresh", post(auth::refresh))
        .route("/auth/logout", post(auth::logout))
}

/// User routes; every one requires a resolved caller
fn user_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/users/me", get(users::me))
        .route_layer(from_fn_with_state(state.clone(), require_auth))
}
