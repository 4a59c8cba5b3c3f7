//! OpenAPI document and Swagger UI mount points

use tokengate_service::dto::{
    HealthResponse, LoginRequest, LogoutRequest, MessageResponse, RefreshTokenRequest,
    SignupRequest, TokenResponse, UserResponse,
};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::cookies::ACCESS_TOKEN_COOKIE;
use crate::handlers::{auth, health, users};

/// Swagger UI location
pub const DOCS_PATH: &str = "/api/docs";
/// Generated OpenAPI document location
pub const OPENAPI_PATH: &str = "/api/openapi.json";

#[derive(OpenApi)]
#[openapi(
    info(title = "tokengate", description = "Username/password authentication with JWT sessions"),
    paths(
        health::root,
        health::health_check,
        auth::signup,
        auth::signin,
        auth::refresh,
        auth::logout,
        users::me,
    ),
    components(schemas(
        SignupRequest,
        LoginRequest,
        RefreshTokenRequest,
        LogoutRequest,
        MessageResponse,
        HealthResponse,
        TokenResponse,
        UserResponse,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Liveness"),
        (name = "auth", description = "Signup, signin, refresh and logout"),
        (name = "users", description = "Authenticated user profile"),
    )
)]
pub struct ApiDoc;

/// Registers the two ways a caller can present an access token
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
        components.add_security_scheme(
            "access_cookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(ACCESS_TOKEN_COOKIE))),
        );
    }
}
