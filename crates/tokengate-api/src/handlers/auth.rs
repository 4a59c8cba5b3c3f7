//! Authentication handlers
//!
//! Endpoints for signup, signin, token refresh, and logout. Refresh and
//! logout read the refresh token from its cookie, falling back to the body.

use axum::{extract::State, Json};
use axum_extra::extract::cookie::CookieJar;
use tokengate_service::dto::{
    LoginRequest, LogoutRequest, MessageResponse, RefreshTokenRequest, SignupRequest,
    TokenResponse, UserResponse,
};
use tokengate_service::AuthService;

use crate::cookies::{refresh_token, with_tokens, without_tokens};
use crate::extractors::ValidatedJson;
use crate::response::ApiResult;
use crate::state::AppState;

type WithCookies<T> = (CookieJar, Json<T>);

/// Register a new user
///
/// POST /auth/signup
#[utoipa::path(
    post,
    path = "/api/v1/auth/signup",
    tag = "auth",
    request_body = SignupRequest,
    responses(
        (status = 200, description = "User created", body = UserResponse),
        (status = 400, description = "Validation failed"),
        (status = 409, description = "Username or email already taken"),
    )
)]
pub async fn signup(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<SignupRequest>,
) -> ApiResult<Json<UserResponse>> {
    let service = AuthService::new(state.service_context());
    let user = service.signup(request).await?;
    Ok(Json(UserResponse::from(user)))
}

/// Sign in with email and password
///
/// POST /auth/signin
#[utoipa::path(
    post,
    path = "/api/v1/auth/signin",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token pair, also set as cookies", body = TokenResponse),
        (status = 401, description = "Invalid credentials"),
    )
)]
pub async fn signin(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<WithCookies<TokenResponse>> {
    let service = AuthService::new(state.service_context());
    let session = service.login(&request.email, &request.password).await?;
    let jar = with_tokens(jar, &session.tokens, state.secure_cookies());
    Ok((jar, Json(TokenResponse::from(session.tokens))))
}

/// Rotate the refresh token and issue a new pair
///
/// POST /auth/refresh
#[utoipa::path(
    post,
    path = "/api/v1/auth/refresh",
    tag = "auth",
    request_body(
        content = RefreshTokenRequest,
        description = "Optional; used when no refresh cookie is sent"
    ),
    responses(
        (status = 200, description = "Rotated token pair", body = TokenResponse),
        (status = 401, description = "Missing, unknown, revoked or expired refresh token"),
    )
)]
pub async fn refresh(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Option<Json<RefreshTokenRequest>>,
) -> ApiResult<WithCookies<TokenResponse>> {
    let presented = refresh_token(&jar).or_else(|| body.and_then(|Json(b)| b.refresh_token));
    let service = AuthService::new(state.service_context());
    let session = service.rotate(presented.as_deref()).await?;
    let jar = with_tokens(jar, &session.tokens, state.secure_cookies());
    Ok((jar, Json(TokenResponse::from(session.tokens))))
}

/// Revoke the current session and clear token cookies
///
/// POST /auth/logout
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    tag = "auth",
    request_body(
        content = LogoutRequest,
        description = "Optional; used when no refresh cookie is sent"
    ),
    responses(
        (status = 200, description = "Session revoked and cookies cleared", body = MessageResponse),
        (status = 401, description = "Missing refresh token"),
    )
)]
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Option<Json<LogoutRequest>>,
) -> ApiResult<WithCookies<MessageResponse>> {
    let presented = refresh_token(&jar).or_else(|| body.and_then(|Json(b)| b.refresh_token));
    let service = AuthService::new(state.service_context());
    service.logout(presented.as_deref()).await?;
    let jar = without_tokens(jar, state.secure_cookies());
    Ok((jar, Json(MessageResponse::new("Logged out successfully"))))
}
