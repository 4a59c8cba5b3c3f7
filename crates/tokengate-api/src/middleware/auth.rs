//! Caller resolution for protected routes
//!
//! Runs the credential pipeline before the handler. When the pipeline had to
//! rotate the session, the new pair is written back as cookies on the
//! handler's response.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use tokengate_service::{CredentialPipeline, ResolvedCaller};
use tracing::debug;

use crate::cookies::{presented_credentials, with_tokens};
use crate::extractors::CurrentUser;
use crate::response::ApiError;
use crate::state::AppState;

/// Resolve the caller or reject with 401
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let credentials = presented_credentials(request.headers());
    let ResolvedCaller { user, rotated } = CredentialPipeline::new(state.service_context())
        .resolve(&credentials)
        .await?;

    let jar = rotated.map(|pair| {
        debug!(user_id = %user.id, "Session rotated during request");
        with_tokens(CookieJar::new(), &pair, state.secure_cookies())
    });

    request.extensions_mut().insert(CurrentUser(user));
    let response = next.run(request).await;

    Ok((jar, response).into_response())
}
