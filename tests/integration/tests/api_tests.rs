//! API Integration Tests
//!
//! Drive the complete router in-process over in-memory stores.
//!
//! Run with: cargo test -p integration-tests --test api_tests

use axum::http::StatusCode;
use chrono::Duration;
use integration_tests::{fixtures::*, TestApp};
use serde_json::json;
use tokengate_api::cookies::{ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE};
use tokengate_common::TokenType;
use tokengate_core::traits::{SessionStore, UserRepository};
use tokengate_core::UserId;

const SIGNUP: &str = "/api/v1/auth/signup";
const SIGNIN: &str = "/api/v1/auth/signin";
const REFRESH: &str = "/api/v1/auth/refresh";
const LOGOUT: &str = "/api/v1/auth/logout";
const ME: &str = "/api/v1/users/me";

async fn signed_in(app: &mut TestApp, signup: &SignupRequest) -> (UserResponse, TokenResponse) {
    let user: UserResponse = app
        .post(SIGNUP, signup)
        .await
        .unwrap()
        .json(StatusCode::OK)
        .unwrap();
    let tokens: TokenResponse = app
        .post(SIGNIN, &SigninRequest::from_signup(signup))
        .await
        .unwrap()
        .json(StatusCode::OK)
        .unwrap();
    (user, tokens)
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_root_and_health() {
    let mut app = TestApp::new().unwrap();

    let response = app.get("/").await.unwrap();
    response.expect(StatusCode::OK).unwrap();
    assert_eq!(response.body["message"], "Hello World");

    let response = app.get("/health").await.unwrap();
    response.expect(StatusCode::OK).unwrap();
    assert_eq!(response.body["status"], "healthy");
}

// ============================================================================
// Full session lifecycle
// ============================================================================

#[tokio::test]
async fn test_session_lifecycle() {
    let mut app = TestApp::new().unwrap();
    let signup = SignupRequest::admin();

    // Signup never echoes the password or its hash
    let response = app.post(SIGNUP, &signup).await.unwrap();
    let user: UserResponse = response.json(StatusCode::OK).unwrap();
    assert_eq!(user.username, "admin");
    assert_eq!(user.email, "admin@mail.com");
    assert_eq!(user.role, "user");
    assert!(response.body.get("password").is_none());
    assert!(response.body.get("password_hash").is_none());
    assert!(response.set_cookies.is_empty());

    // Signin sets both cookies and stores one session
    let response = app
        .post(SIGNIN, &SigninRequest::from_signup(&signup))
        .await
        .unwrap();
    let tokens: TokenResponse = response.json(StatusCode::OK).unwrap();
    assert_eq!(tokens.token_type, "Bearer");
    assert_eq!(response.set_cookies.len(), 2);
    assert_eq!(app.cookies.get(ACCESS_TOKEN_COOKIE), Some(tokens.access_token.as_str()));
    assert_eq!(app.cookies.get(REFRESH_TOKEN_COOKIE), Some(tokens.refresh_token.as_str()));
    let user_id = UserId::new(user.id);
    assert_eq!(app.sessions.count_for_user(user_id).await.unwrap(), 1);
    let record = app
        .sessions
        .find_by_token(&tokens.refresh_token)
        .await
        .unwrap()
        .unwrap();

    // Access cookie authenticates
    let me: UserResponse = app.get(ME).await.unwrap().json(StatusCode::OK).unwrap();
    assert_eq!(me.id, user.id);

    // Explicit refresh with only the refresh cookie
    app.cookies.remove(ACCESS_TOKEN_COOKIE);
    let response = app.post_empty(REFRESH).await.unwrap();
    let rotated: TokenResponse = response.json(StatusCode::OK).unwrap();
    assert_ne!(rotated.refresh_token, tokens.refresh_token);
    assert_eq!(app.cookies.get(REFRESH_TOKEN_COOKIE), Some(rotated.refresh_token.as_str()));

    // Same record, new token value
    assert_eq!(app.sessions.count_for_user(user_id).await.unwrap(), 1);
    let after = app
        .sessions
        .find_by_token(&rotated.refresh_token)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(after.id, record.id);
    assert!(app
        .sessions
        .find_by_token(&tokens.refresh_token)
        .await
        .unwrap()
        .is_none());

    app.get(ME).await.unwrap().expect(StatusCode::OK).unwrap();

    // Logout revokes and clears cookies
    let response = app.post_empty(LOGOUT).await.unwrap();
    response.expect(StatusCode::OK).unwrap();
    assert_eq!(response.body["message"], "Logged out successfully");
    assert!(app.cookies.header().is_none());
    let revoked = app
        .sessions
        .find_by_token(&rotated.refresh_token)
        .await
        .unwrap()
        .unwrap();
    assert!(revoked.revoked);

    let response = app.get(ME).await.unwrap();
    response.expect(StatusCode::UNAUTHORIZED).unwrap();
    assert_eq!(response.error_code(), Some("UNAUTHENTICATED"));

    // The revoked refresh token no longer resolves a caller
    app.cookies.set(REFRESH_TOKEN_COOKIE, &rotated.refresh_token);
    let response = app.get(ME).await.unwrap();
    response.expect(StatusCode::UNAUTHORIZED).unwrap();
    assert!(response.set_cookies.is_empty());
}

#[tokio::test]
async fn test_duplicate_email_conflicts() {
    let mut app = TestApp::new().unwrap();
    let first = SignupRequest::admin();
    app.post(SIGNUP, &first)
        .await
        .unwrap()
        .expect(StatusCode::OK)
        .unwrap();

    let again = SignupRequest {
        username: "someone_else".to_string(),
        ..SignupRequest::admin()
    };
    let response = app.post(SIGNUP, &again).await.unwrap();
    response.expect(StatusCode::CONFLICT).unwrap();
    assert_eq!(response.error_code(), Some("EMAIL_ALREADY_REGISTERED"));

    let same_username = SignupRequest {
        email: "other@mail.com".to_string(),
        ..SignupRequest::admin()
    };
    let response = app.post(SIGNUP, &same_username).await.unwrap();
    response.expect(StatusCode::CONFLICT).unwrap();
    assert_eq!(response.error_code(), Some("USERNAME_ALREADY_REGISTERED"));
}

#[tokio::test]
async fn test_garbage_refresh_token_rejected() {
    let mut app = TestApp::new().unwrap();

    let response = app
        .post(REFRESH, &json!({ "refresh_token": "not-a-token" }))
        .await
        .unwrap();
    response.expect(StatusCode::UNAUTHORIZED).unwrap();
    assert_eq!(response.error_code(), Some("INVALID_OR_EXPIRED_TOKEN"));
    assert!(response.set_cookies.is_empty());
    assert!(app.sessions.is_empty());
}

// ============================================================================
// Auth edge cases
// ============================================================================

#[tokio::test]
async fn test_signin_failures_are_uniform() {
    let mut app = TestApp::new().unwrap();
    let signup = SignupRequest::unique();
    app.post(SIGNUP, &signup).await.unwrap();

    let wrong_password = app
        .post(
            SIGNIN,
            &SigninRequest {
                username: signup.email.clone(),
                password: "wrong".to_string(),
            },
        )
        .await
        .unwrap();
    let unknown_email = app
        .post(
            SIGNIN,
            &SigninRequest {
                username: "nobody@mail.com".to_string(),
                password: "wrong".to_string(),
            },
        )
        .await
        .unwrap();

    for response in [wrong_password, unknown_email] {
        response.expect(StatusCode::UNAUTHORIZED).unwrap();
        assert_eq!(response.error_code(), Some("INVALID_CREDENTIALS"));
        assert!(response.set_cookies.is_empty());
    }
    assert!(app.sessions.is_empty());
}

#[tokio::test]
async fn test_bearer_header_authenticates() {
    let mut app = TestApp::new().unwrap();
    let (user, tokens) = signed_in(&mut app, &SignupRequest::unique()).await;
    app.cookies = Default::default();

    let me: UserResponse = app
        .get_bearer(ME, &tokens.access_token)
        .await
        .unwrap()
        .json(StatusCode::OK)
        .unwrap();
    assert_eq!(me.id, user.id);

    // A refresh token is not accepted as a bearer credential
    app.get_bearer(ME, &tokens.refresh_token)
        .await
        .unwrap()
        .expect(StatusCode::UNAUTHORIZED)
        .unwrap();
}

#[tokio::test]
async fn test_expired_access_rotates_transparently() {
    let mut app = TestApp::new().unwrap();
    let (user, tokens) = signed_in(&mut app, &SignupRequest::unique()).await;

    let expired = app
        .state
        .service_context()
        .token_codec()
        .issue(UserId::new(user.id), Duration::seconds(-30), TokenType::Access)
        .unwrap();
    app.cookies.set(ACCESS_TOKEN_COOKIE, &expired);

    let response = app.get(ME).await.unwrap();
    let me: UserResponse = response.json(StatusCode::OK).unwrap();
    assert_eq!(me.id, user.id);
    assert_eq!(response.set_cookies.len(), 2);

    let new_refresh = app.cookies.get(REFRESH_TOKEN_COOKIE).unwrap().to_string();
    assert_ne!(new_refresh, tokens.refresh_token);
    assert_ne!(app.cookies.get(ACCESS_TOKEN_COOKIE), Some(expired.as_str()));
    assert_eq!(app.sessions.len(), 1);

    // The superseded refresh token is dead; the cookie would win over the body
    app.cookies = Default::default();
    let response = app
        .post(REFRESH, &json!({ "refresh_token": tokens.refresh_token }))
        .await
        .unwrap();
    response.expect(StatusCode::UNAUTHORIZED).unwrap();
    assert_eq!(response.error_code(), Some("INVALID_OR_EXPIRED_TOKEN"));
}

#[tokio::test]
async fn test_refresh_and_logout_require_a_token() {
    let mut app = TestApp::new().unwrap();

    for path in [REFRESH, LOGOUT] {
        let response = app.post_empty(path).await.unwrap();
        response.expect(StatusCode::UNAUTHORIZED).unwrap();
        assert_eq!(response.error_code(), Some("MISSING_TOKEN"));
    }
}

#[tokio::test]
async fn test_logout_is_idempotent() {
    let mut app = TestApp::new().unwrap();
    let (_, tokens) = signed_in(&mut app, &SignupRequest::unique()).await;
    app.cookies = Default::default();

    for _ in 0..2 {
        app.post(LOGOUT, &json!({ "refresh_token": tokens.refresh_token }))
            .await
            .unwrap()
            .expect(StatusCode::OK)
            .unwrap();
    }
}

#[tokio::test]
async fn test_invalid_signup_bodies() {
    let mut app = TestApp::new().unwrap();

    let bad_email = SignupRequest {
        email: "not-an-email".to_string(),
        ..SignupRequest::unique()
    };
    app.post(SIGNUP, &bad_email)
        .await
        .unwrap()
        .expect(StatusCode::BAD_REQUEST)
        .unwrap();

    let missing_fields = json!({ "username": "only_a_name" });
    let response = app.post(SIGNUP, &missing_fields).await.unwrap();
    response.expect(StatusCode::BAD_REQUEST).unwrap();
    assert_eq!(response.error_code(), Some("INVALID_BODY"));
    assert!(app
        .users
        .find_by_username("only_a_name")
        .await
        .unwrap()
        .is_none());
}
