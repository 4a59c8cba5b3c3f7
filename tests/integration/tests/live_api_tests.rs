//! Live API Integration Tests
//!
//! These tests require:
//! - Running PostgreSQL instance
//! - Environment variable: DATABASE_URL
//!
//! Run with: cargo test -p integration-tests --test live_api_tests

use integration_tests::{
    assert_json, assert_status, check_test_env, fixtures::*, TestServer,
};
use reqwest::StatusCode;
use serde_json::json;
use tokengate_api::cookies::{ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE};

#[tokio::test]
async fn test_health_check() {
    if !check_test_env() {
        return;
    }

    let mut server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_session_lifecycle() {
    if !check_test_env() {
        return;
    }

    let mut server = TestServer::start().await.expect("Failed to start server");
    let signup = SignupRequest::unique();

    let response = server.post("/api/v1/auth/signup", &signup).await.unwrap();
    let user: UserResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(user.email, signup.email);

    let response = server
        .post("/api/v1/auth/signin", &SigninRequest::from_signup(&signup))
        .await
        .unwrap();
    let tokens: TokenResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(server.cookies.get(ACCESS_TOKEN_COOKIE).is_some());

    let response = server.get("/api/v1/users/me").await.unwrap();
    let me: UserResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(me.id, user.id);

    server.cookies.remove(ACCESS_TOKEN_COOKIE);
    let response = server.post_empty("/api/v1/auth/refresh").await.unwrap();
    let rotated: TokenResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_ne!(rotated.refresh_token, tokens.refresh_token);

    let response = server.post_empty("/api/v1/auth/logout").await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();
    assert!(server.cookies.header().is_none());

    let response = server.get("/api/v1/users/me").await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();

    server.cookies.set(REFRESH_TOKEN_COOKIE, &rotated.refresh_token);
    let response = server.get("/api/v1/users/me").await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_duplicate_email_conflicts() {
    if !check_test_env() {
        return;
    }

    let mut server = TestServer::start().await.expect("Failed to start server");
    let request = SignupRequest::unique();
    server.post("/api/v1/auth/signup", &request).await.unwrap();

    let again = SignupRequest {
        username: format!("other_{}", unique_suffix()),
        ..request
    };
    let response = server.post("/api/v1/auth/signup", &again).await.unwrap();
    let body: ErrorBody = assert_json(response, StatusCode::CONFLICT).await.unwrap();
    assert_eq!(body.error.code, "EMAIL_ALREADY_REGISTERED");
}

#[tokio::test]
async fn test_garbage_refresh_token_rejected() {
    if !check_test_env() {
        return;
    }

    let mut server = TestServer::start().await.expect("Failed to start server");
    let response = server
        .post("/api/v1/auth/refresh", &json!({ "refresh_token": "garbage" }))
        .await
        .unwrap();
    let body: ErrorBody = assert_json(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(body.error.code, "INVALID_OR_EXPIRED_TOKEN");
}
