//! In-process application harness
//!
//! Runs the full router, middleware included, over in-memory stores. Requests
//! go through `tower::ServiceExt::oneshot`; no socket or database is needed.

use std::sync::Arc;

use anyhow::Result;
use axum::body::{to_bytes, Body};
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE, COOKIE, SET_COOKIE};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tokengate_api::{create_app, AppState};
use tokengate_common::{AppConfig, Argon2Hasher, TokenCodec};
use tokengate_service::memory::{MemorySessionStore, MemoryUserRepository};
use tokengate_service::ServiceContext;
use tower::ServiceExt;

use crate::cookies::TestCookies;

/// Application under test plus a client-side cookie jar
pub struct TestApp {
    router: Router,
    pub state: AppState,
    pub users: Arc<MemoryUserRepository>,
    pub sessions: Arc<MemorySessionStore>,
    pub cookies: TestCookies,
}

/// Buffered response
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub set_cookies: Vec<String>,
    pub body: Value,
}

impl TestResponse {
    /// Assert the status and parse the body
    pub fn json<T: DeserializeOwned>(&self, expected_status: StatusCode) -> Result<T> {
        self.expect(expected_status)?;
        Ok(serde_json::from_value(self.body.clone())?)
    }

    /// Assert the status only
    pub fn expect(&self, expected_status: StatusCode) -> Result<()> {
        if self.status != expected_status {
            anyhow::bail!(
                "Expected status {}, got {}. Body: {}",
                expected_status,
                self.status,
                self.body
            );
        }
        Ok(())
    }

    /// `error.code` of an error body
    pub fn error_code(&self) -> Option<&str> {
        self.body["error"]["code"].as_str()
    }
}

impl TestApp {
    pub fn new() -> Result<Self> {
        Self::with_config(AppConfig::for_tests())
    }

    pub fn with_config(config: AppConfig) -> Result<Self> {
        let users = Arc::new(MemoryUserRepository::new());
        let sessions = Arc::new(MemorySessionStore::new());
        let ctx = ServiceContext::new(
            users.clone(),
            sessions.clone(),
            Arc::new(Argon2Hasher::low_cost()?),
            Arc::new(TokenCodec::new(&config.jwt)),
        );
        let state = AppState::new(ctx, config);

        Ok(Self {
            router: create_app(state.clone()),
            state,
            users,
            sessions,
            cookies: TestCookies::new(),
        })
    }

    pub async fn get(&mut self, path: &str) -> Result<TestResponse> {
        self.send(Method::GET, path, None::<&()>, None).await
    }

    /// GET with an `Authorization: Bearer` header
    pub async fn get_bearer(&mut self, path: &str, token: &str) -> Result<TestResponse> {
        self.send(Method::GET, path, None::<&()>, Some(token)).await
    }

    pub async fn post<T: Serialize>(&mut self, path: &str, body: &T) -> Result<TestResponse> {
        self.send(Method::POST, path, Some(body), None).await
    }

    pub async fn post_empty(&mut self, path: &str) -> Result<TestResponse> {
        self.send(Method::POST, path, None::<&()>, None).await
    }

    async fn send<T: Serialize>(
        &mut self,
        method: Method,
        path: &str,
        body: Option<&T>,
        bearer: Option<&str>,
    ) -> Result<TestResponse> {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(cookie) = self.cookies.header() {
            builder = builder.header(COOKIE, cookie);
        }
        if let Some(token) = bearer {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(body)?))?,
            None => builder.body(Body::empty())?,
        };

        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let set_cookies: Vec<String> = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok().map(str::to_string))
            .collect();
        self.cookies.absorb(set_cookies.iter().map(String::as_str));

        let bytes = to_bytes(response.into_body(), usize::MAX).await?;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)?
        };

        Ok(TestResponse {
            status,
            set_cookies,
            body,
        })
    }
}
