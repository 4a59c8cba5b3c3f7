//! Live server helpers
//!
//! Spawns the real application on an ephemeral port against PostgreSQL and
//! drives it with `reqwest`, carrying cookies between calls.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Result;
use reqwest::header::{COOKIE, SET_COOKIE};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tokengate_api::{create_app, create_app_state};
use tokengate_common::AppConfig;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::cookies::TestCookies;

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    pub cookies: TestCookies,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a new test server
    pub async fn start() -> Result<Self> {
        Self::start_with_config(test_config()?).await
    }

    /// Start a test server with custom config
    pub async fn start_with_config(config: AppConfig) -> Result<Self> {
        let state = create_app_state(config).await?;
        let app = create_app(state);

        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            addr,
            client,
            cookies: TestCookies::new(),
            _handle: handle,
        })
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Make a GET request
    pub async fn get(&mut self, path: &str) -> Result<Response> {
        let request = self.client.get(format!("{}{}", self.base_url(), path));
        self.send(request).await
    }

    /// Make a POST request with JSON body
    pub async fn post<T: Serialize>(&mut self, path: &str, body: &T) -> Result<Response> {
        let request = self
            .client
            .post(format!("{}{}", self.base_url(), path))
            .json(body);
        self.send(request).await
    }

    /// Make a POST request without a body
    pub async fn post_empty(&mut self, path: &str) -> Result<Response> {
        let request = self.client.post(format!("{}{}", self.base_url(), path));
        self.send(request).await
    }

    async fn send(&mut self, mut request: RequestBuilder) -> Result<Response> {
        if let Some(cookie) = self.cookies.header() {
            request = request.header(COOKIE, cookie);
        }
        let response = request.send().await?;
        self.cookies.absorb(
            response
                .headers()
                .get_all(SET_COOKIE)
                .iter()
                .filter_map(|v| v.to_str().ok()),
        );
        Ok(response)
    }
}

/// Test configuration pointing at `DATABASE_URL`
pub fn test_config() -> Result<AppConfig> {
    dotenvy::dotenv().ok();

    let mut config = AppConfig::for_tests();
    config.database.url = std::env::var("DATABASE_URL")?;
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Config error: {}", e))?;
    Ok(config)
}

/// Helper to check if test environment is available
pub fn check_test_env() -> bool {
    dotenvy::dotenv().ok();
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("Skipping test: DATABASE_URL not set");
        return false;
    }
    true
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(
    response: Response,
    expected_status: StatusCode,
) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!(
            "Expected status {}, got {}. Body: {}",
            expected_status,
            status,
            body
        );
    }
    Ok(response.json().await?)
}

/// Assert response status without parsing body
pub async fn assert_status(response: Response, expected_status: StatusCode) -> Result<()> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!(
            "Expected status {}, got {}. Body: {}",
            expected_status,
            status,
            body
        );
    }
    Ok(())
}
