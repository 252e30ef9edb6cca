//! REST client for the route API.
//!
//! Endpoints:
//! - `GET {base}/routes` → `[Route]`
//! - `GET {base}/routes/{id}` → `Route`

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

use super::RouteSource;
use crate::telemetry;
use crate::types::Route;
use crate::{NaviguideError, Result};

/// Default base URL of the route API (Android emulator loopback to the host).
pub const DEFAULT_BASE_URL: &str = "http://10.0.2.2:8080/api";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the route REST API.
#[derive(Clone)]
pub struct HttpRouteSource {
    http: Client,
    base_url: String,
}

impl HttpRouteSource {
    /// Client for [`DEFAULT_BASE_URL`] with the default timeout.
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Client for a custom base URL (also used for testing with wiremock).
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Client for a custom base URL and request timeout.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(crate::version::version_string())
            .build()
            .map_err(|e| NaviguideError::Configuration(format!("failed to build HTTP client: {e}")))?;
        let base_url: String = base_url.into();

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL requests are issued against (no trailing slash).
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, operation: &'static str) -> Result<T> {
        let url = format!("{}{path}", self.base_url);
        let result = self.send(&url, path).await;

        let status = if result.is_ok() { "ok" } else { "error" };
        metrics::counter!(telemetry::REMOTE_REQUESTS_TOTAL,
            "operation" => operation,
            "status" => status,
        )
        .increment(1);

        result
    }

    async fn send<T: DeserializeOwned>(&self, url: &str, path: &str) -> Result<T> {
        let response = self.http.get(url).send().await?;
        handle_response_errors(&response, path)?;

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

fn handle_response_errors(response: &Response, path: &str) -> Result<()> {
    let status = response.status();

    if status.is_success() {
        return Ok(());
    }

    match status.as_u16() {
        404 => Err(NaviguideError::NotFound(path.to_string())),
        429 => {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .map(Duration::from_secs);
            Err(NaviguideError::RateLimited { retry_after })
        }
        code => Err(NaviguideError::Api {
            status: code,
            message: format!("route API error: {status}"),
        }),
    }
}

#[async_trait]
impl RouteSource for HttpRouteSource {
    fn name(&self) -> &str {
        "http"
    }

    async fn fetch_routes(&self) -> Result<Vec<Route>> {
        self.get_json("/routes", "fetch_routes").await
    }

    async fn fetch_route(&self, route_id: u64) -> Result<Route> {
        self.get_json(&format!("/routes/{route_id}"), "fetch_route")
            .await
    }
}
