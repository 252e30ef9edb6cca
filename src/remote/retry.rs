//! Retry configuration, delay calculation, and the retrying source decorator.
//!
//! [`RetryingRouteSource`] wraps a [`RouteSource`] and retries transient
//! errors (as classified by [`NaviguideError::is_transient()`]) with
//! exponential backoff. Both source methods delegate to the shared
//! `with_retry()` helper.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use super::RouteSource;
use crate::telemetry;
use crate::types::Route;
use crate::{NaviguideError, Result};

/// Configuration for retry behaviour on transient errors.
///
/// ```rust
/// # use naviguide::RetryConfig;
/// # use std::time::Duration;
/// let config = RetryConfig::new()
///     .max_attempts(5)
///     .initial_delay(Duration::from_millis(200));
/// ```
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the initial request).
    /// 1 = no retry. Default: 3.
    pub max_attempts: u32,
    /// Base delay before the first retry. Default: 500ms.
    pub initial_delay: Duration,
    /// Maximum delay between retries (caps exponential growth). Default: 10s.
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(10),
        }
    }
}

impl RetryConfig {
    /// Create a new config with sensible defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a config that disables retries (single attempt).
    pub fn disabled() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Set maximum attempts (including the initial request).
    pub fn max_attempts(mut self, n: u32) -> Self {
        self.max_attempts = n;
        self
    }

    /// Set the base delay before the first retry.
    pub fn initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Set the maximum delay between retries.
    pub fn max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Delay before retry number `attempt` (0-indexed).
    ///
    /// `initial_delay * 2^attempt`, capped at `max_delay`.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let delay = self
            .initial_delay
            .saturating_mul(2u32.saturating_pow(attempt));
        delay.min(self.max_delay)
    }

    /// Delay honoring a server `retry-after` hint when one was given.
    pub fn effective_delay(&self, attempt: u32, retry_after: Option<Duration>) -> Duration {
        retry_after.unwrap_or_else(|| self.delay_for_attempt(attempt))
    }
}

/// Execute an async operation with retry logic.
///
/// Permanent errors are returned immediately without retry.
pub(crate) async fn with_retry<F, Fut, T>(
    config: &RetryConfig,
    source_name: &str,
    operation: &'static str,
    f: F,
) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut last_err = None;
    for attempt in 0..config.max_attempts.max(1) {
        match f().await {
            Ok(result) => return Ok(result),
            Err(e) if e.is_transient() => {
                if attempt + 1 < config.max_attempts {
                    metrics::counter!(telemetry::RETRIES_TOTAL, "operation" => operation)
                        .increment(1);
                    let delay = config.effective_delay(attempt, e.retry_after());
                    warn!(
                        source = source_name,
                        operation,
                        attempt = attempt + 1,
                        max_attempts = config.max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "retrying after transient error"
                    );
                    tokio::time::sleep(delay).await;
                }
                last_err = Some(e);
            }
            Err(e) => return Err(e),
        }
    }
    Err(last_err.unwrap_or_else(|| NaviguideError::Http("no attempt made".to_string())))
}

/// Decorator that wraps a [`RouteSource`] with retry logic.
pub struct RetryingRouteSource {
    inner: Arc<dyn RouteSource>,
    config: RetryConfig,
}

impl RetryingRouteSource {
    /// Wrap a route source with retry logic.
    pub fn new(inner: Arc<dyn RouteSource>, config: RetryConfig) -> Self {
        Self { inner, config }
    }
}

#[async_trait]
impl RouteSource for RetryingRouteSource {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn fetch_routes(&self) -> Result<Vec<Route>> {
        with_retry(&self.config, self.inner.name(), "fetch_routes", || {
            self.inner.fetch_routes()
        })
        .await
    }

    async fn fetch_route(&self, route_id: u64) -> Result<Route> {
        with_retry(&self.config, self.inner.name(), "fetch_route", || {
            self.inner.fetch_route(route_id)
        })
        .await
    }
}
