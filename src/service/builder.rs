//! Builder for configuring service instances

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use super::{DEFAULT_SYNC_CONCURRENCY, RouteCacheService};
use crate::cache::RouteCache;
use crate::remote::{HttpRouteSource, RetryConfig, RetryingRouteSource, RouteSource};
use crate::store::{FileStore, KeyValueStore};
use crate::{NaviguideError, Result};

/// Builder for [`RouteCacheService`].
///
/// With no options set, the service talks to
/// [`DEFAULT_BASE_URL`](crate::remote::DEFAULT_BASE_URL) and persists to a
/// [`FileStore`] under the platform cache directory.
///
/// ```rust,no_run
/// # use naviguide::{MemoryStore, RetryConfig, RouteCacheService};
/// # use std::sync::Arc;
/// let service = RouteCacheService::builder()
///     .base_url("https://trails.example.com/api")
///     .retry(RetryConfig::new().max_attempts(3))
///     .store(Arc::new(MemoryStore::new()))
///     .build()?;
/// # Ok::<(), naviguide::NaviguideError>(())
/// ```
pub struct RouteServiceBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    retry: RetryConfig,
    source: Option<Arc<dyn RouteSource>>,
    store: Option<Arc<dyn KeyValueStore>>,
    cache_dir: Option<PathBuf>,
    sync_concurrency: usize,
}

impl RouteServiceBuilder {
    pub fn new() -> Self {
        Self {
            base_url: None,
            timeout: None,
            retry: RetryConfig::disabled(),
            source: None,
            store: None,
            cache_dir: None,
            sync_concurrency: DEFAULT_SYNC_CONCURRENCY,
        }
    }

    /// Base URL of the route API.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Per-request timeout for the HTTP client.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Transport-level retry for transient errors (default: no retry).
    ///
    /// Applied to whichever source the service ends up with.
    pub fn retry(mut self, config: RetryConfig) -> Self {
        self.retry = config;
        self
    }

    /// Use a custom route source instead of the HTTP client.
    pub fn source(mut self, source: Arc<dyn RouteSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Use a custom key-value store.
    pub fn store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Directory for the default [`FileStore`].
    pub fn cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(dir.into());
        self
    }

    /// Detail fetches kept in flight during synchronization.
    pub fn sync_concurrency(mut self, n: usize) -> Self {
        self.sync_concurrency = n;
        self
    }

    /// Build the service.
    pub fn build(self) -> Result<RouteCacheService> {
        if self.sync_concurrency == 0 {
            return Err(NaviguideError::Configuration(
                "sync concurrency must be at least 1".to_string(),
            ));
        }
        if self.source.is_some() && (self.base_url.is_some() || self.timeout.is_some()) {
            return Err(NaviguideError::Configuration(
                "base_url/timeout configure the HTTP source and cannot be combined with a custom source"
                    .to_string(),
            ));
        }
        if self.store.is_some() && self.cache_dir.is_some() {
            return Err(NaviguideError::Configuration(
                "cache_dir configures the file store and cannot be combined with a custom store"
                    .to_string(),
            ));
        }

        let mut source: Arc<dyn RouteSource> = match self.source {
            Some(source) => source,
            None => {
                let url = self
                    .base_url
                    .unwrap_or_else(|| crate::remote::DEFAULT_BASE_URL.to_string());
                let http = match self.timeout {
                    Some(timeout) => HttpRouteSource::with_timeout(url, timeout)?,
                    None => HttpRouteSource::with_base_url(url)?,
                };
                Arc::new(http)
            }
        };
        if self.retry.max_attempts > 1 {
            source = Arc::new(RetryingRouteSource::new(source, self.retry));
        }

        let store: Arc<dyn KeyValueStore> = match (self.store, self.cache_dir) {
            (Some(store), _) => store,
            (None, Some(dir)) => Arc::new(FileStore::new(dir)),
            (None, None) => Arc::new(FileStore::in_default_dir()),
        };

        Ok(RouteCacheService::new(source, RouteCache::new(store))
            .with_sync_concurrency(self.sync_concurrency))
    }
}

impl Default for RouteServiceBuilder {
    fn default() -> Self {
        Self::new()
    }
}
