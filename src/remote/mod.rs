//! Remote route sources.
//!
//! [`RouteSource`] is the seam between the route service and the REST API.
//! [`HttpRouteSource`] talks to the API over reqwest; [`RetryingRouteSource`]
//! wraps any source with transport-level retry on transient errors. The
//! service itself never retries: it falls back to the cache instead.

mod http;
pub mod retry;

pub use http::{DEFAULT_BASE_URL, HttpRouteSource};
pub use retry::{RetryConfig, RetryingRouteSource};

use async_trait::async_trait;

use crate::Result;
use crate::types::Route;

/// Source of truth for route data.
///
/// Implementations map transport failures, non-success statuses and
/// malformed bodies onto [`NaviguideError`](crate::NaviguideError) variants.
/// Any error returned here lets the service fall back to its cache.
#[async_trait]
pub trait RouteSource: Send + Sync {
    /// Source name for logging/debugging.
    fn name(&self) -> &str;

    /// `GET /routes`: all routes, summary fields only.
    async fn fetch_routes(&self) -> Result<Vec<Route>>;

    /// `GET /routes/{id}`: a single route with its full waypoint list.
    async fn fetch_route(&self, route_id: u64) -> Result<Route>;
}
