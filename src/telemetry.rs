//! Telemetry metric name constants.
//!
//! Centralised metric names for naviguide operations. Consumers install
//! their own `metrics` recorder (e.g. prometheus, statsd); without a
//! recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `naviguide_`. Counters end in `_total`.
//!
//! # Common labels
//!
//! - `operation`: cache record kind ("routes" | "route_details") or
//!   remote call ("fetch_routes" | "fetch_route")
//! - `status`: outcome: "ok" or "error"

/// Total cache hits.
///
/// Labels: `operation`.
pub const CACHE_HITS_TOTAL: &str = "naviguide_cache_hits_total";

/// Total cache misses.
///
/// Labels: `operation`.
pub const CACHE_MISSES_TOTAL: &str = "naviguide_cache_misses_total";

/// Total responses served from cache because the remote source failed.
///
/// Labels: `operation`.
pub const CACHE_FALLBACKS_TOTAL: &str = "naviguide_cache_fallbacks_total";

/// Total requests sent to the remote route source.
///
/// Labels: `operation`, `status` ("ok" | "error").
pub const REMOTE_REQUESTS_TOTAL: &str = "naviguide_remote_requests_total";

/// Total retry attempts (not counting the initial request).
///
/// Labels: `operation`.
pub const RETRIES_TOTAL: &str = "naviguide_retries_total";

/// Total per-route failures during synchronization.
pub const SYNC_FAILURES_TOTAL: &str = "naviguide_sync_failures_total";
