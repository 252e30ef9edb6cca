//! The cache-backed route data service.
//!
//! [`RouteCacheService`] is the single point of access for route data. It
//! hides whether an answer came from the network or from the local cache
//! and degrades to cached data when the network is unavailable.
//!
//! # Policies
//!
//! | operation                  | cache read         | remote call       | on remote failure            |
//! |----------------------------|--------------------|-------------------|------------------------------|
//! | `fetch_all_routes`         | first, hit returns | only on miss      | cached list, else error      |
//! | `fetch_route_details`      | first, hit returns | only on miss      | cached detail, else error    |
//! | `force_refresh_routes`     | never              | list + every route| `RefreshFailed`, no rollback |
//! | `synchronize_all`          | never              | list + every route| list: error; route: reported |
//!
//! A cache write always happens after the remote fetch that produced the
//! data, and only once that data has passed [`Route::validate()`]. Nothing is
//! written when the remote call fails.
//!
//! Calls are not serialized against each other: two operations touching the
//! same key race with last-write-wins semantics.

mod builder;

pub use builder::RouteServiceBuilder;

use std::sync::Arc;

use futures_util::StreamExt;
use futures_util::stream;
use tracing::{debug, info, warn};

use crate::cache::RouteCache;
use crate::remote::RouteSource;
use crate::telemetry;
use crate::types::{Fetched, Route, SyncReport};
use crate::{NaviguideError, Result};

/// Default number of detail fetches in flight during synchronization.
pub const DEFAULT_SYNC_CONCURRENCY: usize = 4;

/// Read-through, fallback-on-failure access to route data.
pub struct RouteCacheService {
    source: Arc<dyn RouteSource>,
    cache: RouteCache,
    sync_concurrency: usize,
}

impl RouteCacheService {
    /// Create a service over an explicit source and cache.
    pub fn new(source: Arc<dyn RouteSource>, cache: RouteCache) -> Self {
        Self {
            source,
            cache,
            sync_concurrency: DEFAULT_SYNC_CONCURRENCY,
        }
    }

    /// Create a new builder for configuring the service.
    pub fn builder() -> RouteServiceBuilder {
        RouteServiceBuilder::new()
    }

    /// Set how many detail fetches [`synchronize_all()`](Self::synchronize_all)
    /// keeps in flight (minimum 1).
    pub fn with_sync_concurrency(mut self, n: usize) -> Self {
        self.sync_concurrency = n.max(1);
        self
    }

    /// The cache this service reads and writes.
    pub fn cache(&self) -> &RouteCache {
        &self.cache
    }

    /// All routes, preferring the cached list.
    ///
    /// On a cache hit no remote request is made. On a miss the list is
    /// fetched, written to the cache and returned. If the fetch fails, a
    /// cached list (if one appeared meanwhile) is returned as
    /// [`DataSource::Fallback`](crate::DataSource::Fallback); otherwise the
    /// call fails with [`NaviguideError::DataUnavailable`].
    pub async fn fetch_all_routes(&self) -> Result<Fetched<Vec<Route>>> {
        if let Some(routes) = self.cache.load_routes().await? {
            return Ok(Fetched::cache(routes));
        }

        match self.remote_routes().await {
            Ok(routes) => {
                self.cache.save_routes(&routes).await?;
                debug!(count = routes.len(), "cached route list");
                Ok(Fetched::remote(routes))
            }
            Err(e) => {
                warn!(source = self.source.name(), error = %e, "route list fetch failed, trying cache");
                match self.cache.reread_routes().await? {
                    Some(routes) => {
                        metrics::counter!(telemetry::CACHE_FALLBACKS_TOTAL, "operation" => "routes")
                            .increment(1);
                        Ok(Fetched::fallback(routes))
                    }
                    None => Err(NaviguideError::data_unavailable(e)),
                }
            }
        }
    }

    /// A route with its waypoints, preferring the cached detail record.
    ///
    /// Same policy as [`fetch_all_routes()`](Self::fetch_all_routes), scoped
    /// to the detail record of `route_id`. An unknown id surfaces the remote
    /// error (typically [`NaviguideError::NotFound`]) wrapped in
    /// `DataUnavailable` unless a cached record exists.
    pub async fn fetch_route_details(&self, route_id: u64) -> Result<Fetched<Route>> {
        if let Some(route) = self.cache.load_route(route_id).await? {
            return Ok(Fetched::cache(route));
        }

        match self.remote_route(route_id).await {
            Ok(route) => {
                self.cache.save_route(&route).await?;
                debug!(route_id, waypoints = route.waypoints.len(), "cached route details");
                Ok(Fetched::remote(route))
            }
            Err(e) => {
                warn!(route_id, source = self.source.name(), error = %e, "route fetch failed, trying cache");
                match self.cache.reread_route(route_id).await? {
                    Some(route) => {
                        metrics::counter!(telemetry::CACHE_FALLBACKS_TOTAL, "operation" => "route_details")
                            .increment(1);
                        Ok(Fetched::fallback(route))
                    }
                    None => Err(NaviguideError::data_unavailable(e)),
                }
            }
        }
    }

    /// Re-fetch the route list and every route's details, ignoring the cache.
    ///
    /// Steps run in order: list fetch, list write, then fetch + write per
    /// route. The first failing step aborts the refresh with
    /// [`NaviguideError::RefreshFailed`], which records how many detail
    /// records had already been rewritten. Those writes are kept.
    pub async fn force_refresh_routes(&self) -> Result<Vec<Route>> {
        let refresh_failed = |refreshed: usize| {
            move |e: NaviguideError| NaviguideError::RefreshFailed {
                refreshed,
                source: Box::new(e),
            }
        };

        let routes = self.remote_routes().await.map_err(refresh_failed(0))?;
        self.cache
            .save_routes(&routes)
            .await
            .map_err(refresh_failed(0))?;

        for (refreshed, summary) in routes.iter().enumerate() {
            let route = self
                .remote_route(summary.id)
                .await
                .map_err(refresh_failed(refreshed))?;
            self.cache
                .save_route(&route)
                .await
                .map_err(refresh_failed(refreshed))?;
        }

        info!(count = routes.len(), "refreshed routes");
        Ok(routes)
    }

    /// Make every route available offline.
    ///
    /// Fetches the route list from the remote source (a failure here aborts
    /// the call), caches it, then fetches and caches each route's details
    /// with up to `sync_concurrency` requests in flight. A failing route does
    /// not stop the others; the returned [`SyncReport`] lists what failed.
    /// Returns only after every detail fetch has settled.
    pub async fn synchronize_all(&self) -> Result<SyncReport> {
        let routes = self.remote_routes().await?;
        self.cache.save_routes(&routes).await?;

        let outcomes: Vec<(u64, Result<()>)> = stream::iter(routes.iter().map(|r| r.id))
            .map(move |route_id| async move { (route_id, self.sync_route(route_id).await) })
            .buffer_unordered(self.sync_concurrency)
            .collect()
            .await;

        let mut report = SyncReport {
            routes: routes.len(),
            ..SyncReport::default()
        };
        for (route_id, outcome) in outcomes {
            match outcome {
                Ok(()) => report.synced.push(route_id),
                Err(e) => {
                    metrics::counter!(telemetry::SYNC_FAILURES_TOTAL).increment(1);
                    warn!(route_id, error = %e, "route sync failed");
                    report.failed.push((route_id, e.to_string()));
                }
            }
        }
        report.synced.sort_unstable();
        report.failed.sort_by_key(|(id, _)| *id);

        info!(
            routes = report.routes,
            synced = report.synced.len(),
            failed = report.failed.len(),
            "synchronized routes"
        );
        Ok(report)
    }

    /// Remove the cached route list and every cached route detail record.
    ///
    /// Idempotent: clearing an empty cache succeeds.
    pub async fn clear_cache(&self) -> Result<()> {
        let removed = self.cache.clear().await?;
        info!(details = removed, "cleared route cache");
        Ok(())
    }

    async fn sync_route(&self, route_id: u64) -> Result<()> {
        let route = self.remote_route(route_id).await?;
        self.cache.save_route(&route).await
    }

    /// Fetch and validate the route list.
    async fn remote_routes(&self) -> Result<Vec<Route>> {
        let routes = self.source.fetch_routes().await?;
        for route in &routes {
            route.validate()?;
        }
        Ok(routes)
    }

    /// Fetch and validate one route, checking it is the one asked for.
    async fn remote_route(&self, route_id: u64) -> Result<Route> {
        let route = self.source.fetch_route(route_id).await?;
        if route.id != route_id {
            return Err(NaviguideError::InvalidData(format!(
                "requested route {route_id}, received route {}",
                route.id
            )));
        }
        route.validate()?;
        Ok(route)
    }
}
