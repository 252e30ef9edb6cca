//! Typed route cache over a [`KeyValueStore`].
//!
//! [`RouteCache`] owns the key namespace and the JSON encoding of cached
//! route snapshots, so the service never builds keys by hand:
//!
//! - the route list lives under [`ROUTES_CACHE_KEY`] (`"routes_cache"`);
//! - each route's detail record lives under [`detail_key()`]
//!   (`"waypoints_cache_<id>"`).
//!
//! The detail prefix is what [`RouteCache::clear()`] enumerates, so any key
//! starting with [`WAYPOINTS_CACHE_PREFIX`] is considered part of the cache.
//!
//! Records are stored as the plain JSON of the API payload. A record that no
//! longer decodes is reported as [`NaviguideError::Storage`]; it is not
//! silently dropped.

use std::sync::Arc;

use tracing::debug;

use crate::store::KeyValueStore;
use crate::telemetry;
use crate::types::Route;
use crate::{NaviguideError, Result};

/// Key of the cached route list.
pub const ROUTES_CACHE_KEY: &str = "routes_cache";

/// Namespace prefix of per-route detail records.
pub const WAYPOINTS_CACHE_PREFIX: &str = "waypoints_cache_";

/// Key of the cached detail record for `route_id`.
///
/// ```rust
/// # use naviguide::cache::detail_key;
/// assert_eq!(detail_key(5), "waypoints_cache_5");
/// ```
pub fn detail_key(route_id: u64) -> String {
    format!("{WAYPOINTS_CACHE_PREFIX}{route_id}")
}

/// Route list and route detail snapshots on top of a [`KeyValueStore`].
///
/// Cheap to clone; clones share the underlying store.
#[derive(Clone)]
pub struct RouteCache {
    store: Arc<dyn KeyValueStore>,
}

impl RouteCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// The underlying store.
    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    /// Cached route list, or `None` on miss. Emits cache hit/miss metrics.
    pub async fn load_routes(&self) -> Result<Option<Vec<Route>>> {
        self.load(ROUTES_CACHE_KEY, "routes").await
    }

    /// Re-read the cached route list without recording hit/miss metrics.
    ///
    /// Used for the fallback read after a failed fetch, which follows a
    /// miss that was already counted.
    pub async fn reread_routes(&self) -> Result<Option<Vec<Route>>> {
        self.read(ROUTES_CACHE_KEY).await
    }

    /// Overwrite the cached route list.
    pub async fn save_routes(&self, routes: &[Route]) -> Result<()> {
        self.save(ROUTES_CACHE_KEY, routes).await
    }

    /// Cached detail record for `route_id`, or `None` on miss.
    pub async fn load_route(&self, route_id: u64) -> Result<Option<Route>> {
        self.load(&detail_key(route_id), "route_details").await
    }

    /// Re-read the detail record for `route_id` without recording metrics.
    pub async fn reread_route(&self, route_id: u64) -> Result<Option<Route>> {
        self.read(&detail_key(route_id)).await
    }

    /// Overwrite the cached detail record for `route.id`.
    pub async fn save_route(&self, route: &Route) -> Result<()> {
        self.save(&detail_key(route.id), route).await
    }

    /// Every key in the detail namespace.
    pub async fn detail_keys(&self) -> Result<Vec<String>> {
        Ok(self
            .store
            .list_keys()
            .await?
            .into_iter()
            .filter(|key| key.starts_with(WAYPOINTS_CACHE_PREFIX))
            .collect())
    }

    /// Route ids with a cached detail record, ascending.
    pub async fn cached_route_ids(&self) -> Result<Vec<u64>> {
        let mut ids: Vec<u64> = self
            .detail_keys()
            .await?
            .iter()
            .filter_map(|key| key.strip_prefix(WAYPOINTS_CACHE_PREFIX)?.parse().ok())
            .collect();
        ids.sort_unstable();
        Ok(ids)
    }

    /// Remove the route list and every detail record.
    ///
    /// Returns the number of detail records removed. Clearing an empty cache
    /// succeeds and returns 0.
    pub async fn clear(&self) -> Result<usize> {
        self.store.remove(ROUTES_CACHE_KEY).await?;
        let keys = self.detail_keys().await?;
        if !keys.is_empty() {
            self.store.remove_many(&keys).await?;
        }
        Ok(keys.len())
    }

    async fn load<T: serde::de::DeserializeOwned>(
        &self,
        key: &str,
        operation: &'static str,
    ) -> Result<Option<T>> {
        let value = self.read(key).await?;
        if value.is_some() {
            metrics::counter!(telemetry::CACHE_HITS_TOTAL, "operation" => operation).increment(1);
            debug!(key, "cache hit");
        } else {
            metrics::counter!(telemetry::CACHE_MISSES_TOTAL, "operation" => operation)
                .increment(1);
            debug!(key, "cache miss");
        }
        Ok(value)
    }

    async fn read<T: serde::de::DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(raw) = self.store.get(key).await? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| NaviguideError::Storage(format!("corrupt cache record {key}: {e}")))
    }

    async fn save<T: serde::Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string(value).map_err(|e| {
            NaviguideError::Storage(format!("failed to serialize cache record {key}: {e}"))
        })?;
        self.store.set(key, &json).await
    }
}
