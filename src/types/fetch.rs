//! Outcome types returned by the route service.

use serde::Serialize;

use crate::{NaviguideError, Result};

/// Where a returned value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    /// Served from the local cache without contacting the remote source.
    Cache,
    /// Fetched from the remote source (and written to the cache).
    Remote,
    /// The remote source failed; served from a previously cached snapshot.
    Fallback,
}

/// A value together with its [`DataSource`].
///
/// Callers that don't care about provenance use [`into_inner()`](Self::into_inner).
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched<T> {
    pub value: T,
    pub source: DataSource,
}

impl<T> Fetched<T> {
    pub fn new(value: T, source: DataSource) -> Self {
        Self { value, source }
    }

    pub fn cache(value: T) -> Self {
        Self::new(value, DataSource::Cache)
    }

    pub fn remote(value: T) -> Self {
        Self::new(value, DataSource::Remote)
    }

    pub fn fallback(value: T) -> Self {
        Self::new(value, DataSource::Fallback)
    }

    /// Whether the value was served because the remote source failed.
    pub fn is_fallback(&self) -> bool {
        self.source == DataSource::Fallback
    }

    pub fn into_inner(self) -> T {
        self.value
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Fetched<U> {
        Fetched {
            value: f(self.value),
            source: self.source,
        }
    }
}

/// Summary of a [`synchronize_all()`](crate::RouteCacheService::synchronize_all) run.
///
/// Synchronization is best-effort: a failed detail fetch does not stop the
/// others. Failed route ids are collected here with their error messages.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SyncReport {
    /// Number of routes in the freshly fetched list.
    pub routes: usize,
    /// Route ids whose detail record was fetched and cached.
    pub synced: Vec<u64>,
    /// Route ids whose detail fetch (or write) failed.
    pub failed: Vec<(u64, String)>,
}

impl SyncReport {
    /// True if every route in the list was synchronized.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// Ids of the routes that failed, in ascending order.
    pub fn failed_ids(&self) -> Vec<u64> {
        let mut ids: Vec<u64> = self.failed.iter().map(|(id, _)| *id).collect();
        ids.sort_unstable();
        ids
    }

    /// Turn an incomplete report into [`NaviguideError::PartialSync`].
    pub fn into_result(self) -> Result<Self> {
        if self.is_complete() {
            Ok(self)
        } else {
            Err(NaviguideError::PartialSync {
                failed: self.failed,
            })
        }
    }
}
