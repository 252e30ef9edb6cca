use std::collections::BTreeSet;

use async_trait::async_trait;
use moka::future::Cache;

use super::KeyValueStore;
use crate::Result;

/// In-memory [`KeyValueStore`].
///
/// Unbounded: nothing is evicted behind the caller's back, so it behaves
/// like a durable store for the lifetime of the process. Clones share the
/// same entries.
#[derive(Clone)]
pub struct MemoryStore {
    entries: Cache<String, String>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            entries: Cache::builder().build(),
        }
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.entries.iter().count()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).await)
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string()).await;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.entries.invalidate(key).await;
        Ok(())
    }

    async fn list_keys(&self) -> Result<BTreeSet<String>> {
        Ok(self.entries.iter().map(|(k, _)| (*k).clone()).collect())
    }
}
