//! Persistent string-keyed stores backing the route cache.
//!
//! [`KeyValueStore`] is the seam between the route service and whatever
//! holds cached records. Two implementations ship with the crate:
//!
//! - [`FileStore`]: durable, one file per key under a cache directory.
//!   Each write goes to a temp file first and is renamed into place, so a
//!   reader sees either the old record or the new one, never a torn write.
//! - [`MemoryStore`]: moka-backed, process-local. Useful for tests and
//!   for sessions that should not touch the disk.
//!
//! Stores have no cross-key transactions: `remove_many` may leave some keys
//! behind if it fails midway, and reports the failure.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use std::collections::BTreeSet;

use async_trait::async_trait;

use crate::Result;

/// Durable string-keyed store.
///
/// Every method may suspend on I/O. Individual `set`/`remove` calls are
/// atomic per key.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Store name for logging/debugging.
    fn name(&self) -> &str;

    /// Read the value stored under `key`, or `None` if absent.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> Result<()>;

    /// Remove several keys.
    ///
    /// Default implementation calls `remove` sequentially and stops at the
    /// first failure.
    async fn remove_many(&self, keys: &[String]) -> Result<()> {
        for key in keys {
            self.remove(key).await?;
        }
        Ok(())
    }

    /// All keys currently present.
    async fn list_keys(&self) -> Result<BTreeSet<String>>;
}
