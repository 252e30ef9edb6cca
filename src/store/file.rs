use std::borrow::Cow;
use std::collections::BTreeSet;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tempfile::NamedTempFile;
use tracing::warn;

use super::KeyValueStore;
use crate::{NaviguideError, Result};

/// Extension of committed record files.
const RECORD_EXT: &str = "json";

/// Durable [`KeyValueStore`] keeping one file per key.
///
/// Keys are percent-encoded into file names (`routes_cache` →
/// `routes_cache.json`). Writes go through a uniquely named temp file in the
/// store directory and a rename, so concurrent writers to the same key
/// (within or across processes) resolve to last-write-wins without torn
/// records.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Use `dir` as the store directory. It is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store under the platform cache directory (`~/.cache/naviguide/store`).
    pub fn in_default_dir() -> Self {
        Self::new(default_store_dir())
    }

    /// Directory holding the record files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn record_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.{RECORD_EXT}", encode_key(key)))
    }
}

/// Default store directory: `<cache dir>/naviguide/store`.
pub(crate) fn default_store_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from(".cache"))
        .join("naviguide")
        .join("store")
}

fn storage_err(action: &str, path: &Path, e: std::io::Error) -> NaviguideError {
    NaviguideError::Storage(format!("failed to {action} {}: {e}", path.display()))
}

/// Write `value` to a fresh temp file in `dir` and rename it onto `path`.
fn commit_record(dir: &Path, path: &Path, value: &str) -> Result<()> {
    let mut tmp =
        NamedTempFile::new_in(dir).map_err(|e| storage_err("create temp file in", dir, e))?;
    tmp.write_all(value.as_bytes())
        .and_then(|()| tmp.flush())
        .map_err(|e| storage_err("write", tmp.path(), e))?;
    // On failure the temp file is removed when the returned handle drops.
    tmp.persist(path)
        .map_err(|e| storage_err("commit", path, e.error))?;
    Ok(())
}

#[async_trait]
impl KeyValueStore for FileStore {
    fn name(&self) -> &str {
        "file"
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.record_path(key);
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(storage_err("read", &path, e)),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| storage_err("create store dir", &self.dir, e))?;

        let dir = self.dir.clone();
        let path = self.record_path(key);
        let value = value.to_owned();
        tokio::task::spawn_blocking(move || commit_record(&dir, &path, &value))
            .await
            .map_err(|e| NaviguideError::Storage(format!("store write task failed: {e}")))?
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let path = self.record_path(key);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(storage_err("remove", &path, e)),
        }
    }

    async fn list_keys(&self) -> Result<BTreeSet<String>> {
        let mut keys = BTreeSet::new();
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(keys),
            Err(e) => return Err(storage_err("list", &self.dir, e)),
        };

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| storage_err("list", &self.dir, e))?
        {
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                continue;
            };
            let Some(stem) = name
                .strip_suffix(RECORD_EXT)
                .and_then(|s| s.strip_suffix('.'))
            else {
                continue;
            };
            match decode_key(stem) {
                Some(key) => {
                    keys.insert(key);
                }
                None => warn!(file = name, "skipping undecodable store file"),
            }
        }
        Ok(keys)
    }
}

fn encode_key(key: &str) -> Cow<'_, str> {
    urlencoding::encode(key)
}

fn decode_key(encoded: &str) -> Option<String> {
    urlencoding::decode(encoded).ok().map(Cow::into_owned)
}
