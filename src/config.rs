//! Configuration loading for the `naviguide` CLI.
//!
//! Configuration is loaded from TOML files with the following resolution order:
//! 1. `--config <path>` (CLI flag; must exist)
//! 2. `~/.naviguide/config.toml` (user)
//! 3. `/etc/naviguide/config.toml` (system)
//!
//! If none of these exist, defaults are used.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::remote::{DEFAULT_BASE_URL, RetryConfig};
use crate::service::{DEFAULT_SYNC_CONCURRENCY, RouteServiceBuilder};
use crate::{NaviguideError, Result};

/// CLI configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub sync: SyncConfig,
}

/// Route API settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base URL (default: http://10.0.2.2:8080/api).
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds (default: 30).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Attempts per request including the first (default: 1, no retry).
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            max_attempts: default_max_attempts(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_max_attempts() -> u32 {
    1
}

/// Local cache settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CacheConfig {
    /// Store directory (default: `<cache dir>/naviguide/store`).
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

/// Synchronization settings.
#[derive(Debug, Clone, Deserialize)]
pub struct SyncConfig {
    /// Detail fetches in flight (default: 4).
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
        }
    }
}

fn default_concurrency() -> usize {
    DEFAULT_SYNC_CONCURRENCY
}

impl Config {
    /// Load configuration from the standard locations.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        match Self::resolve_config_path(explicit_path)? {
            Some(path) => Self::load_from_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// Parse a config file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            NaviguideError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            NaviguideError::Configuration(format!("Failed to parse config file {path:?}: {e}"))
        })
    }

    fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(NaviguideError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".naviguide").join("config.toml");
            if user_config.exists() {
                return Ok(Some(user_config));
            }
        }

        let system_config = PathBuf::from("/etc/naviguide/config.toml");
        if system_config.exists() {
            return Ok(Some(system_config));
        }

        Ok(None)
    }

    /// A service builder preconfigured from this config.
    pub fn service_builder(&self) -> RouteServiceBuilder {
        let mut builder = RouteServiceBuilder::new()
            .base_url(&self.api.base_url)
            .timeout(Duration::from_secs(self.api.timeout_secs))
            .retry(RetryConfig::new().max_attempts(self.api.max_attempts))
            .sync_concurrency(self.sync.concurrency);
        if let Some(dir) = &self.cache.dir {
            builder = builder.cache_dir(dir);
        }
        builder
    }
}
