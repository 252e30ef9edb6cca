//! Naviguide error types

use std::time::Duration;

/// Naviguide error types
#[derive(Debug, thiserror::Error)]
pub enum NaviguideError {
    // Remote source errors
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Option<Duration> },

    #[error("not found: {0}")]
    NotFound(String),

    // Data errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Payload parsed but broke a data-model invariant.
    #[error("invalid data: {0}")]
    InvalidData(String),

    // Local store errors
    #[error("storage error: {0}")]
    Storage(String),

    // Service-level outcomes
    /// The remote source failed and there was no cached copy to fall back to.
    #[error("data unavailable: {source}")]
    DataUnavailable {
        #[source]
        source: Box<NaviguideError>,
    },

    /// A forced refresh failed after `refreshed` detail records were written.
    #[error("refresh failed after {refreshed} route(s): {source}")]
    RefreshFailed {
        refreshed: usize,
        #[source]
        source: Box<NaviguideError>,
    },

    /// Synchronization finished, but some routes could not be fetched.
    #[error("partial sync: {} route(s) failed", failed.len())]
    PartialSync { failed: Vec<(u64, String)> },

    #[error("configuration error: {0}")]
    Configuration(String),
}

impl NaviguideError {
    /// Wrap a remote failure that had no cache to fall back to.
    pub fn data_unavailable(source: NaviguideError) -> Self {
        NaviguideError::DataUnavailable {
            source: Box::new(source),
        }
    }

    /// Whether this error is worth retrying at the transport level.
    ///
    /// Connection failures, rate limits and 5xx responses are transient.
    /// Everything else (404, malformed bodies, storage failures) is not.
    pub fn is_transient(&self) -> bool {
        match self {
            NaviguideError::Http(_) | NaviguideError::RateLimited { .. } => true,
            NaviguideError::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Server-provided backoff hint, if any.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            NaviguideError::RateLimited { retry_after } => *retry_after,
            _ => None,
        }
    }
}

impl From<reqwest::Error> for NaviguideError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            NaviguideError::InvalidData(err.to_string())
        } else {
            NaviguideError::Http(err.to_string())
        }
    }
}

/// Result type alias for Naviguide operations
pub type Result<T> = std::result::Result<T, NaviguideError>;
