//! Naviguide - offline-first route data for trip navigation
//!
//! This crate serves touring routes and their waypoints from a REST API,
//! keeps a persistent local copy, and falls back to that copy when the
//! network is unavailable. It also computes proximity to waypoints and
//! builds deep links that hand a waypoint over to an external maps app.
//!
//! # Example
//!
//! ```rust,no_run
//! use naviguide::RouteCacheService;
//!
//! #[tokio::main]
//! async fn main() -> naviguide::Result<()> {
//!     let service = RouteCacheService::builder()
//!         .base_url("https://trails.example.com/api")
//!         .build()?;
//!
//!     let routes = service.fetch_all_routes().await?;
//!     for route in &routes.value {
//!         println!("{} {}", route.id, route.name);
//!     }
//!
//!     // Make everything available offline.
//!     let report = service.synchronize_all().await?;
//!     println!("synced {}/{}", report.synced.len(), report.routes);
//!     Ok(())
//! }
//! ```

pub mod cache;
#[cfg(feature = "cli")]
pub mod config;
pub mod error;
pub mod navigation;
pub mod remote;
pub mod service;
pub mod store;
pub mod telemetry;
pub mod types;
mod version;

// Re-export main types at crate root
pub use cache::RouteCache;
pub use error::{NaviguideError, Result};
pub use navigation::{NavigationLinks, Position, WaypointDistance};
pub use remote::{HttpRouteSource, RetryConfig, RetryingRouteSource, RouteSource};
pub use service::{RouteCacheService, RouteServiceBuilder};
pub use store::{FileStore, KeyValueStore, MemoryStore};
pub use types::{DataSource, Fetched, Route, SyncReport, Waypoint};
pub use version::{PKG_VERSION, version_string};
