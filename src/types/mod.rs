//! Public types for the Naviguide API.

mod fetch;
mod route;

pub use fetch::{DataSource, Fetched, SyncReport};
pub use route::{Route, Waypoint};
