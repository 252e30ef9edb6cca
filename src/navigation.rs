//! Waypoint proximity and hand-off to external navigation apps.
//!
//! Turn-by-turn routing is not done here. For a chosen waypoint we build a
//! deep link for the native maps app and a web URL to open when that app
//! is not installed.

use geo::{Distance, Haversine, Point};
use serde::Serialize;

use crate::types::{Route, Waypoint};

/// Radius (metres) within which a waypoint counts as reached.
pub const DEFAULT_ARRIVAL_RADIUS_M: f64 = 50.0;

/// A geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Position {
    pub lat: f64,
    pub lng: f64,
}

impl Position {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    fn point(self) -> Point<f64> {
        Point::new(self.lng, self.lat)
    }
}

impl From<&Waypoint> for Position {
    fn from(wp: &Waypoint) -> Self {
        Self::new(wp.lat, wp.lng)
    }
}

/// Great-circle distance in metres.
pub fn distance_m(from: Position, to: Position) -> f64 {
    Haversine::distance(from.point(), to.point())
}

/// A waypoint together with its visiting position and distance from the user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaypointDistance<'a> {
    pub waypoint: &'a Waypoint,
    /// 1-based visiting position within the route.
    pub position: usize,
    pub distance_m: f64,
}

/// Distances from `from` to every waypoint of `route`, in visiting order.
pub fn distances<'a>(route: &'a Route, from: Position) -> Vec<WaypointDistance<'a>> {
    route
        .waypoints
        .iter()
        .enumerate()
        .map(|(i, wp)| WaypointDistance {
            waypoint: wp,
            position: i + 1,
            distance_m: distance_m(from, wp.into()),
        })
        .collect()
}

/// The waypoint closest to `from`, or `None` for a route without waypoints.
pub fn nearest_waypoint(route: &Route, from: Position) -> Option<WaypointDistance<'_>> {
    distances(route, from)
        .into_iter()
        .min_by(|a, b| a.distance_m.total_cmp(&b.distance_m))
}

/// Waypoints within `radius_m` of `from`, closest first.
pub fn waypoints_within(route: &Route, from: Position, radius_m: f64) -> Vec<WaypointDistance<'_>> {
    let mut near: Vec<_> = distances(route, from)
        .into_iter()
        .filter(|d| d.distance_m <= radius_m)
        .collect();
    near.sort_by(|a, b| a.distance_m.total_cmp(&b.distance_m));
    near
}

/// Links that start navigation to a waypoint in an external app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationLinks {
    /// Native Google Maps navigation intent.
    pub native: String,
    /// Browser fallback with the waypoint as destination.
    pub web: String,
}

impl NavigationLinks {
    pub fn for_position(to: Position) -> Self {
        Self {
            native: format!("google.navigation:q={},{}", to.lat, to.lng),
            web: format!(
                "https://www.google.com/maps/dir/?api=1&destination={},{}",
                to.lat, to.lng
            ),
        }
    }

    pub fn for_waypoint(waypoint: &Waypoint) -> Self {
        Self::for_position(waypoint.into())
    }
}
