//! Route and waypoint records as served by the route API.

use serde::{Deserialize, Serialize};

use crate::{NaviguideError, Result};

/// A single geographic point of interest belonging to one [`Route`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub lat: f64,
    pub lng: f64,
    /// Owning route. A relation, not ownership.
    pub route_id: u64,
}

impl Waypoint {
    /// Create a waypoint with an empty description.
    pub fn new(id: u64, route_id: u64, name: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            lat,
            lng,
            route_id,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// A named touring path.
///
/// List responses (`GET /routes`) carry summary fields only, so `waypoints`
/// deserializes to an empty sequence when absent. Detail responses
/// (`GET /routes/{id}`) carry the full, ordered waypoint list; the order is
/// the default visiting order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub waypoints: Vec<Waypoint>,
}

impl Route {
    /// Create a route with no waypoints.
    pub fn new(id: u64, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: description.into(),
            waypoints: Vec::new(),
        }
    }

    /// Append a waypoint.
    pub fn with_waypoint(mut self, waypoint: Waypoint) -> Self {
        self.waypoints.push(waypoint);
        self
    }

    /// Check that every waypoint points back at this route.
    pub fn validate(&self) -> Result<()> {
        match self.waypoints.iter().find(|wp| wp.route_id != self.id) {
            Some(wp) => Err(NaviguideError::InvalidData(format!(
                "waypoint {} belongs to route {}, not route {}",
                wp.id, wp.route_id, self.id
            ))),
            None => Ok(()),
        }
    }

    /// Look up a waypoint by id.
    pub fn waypoint(&self, waypoint_id: u64) -> Option<&Waypoint> {
        self.waypoints.iter().find(|wp| wp.id == waypoint_id)
    }

    /// 1-based visiting position of a waypoint, as shown on map markers.
    pub fn position_of(&self, waypoint_id: u64) -> Option<usize> {
        self.waypoints
            .iter()
            .position(|wp| wp.id == waypoint_id)
            .map(|i| i + 1)
    }
}
