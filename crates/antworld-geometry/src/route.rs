//! Recorded agent routes.

use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};

use crate::GeometryError;

/// A chronologically ordered sequence of agent positions.
///
/// Always holds at least one position.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RouteRecord", into = "RouteRecord")]
pub struct Route {
    positions: Vec<DVec3>,
    agent_id: u32,
    route_id: u32,
    dt: f64,
}

/// Unchecked on-disk form of a [`Route`].
#[derive(Clone, Serialize, Deserialize)]
struct RouteRecord {
    positions: Vec<DVec3>,
    agent_id: u32,
    route_id: u32,
    dt: f64,
}

impl Route {
    /// Create a route. Fails if `positions` is empty.
    pub fn new(
        positions: Vec<DVec3>,
        agent_id: u32,
        route_id: u32,
        dt: f64,
    ) -> Result<Self, GeometryError> {
        if positions.is_empty() {
            return Err(GeometryError::EmptyRoute { agent_id, route_id });
        }
        Ok(Self {
            positions,
            agent_id,
            route_id,
            dt,
        })
    }

    pub fn positions(&self) -> &[DVec3] {
        &self.positions
    }

    pub fn agent_id(&self) -> u32 {
        self.agent_id
    }

    pub fn route_id(&self) -> u32 {
        self.route_id
    }

    /// Time step between consecutive positions, in seconds.
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Elapsed time from the first to the last position.
    pub fn duration(&self) -> f64 {
        self.dt * (self.positions.len() - 1) as f64
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Always `false`; routes are non-empty by construction.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Multiply every position component-wise by `factors`.
    pub fn scale(&self, factors: DVec3) -> Self {
        Self {
            positions: self.positions.iter().map(|p| *p * factors).collect(),
            ..self.clone()
        }
    }

    /// The route flattened onto the ground plane.
    pub fn xy(&self) -> Vec<DVec2> {
        self.positions.iter().map(|p| p.truncate()).collect()
    }
}

impl TryFrom<RouteRecord> for Route {
    type Error = GeometryError;

    fn try_from(record: RouteRecord) -> Result<Self, Self::Error> {
        Route::new(record.positions, record.agent_id, record.route_id, record.dt)
    }
}

impl From<Route> for RouteRecord {
    fn from(route: Route) -> Self {
        Self {
            positions: route.positions,
            agent_id: route.agent_id,
            route_id: route.route_id,
            dt: route.dt,
        }
    }
}
