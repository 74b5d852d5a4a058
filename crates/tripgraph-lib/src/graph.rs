use std::fmt;

use serde::Serialize;
use tracing::{debug, warn};

use crate::registry::{Location, LocationId, LocationRegistry};
use crate::routes::{Route, RouteIndex, RouteSet};

/// Edge-cost field used by the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Travel time in hours.
    #[default]
    Time,
    /// Monetary cost.
    Cost,
    /// Great-circle length in kilometres.
    Distance,
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            Metric::Time => "time",
            Metric::Cost => "cost",
            Metric::Distance => "distance",
        };
        f.write_str(value)
    }
}

/// Resolved edge within the route network.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub route: RouteIndex,
    pub target: LocationId,
    pub time: f64,
    pub cost: f64,
    pub distance_km: f64,
}

impl Edge {
    /// Weight of this edge under the given metric.
    pub fn weight(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Time => self.time,
            Metric::Cost => self.cost,
            Metric::Distance => self.distance_km,
        }
    }
}

/// Why a route record did not make it into the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    UnknownOrigin,
    UnknownDestination,
    InvalidWeight,
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            DropReason::UnknownOrigin => "unknown origin",
            DropReason::UnknownDestination => "unknown destination",
            DropReason::InvalidWeight => "negative or non-finite weight",
        };
        f.write_str(value)
    }
}

/// A route that was skipped while resolving the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DroppedRoute {
    pub route: RouteIndex,
    pub reason: DropReason,
}

/// Locations and routes with every usable route resolved to an adjacency list.
///
/// Routes whose endpoints never resolve are silently dropped from the
/// adjacency; they stay visible through [`RouteNetwork::dropped`]. An explicit
/// route distance shorter than the great circle between its endpoints is
/// raised to that great-circle length.
#[derive(Debug, Clone, Default)]
pub struct RouteNetwork {
    registry: LocationRegistry,
    routes: RouteSet,
    adjacency: Vec<Vec<Edge>>,
    dropped: Vec<DroppedRoute>,
}

impl RouteNetwork {
    /// Resolve `routes` against `registry`. Routes may have been added before
    /// their endpoints; only the final registry contents matter.
    pub fn build(registry: LocationRegistry, routes: RouteSet) -> Self {
        let mut adjacency: Vec<Vec<Edge>> = vec![Vec::new(); registry.len()];
        let mut dropped = Vec::new();

        for (index, route) in routes.iter() {
            match resolve_route(&registry, index, route) {
                Ok((origin, edge)) => adjacency[origin.index()].push(edge),
                Err(reason) => {
                    warn!(
                        route = index,
                        origin = %route.origin,
                        destination = %route.destination,
                        %reason,
                        "dropping route"
                    );
                    dropped.push(DroppedRoute {
                        route: index,
                        reason,
                    });
                }
            }
        }

        debug!(
            locations = registry.len(),
            routes = routes.len(),
            dropped = dropped.len(),
            "route network built"
        );

        Self {
            registry,
            routes,
            adjacency,
            dropped,
        }
    }

    pub fn registry(&self) -> &LocationRegistry {
        &self.registry
    }

    pub fn routes(&self) -> &RouteSet {
        &self.routes
    }

    pub fn location(&self, id: LocationId) -> Option<&Location> {
        self.registry.get(id)
    }

    pub fn route(&self, index: RouteIndex) -> Option<&Route> {
        self.routes.get(index)
    }

    /// Return the outgoing resolved edges for a location.
    pub fn neighbours(&self, id: LocationId) -> &[Edge] {
        self.adjacency
            .get(id.index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether a resolved edge leads from `from` to `to`.
    pub fn has_edge(&self, from: LocationId, to: LocationId) -> bool {
        self.neighbours(from).iter().any(|edge| edge.target == to)
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum()
    }

    pub fn dropped(&self) -> &[DroppedRoute] {
        &self.dropped
    }

    pub fn dropped_routes(&self) -> usize {
        self.dropped.len()
    }
}

fn resolve_route(
    registry: &LocationRegistry,
    index: RouteIndex,
    route: &Route,
) -> Result<(LocationId, Edge), DropReason> {
    let origin = registry
        .id_by_name(&route.origin)
        .ok_or(DropReason::UnknownOrigin)?;
    let target = registry
        .id_by_name(&route.destination)
        .ok_or(DropReason::UnknownDestination)?;

    let (Some(from), Some(to)) = (registry.get(origin), registry.get(target)) else {
        return Err(DropReason::UnknownOrigin);
    };
    let great_circle = from.position.distance_to(&to.position);

    if ![Some(route.time), Some(route.cost), route.distance_km]
        .iter()
        .flatten()
        .all(|weight| weight.is_finite() && *weight >= 0.0)
    {
        return Err(DropReason::InvalidWeight);
    }

    // Edge lengths never undercut the great circle between their endpoints.
    let distance_km = match route.distance_km {
        Some(explicit) if explicit < great_circle => {
            debug!(
                route = index,
                explicit,
                great_circle,
                "raising route distance to great-circle length"
            );
            great_circle
        }
        Some(explicit) => explicit,
        None => great_circle,
    };

    Ok((
        origin,
        Edge {
            route: index,
            target,
            time: route.time,
            cost: route.cost,
            distance_km,
        },
    ))
}
