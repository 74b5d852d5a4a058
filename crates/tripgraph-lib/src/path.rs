//! Search-node ancestry and path reconstruction.
//!
//! Every discovery made during a run becomes a [`SearchNode`] stored in a
//! [`NodeArena`]. A node's parent is fixed when the node is created and always
//! points at an earlier arena slot, so the parent links form a tree rooted at
//! the start node. Reconstruction only reads that tree.

use std::time::Duration;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::graph::{Edge, Metric, RouteNetwork};
use crate::registry::{Location, LocationId};
use crate::routes::Route;
use crate::search::Strategy;

/// Index of a node inside a [`NodeArena`].
pub type NodeIndex = usize;

/// One discovery of a location during a search run.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchNode {
    pub location: LocationId,
    /// Cost from the start along this node's ancestry.
    pub g: f64,
    /// Estimated remaining cost to the goal.
    pub h: f64,
    /// Frontier priority: `g` when uninformed, `g + h` when heuristic.
    pub f: f64,
    pub parent: Option<NodeIndex>,
    /// Edge taken from the parent; `None` only for the root.
    pub incoming: Option<Edge>,
}

/// Append-only storage for the nodes created during one run.
#[derive(Debug, Default)]
pub struct NodeArena {
    nodes: Vec<SearchNode>,
}

impl NodeArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the root node of a run.
    pub fn push_root(&mut self, location: LocationId, h: f64, f: f64) -> Result<NodeIndex> {
        self.push(SearchNode {
            location,
            g: 0.0,
            h,
            f,
            parent: None,
            incoming: None,
        })
    }

    /// Store a node discovered from `parent` by following `edge`.
    pub fn push_child(
        &mut self,
        parent: NodeIndex,
        edge: &Edge,
        g: f64,
        h: f64,
        f: f64,
    ) -> Result<NodeIndex> {
        debug_assert!(parent < self.nodes.len(), "parent must already exist");
        self.push(SearchNode {
            location: edge.target,
            g,
            h,
            f,
            parent: Some(parent),
            incoming: Some(edge.clone()),
        })
    }

    fn push(&mut self, node: SearchNode) -> Result<NodeIndex> {
        self.nodes
            .try_reserve(1)
            .map_err(|_| Error::ResourceExhausted {
                context: "search node arena",
            })?;
        let index = self.nodes.len();
        self.nodes.push(node);
        Ok(index)
    }

    pub fn get(&self, index: NodeIndex) -> Option<&SearchNode> {
        self.nodes.get(index)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// A location on a reconstructed path and the edge used to reach it.
#[derive(Debug, Clone, PartialEq)]
pub struct PathStep {
    pub location: LocationId,
    pub incoming: Option<Edge>,
}

/// Walk parent links from `terminal` back to the root and return the steps in
/// start-to-terminal order. The first step never has an incoming edge.
pub fn reconstruct(arena: &NodeArena, terminal: NodeIndex) -> Vec<PathStep> {
    if arena.is_empty() {
        return Vec::new();
    }
    let mut steps = Vec::new();
    let mut current = Some(terminal);
    while let Some(index) = current {
        let Some(node) = arena.get(index) else {
            break;
        };
        steps.push(PathStep {
            location: node.location,
            incoming: node.incoming.clone(),
        });
        current = node.parent;
    }
    steps.reverse();
    steps
}

/// Leg of a path: the route record travelled and its resolved weights.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segment {
    pub route: Route,
    pub time: f64,
    pub cost: f64,
    pub distance_km: f64,
}

/// Location on a path together with the leg that arrived there.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathStop {
    pub location: Location,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incoming: Option<Segment>,
}

/// Sums over every leg of a path.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PathTotals {
    pub time: f64,
    pub cost: f64,
    pub distance_km: f64,
}

impl PathTotals {
    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Time => self.time,
            Metric::Cost => self.cost,
            Metric::Distance => self.distance_km,
        }
    }
}

/// Counters gathered while a search runs.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct SearchStats {
    /// Nodes popped and accepted as settled.
    pub nodes_visited: usize,
    /// Popped entries discarded because their location was already settled.
    pub stale_discarded: usize,
    /// Search nodes created, the start node included.
    pub nodes_created: usize,
    /// Wall time of the run; informational only.
    pub elapsed: Duration,
}

/// A solved query: ordered stops, totals and search statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Path {
    pub metric: Metric,
    pub strategy: Strategy,
    pub stops: Vec<PathStop>,
    pub totals: PathTotals,
    pub stats: SearchStats,
}

impl Path {
    /// Resolve reconstructed steps into owned stops and accumulate totals.
    pub fn from_steps(
        network: &RouteNetwork,
        steps: &[PathStep],
        metric: Metric,
        strategy: Strategy,
        stats: SearchStats,
    ) -> Result<Self> {
        if steps.is_empty() {
            return Err(Error::EmptyPath);
        }

        let mut totals = PathTotals::default();
        let mut stops = Vec::with_capacity(steps.len());
        for step in steps {
            let location = network
                .location(step.location)
                .cloned()
                .ok_or(Error::EmptyPath)?;
            let incoming = match &step.incoming {
                Some(edge) => {
                    let route = network.route(edge.route).cloned().ok_or(Error::EmptyPath)?;
                    totals.time += edge.time;
                    totals.cost += edge.cost;
                    totals.distance_km += edge.distance_km;
                    Some(Segment {
                        route,
                        time: edge.time,
                        cost: edge.cost,
                        distance_km: edge.distance_km,
                    })
                }
                None => None,
            };
            stops.push(PathStop { location, incoming });
        }

        Ok(Self {
            metric,
            strategy,
            stops,
            totals,
            stats,
        })
    }

    /// Total under the metric the path was optimised for.
    pub fn total_cost(&self) -> f64 {
        self.totals.get(self.metric)
    }

    /// Number of legs travelled.
    pub fn hop_count(&self) -> usize {
        self.stops.len().saturating_sub(1)
    }

    pub fn start(&self) -> Option<&Location> {
        self.stops.first().map(|stop| &stop.location)
    }

    pub fn goal(&self) -> Option<&Location> {
        self.stops.last().map(|stop| &stop.location)
    }

    /// Names of the stops in travel order.
    pub fn location_names(&self) -> Vec<&str> {
        self.stops
            .iter()
            .map(|stop| stop.location.name.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::LocationRegistry;
    use crate::routes::RouteSet;

    fn network() -> RouteNetwork {
        let mut registry = LocationRegistry::new();
        registry.add_location("A", "X", 0.0, 0.0).unwrap();
        registry.add_location("B", "X", 0.0, 1.0).unwrap();
        registry.add_location("C", "X", 0.0, 2.0).unwrap();
        let mut routes = RouteSet::new();
        routes.add_route("A", "B", "bus", 2.0, 10.0, "");
        routes.add_route("B", "C", "bus", 3.0, 5.0, "night");
        RouteNetwork::build(registry, routes)
    }

    fn id(network: &RouteNetwork, name: &str) -> LocationId {
        network.registry().id_by_name(name).unwrap()
    }

    #[test]
    fn reconstruct_orders_start_to_goal() {
        let network = network();
        let a = id(&network, "A");
        let b = id(&network, "B");
        let ab = network.neighbours(a)[0].clone();
        let bc = network.neighbours(b)[0].clone();

        let mut arena = NodeArena::new();
        let root = arena.push_root(a, 0.0, 0.0).unwrap();
        let at_b = arena.push_child(root, &ab, 2.0, 0.0, 2.0).unwrap();
        // sibling discovery that is not part of the answer
        arena.push_child(root, &ab, 9.0, 0.0, 9.0).unwrap();
        let at_c = arena.push_child(at_b, &bc, 5.0, 0.0, 5.0).unwrap();

        assert_eq!(arena.len(), 4);
        let steps = reconstruct(&arena, at_c);
        let names: Vec<LocationId> = steps.iter().map(|step| step.location).collect();
        assert_eq!(names, vec![a, b, id(&network, "C")]);
        assert!(steps[0].incoming.is_none());
        assert!(steps[1..].iter().all(|step| step.incoming.is_some()));
    }

    #[test]
    fn empty_arena_reconstructs_nothing() {
        assert!(reconstruct(&NodeArena::new(), 0).is_empty());
    }

    #[test]
    fn root_only_path_has_one_stop() {
        let network = network();
        let mut arena = NodeArena::new();
        let root = arena.push_root(id(&network, "A"), 0.0, 0.0).unwrap();

        let steps = reconstruct(&arena, root);
        let path = Path::from_steps(
            &network,
            &steps,
            Metric::Time,
            Strategy::Uninformed,
            SearchStats::default(),
        )
        .unwrap();

        assert_eq!(path.stops.len(), 1);
        assert_eq!(path.hop_count(), 0);
        assert_eq!(path.total_cost(), 0.0);
        assert_eq!(path.start(), path.goal());
    }

    #[test]
    fn totals_sum_every_leg() {
        let network = network();
        let a = id(&network, "A");
        let b = id(&network, "B");
        let steps = vec![
            PathStep {
                location: a,
                incoming: None,
            },
            PathStep {
                location: b,
                incoming: Some(network.neighbours(a)[0].clone()),
            },
            PathStep {
                location: id(&network, "C"),
                incoming: Some(network.neighbours(b)[0].clone()),
            },
        ];

        let path = Path::from_steps(
            &network,
            &steps,
            Metric::Cost,
            Strategy::Heuristic,
            SearchStats::default(),
        )
        .unwrap();

        assert_eq!(path.location_names(), vec!["A", "B", "C"]);
        assert_eq!(path.totals.time, 5.0);
        assert_eq!(path.totals.cost, 15.0);
        assert_eq!(path.total_cost(), 15.0);
        assert_eq!(
            path.stops[2].incoming.as_ref().map(|seg| seg.route.note.as_str()),
            Some("night")
        );
    }

    #[test]
    fn empty_steps_are_rejected() {
        let err = Path::from_steps(
            &network(),
            &[],
            Metric::Time,
            Strategy::Uninformed,
            SearchStats::default(),
        )
        .expect_err("empty path");
        assert!(matches!(err, Error::EmptyPath));
    }
}
