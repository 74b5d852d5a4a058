//! Shared fixtures for integration tests.

use std::path::PathBuf;

use tripgraph_lib::{
    load_network, LoadedNetwork, LoaderOptions, LocationId, LocationRegistry, Metric, RouteNetwork,
    RouteSet,
};

/// Directory holding the CSV fixtures.
#[allow(dead_code)]
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

/// European city network loaded from the CSV fixtures.
#[allow(dead_code)]
pub fn europe() -> LoadedNetwork {
    let dir = fixtures_dir();
    load_network(
        &dir.join("cities.csv"),
        &dir.join("routes.csv"),
        LoaderOptions::default(),
    )
    .expect("fixtures load")
}

/// Three cities with a fast-but-expensive chain and a slow-but-cheap shortcut,
/// plus an isolated fourth city.
#[allow(dead_code)]
pub fn triangle() -> RouteNetwork {
    let mut registry = LocationRegistry::new();
    registry.add_location("A", "X", 0.0, 0.0).expect("unique");
    registry.add_location("B", "X", 0.0, 0.5).expect("unique");
    registry.add_location("C", "X", 0.0, 1.0).expect("unique");
    registry.add_location("D", "X", 10.0, 10.0).expect("unique");

    let mut routes = RouteSet::new();
    routes.add_route("A", "B", "bus", 2.0, 10.0, "");
    routes.add_route("B", "C", "bus", 3.0, 5.0, "");
    routes.add_route("A", "C", "walk", 10.0, 1.0, "");
    RouteNetwork::build(registry, routes)
}

/// Minimum total weight over every simple path, found by exhaustive search.
#[allow(dead_code)]
pub fn brute_force_cost(
    network: &RouteNetwork,
    start: &str,
    goal: &str,
    metric: Metric,
) -> Option<f64> {
    let registry = network.registry();
    let start = registry.id_by_name(start)?;
    let goal = registry.id_by_name(goal)?;

    let mut visited = vec![false; registry.len()];
    let mut best: Option<f64> = None;
    let mut stack = vec![(start, 0.0_f64, 0_usize)];
    let mut trail: Vec<LocationId> = Vec::new();

    // Iterative DFS; `depth` lets the trail unwind to the right ancestor.
    while let Some((node, cost, depth)) = stack.pop() {
        while trail.len() > depth {
            if let Some(left) = trail.pop() {
                visited[left.index()] = false;
            }
        }
        if node == goal {
            best = Some(best.map_or(cost, |b: f64| b.min(cost)));
            continue;
        }
        visited[node.index()] = true;
        trail.push(node);
        for edge in network.neighbours(node) {
            if !visited[edge.target.index()] {
                stack.push((edge.target, cost + edge.weight(metric), depth + 1));
            }
        }
    }
    best
}
