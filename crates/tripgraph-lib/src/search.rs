//! Least-cost search over a [`RouteNetwork`].
//!
//! One engine covers both uniform-cost expansion and heuristic (A*) expansion;
//! the two only differ in the estimate added to a node's frontier priority.
//!
//! Per run, each location is Unseen, Open (one or more live frontier entries)
//! or Closed (settled). A cheaper discovery of an Open location pushes a new
//! entry rather than updating the old one; the stale entry is dropped when it
//! is popped after its location has been closed. This relies on non-negative
//! edge weights, which [`RouteNetwork::build`] enforces.

use std::fmt;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, debug_span, trace};

use crate::error::{Error, Result};
use crate::frontier::PriorityFrontier;
use crate::graph::{Metric, RouteNetwork};
use crate::path::{reconstruct, NodeArena, NodeIndex, Path, SearchStats};
use crate::registry::LocationId;

/// Number of alternative names offered when a location is unknown.
const MAX_SUGGESTIONS: usize = 3;

/// How the frontier is ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Uniform-cost (Dijkstra) expansion ordered by cost so far.
    Uninformed,
    /// A* expansion ordered by cost so far plus great-circle estimate.
    #[default]
    Heuristic,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            Strategy::Uninformed => "uninformed",
            Strategy::Heuristic => "heuristic",
        };
        f.write_str(value)
    }
}

/// When and how the great-circle estimate is applied in heuristic mode.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum HeuristicPolicy {
    /// Raw kilometres regardless of metric. Only admissible for
    /// [`Metric::Distance`]; other metrics may yield a suboptimal path.
    #[default]
    Always,
    /// Kilometres for [`Metric::Distance`], zero for every other metric.
    DistanceOnly,
    /// Kilometres multiplied by `factor` for every metric. A factor of
    /// `1 / top_speed_kmh` keeps the estimate admissible for [`Metric::Time`].
    /// Negative or non-finite factors are treated as zero.
    Scaled { factor: f64 },
}

impl HeuristicPolicy {
    /// Multiplier applied to the great-circle distance for `metric`.
    ///
    /// Always finite and non-negative, so the estimate stays consistent
    /// whenever it is admissible.
    pub fn factor(self, metric: Metric) -> f64 {
        match self {
            HeuristicPolicy::Always => 1.0,
            HeuristicPolicy::DistanceOnly if metric == Metric::Distance => 1.0,
            HeuristicPolicy::DistanceOnly => 0.0,
            HeuristicPolicy::Scaled { factor } if factor.is_finite() && factor > 0.0 => factor,
            HeuristicPolicy::Scaled { .. } => 0.0,
        }
    }

    /// Whether optimality is guaranteed for `metric` under this policy.
    ///
    /// A zero effective factor degrades to uninformed search and is always
    /// admissible. Otherwise only [`Metric::Distance`] with a factor of at most
    /// one qualifies; edge distances are never shorter than the great circle
    /// between their endpoints (see [`RouteNetwork::build`]). For time and cost
    /// admissibility depends on data the engine cannot see.
    pub fn is_admissible_for(self, metric: Metric) -> bool {
        let factor = self.factor(metric);
        factor == 0.0 || (metric == Metric::Distance && factor <= 1.0)
    }
}

/// Run-wide knobs for [`SearchEngine`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SearchOptions {
    pub heuristic: HeuristicPolicy,
}

/// Both strategies' answers to the same query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub uninformed: Path,
    pub heuristic: Path,
}

impl Comparison {
    /// Whether both strategies found a path of the same total cost.
    pub fn same_cost(&self, tolerance: f64) -> bool {
        (self.uninformed.total_cost() - self.heuristic.total_cost()).abs() <= tolerance
    }

    /// Visits avoided by the heuristic run; negative when it visited more.
    pub fn visits_saved(&self) -> i64 {
        self.uninformed.stats.nodes_visited as i64 - self.heuristic.stats.nodes_visited as i64
    }
}

/// Stateless search driver; every call to [`run`](Self::run) owns its own
/// frontier, closed set and node arena.
#[derive(Debug, Clone, Copy)]
pub struct SearchEngine<'a> {
    network: &'a RouteNetwork,
    options: SearchOptions,
}

impl<'a> SearchEngine<'a> {
    pub fn new(network: &'a RouteNetwork) -> Self {
        Self::with_options(network, SearchOptions::default())
    }

    pub fn with_options(network: &'a RouteNetwork, options: SearchOptions) -> Self {
        Self { network, options }
    }

    pub fn options(&self) -> SearchOptions {
        self.options
    }

    /// Find the least-cost path from `start` to `goal` under `metric`.
    ///
    /// Unknown names fail before any search state is allocated. An exhausted
    /// frontier yields [`Error::NoPathExists`].
    pub fn run(
        &self,
        start: &str,
        goal: &str,
        metric: Metric,
        strategy: Strategy,
    ) -> Result<Path> {
        let started = Instant::now();
        let registry = self.network.registry();
        let start_id = registry
            .id_by_name(start)
            .ok_or_else(|| Error::StartNotFound {
                name: start.to_string(),
                suggestions: registry.fuzzy_matches(start, MAX_SUGGESTIONS),
            })?;
        let goal_id = registry
            .id_by_name(goal)
            .ok_or_else(|| Error::GoalNotFound {
                name: goal.to_string(),
                suggestions: registry.fuzzy_matches(goal, MAX_SUGGESTIONS),
            })?;

        let span = debug_span!("search", %start, %goal, %metric, %strategy);
        let _guard = span.enter();

        let factor = self.estimate_factor(metric, strategy);
        let mut run = Run::new(self.network, goal_id, metric, factor)?;
        let outcome = run.execute(start_id);
        let mut stats = run.stats;
        stats.nodes_created = run.arena.len();
        stats.elapsed = started.elapsed();

        debug!(
            nodes_visited = stats.nodes_visited,
            stale_discarded = stats.stale_discarded,
            nodes_created = stats.nodes_created,
            frontier_pushes = run.frontier.pushed(),
            elapsed_us = stats.elapsed.as_micros() as u64,
            found = matches!(outcome, Ok(Some(_))),
            "search finished"
        );

        match outcome? {
            Some(terminal) => {
                let steps = reconstruct(&run.arena, terminal);
                Path::from_steps(self.network, &steps, metric, strategy, stats)
            }
            None => Err(Error::NoPathExists {
                start: start.to_string(),
                goal: goal.to_string(),
            }),
        }
    }

    /// Run the same query with both strategies.
    pub fn compare(&self, start: &str, goal: &str, metric: Metric) -> Result<Comparison> {
        let uninformed = self.run(start, goal, metric, Strategy::Uninformed)?;
        let heuristic = self.run(start, goal, metric, Strategy::Heuristic)?;
        Ok(Comparison {
            uninformed,
            heuristic,
        })
    }

    fn estimate_factor(&self, metric: Metric, strategy: Strategy) -> f64 {
        match strategy {
            Strategy::Uninformed => 0.0,
            Strategy::Heuristic => self.options.heuristic.factor(metric),
        }
    }
}

/// Working set of a single search invocation.
struct Run<'a> {
    network: &'a RouteNetwork,
    goal: LocationId,
    metric: Metric,
    factor: f64,
    frontier: PriorityFrontier<NodeIndex>,
    arena: NodeArena,
    /// Settled node per location; `Some` means Closed.
    closed: Vec<Option<NodeIndex>>,
    stats: SearchStats,
}

impl<'a> Run<'a> {
    fn new(
        network: &'a RouteNetwork,
        goal: LocationId,
        metric: Metric,
        factor: f64,
    ) -> Result<Self> {
        let len = network.registry().len();
        let mut closed = Vec::new();
        closed
            .try_reserve_exact(len)
            .map_err(|_| Error::ResourceExhausted {
                context: "closed set",
            })?;
        closed.resize(len, None);

        Ok(Self {
            network,
            goal,
            metric,
            factor,
            frontier: PriorityFrontier::new(),
            arena: NodeArena::new(),
            closed,
            stats: SearchStats::default(),
        })
    }

    fn estimate(&self, location: LocationId) -> f64 {
        if self.factor == 0.0 {
            return 0.0;
        }
        match (self.network.location(location), self.network.location(self.goal)) {
            (Some(from), Some(to)) => self.factor * from.position.distance_to(&to.position),
            _ => 0.0,
        }
    }

    fn is_closed(&self, location: LocationId) -> bool {
        matches!(self.closed.get(location.index()), Some(Some(_)))
    }

    /// Drive the frontier until the goal is settled or nothing is left.
    fn execute(&mut self, start: LocationId) -> Result<Option<NodeIndex>> {
        let h = self.estimate(start);
        let root = self.arena.push_root(start, h, h)?;
        self.frontier.push(root, h)?;

        while let Ok(index) = self.frontier.pop_min() {
            let Some(node) = self.arena.get(index) else {
                continue;
            };
            let location = node.location;
            let g = node.g;

            if self.is_closed(location) {
                self.stats.stale_discarded += 1;
                continue;
            }
            self.closed[location.index()] = Some(index);
            self.stats.nodes_visited += 1;

            if location == self.goal {
                return Ok(Some(index));
            }

            self.expand(index, location, g)?;
        }

        Ok(None)
    }

    fn expand(&mut self, parent: NodeIndex, location: LocationId, g: f64) -> Result<()> {
        let network = self.network;
        for edge in network.neighbours(location) {
            if self.is_closed(edge.target) {
                continue;
            }
            let tentative_g = g + edge.weight(self.metric);
            let h = self.estimate(edge.target);
            let f = tentative_g + h;
            let child = self.arena.push_child(parent, edge, tentative_g, h, f)?;
            trace!(
                from = %location,
                to = %edge.target,
                g = tentative_g,
                f,
                open = self.frontier.len(),
                "push"
            );
            self.frontier.push(child, f)?;
        }
        Ok(())
    }
}
