//! Tripgraph library entry points.
//!
//! This crate loads cities and the routes between them, resolves them into a
//! [`RouteNetwork`], and finds least-cost paths by travel time, monetary cost
//! or great-circle distance. Searches run either uninformed (Dijkstra) or
//! guided by a haversine estimate (A*). Higher-level consumers such as the CLI
//! should only depend on the items exported here.

#![deny(warnings)]

pub mod error;
pub mod frontier;
pub mod geo;
pub mod graph;
pub mod loader;
pub mod output;
pub mod path;
pub mod registry;
pub mod routes;
pub mod search;

pub use error::{Error, Result};
pub use frontier::{FrontierEmpty, PriorityFrontier};
pub use geo::{haversine, GeoPoint, EARTH_RADIUS_KM};
pub use graph::{DropReason, DroppedRoute, Edge, Metric, RouteNetwork};
pub use loader::{load_locations, load_network, LoadReport, LoadedNetwork, LoaderOptions};
pub use output::{CityEntry, CityListing, ComparisonSummary, RenderMode, RouteSummary};
pub use path::{Path, PathStop, PathTotals, SearchStats, Segment};
pub use registry::{DuplicatePolicy, Location, LocationId, LocationRegistry};
pub use routes::{Route, RouteIndex, RouteSet};
pub use search::{Comparison, HeuristicPolicy, SearchEngine, SearchOptions, Strategy};
