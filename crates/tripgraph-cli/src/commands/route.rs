//! Route command handler: one least-cost query, one rendered report.

use anyhow::{Context, Result};
use tracing::debug;
use tripgraph_lib::{RouteSummary, SearchEngine};

use crate::args::{NetworkArgs, StrategyArg};
use crate::output::emit;

/// Handle the route subcommand.
pub fn handle_route_command(args: &NetworkArgs, strategy: StrategyArg) -> Result<()> {
    let options = args.search_options()?;
    let loaded = super::load(args)?;

    let engine = SearchEngine::with_options(&loaded.network, options);
    let path = engine.run(&args.from, &args.to, args.metric.into(), strategy.into())?;
    debug!(
        hops = path.hop_count(),
        total = path.total_cost(),
        nodes_visited = path.stats.nodes_visited,
        "route found"
    );

    let report = RouteSummary::from_path(&path)?
        .render(args.format.into())
        .context("failed to render route report")?;
    emit(&report, args.output.as_deref())
}
