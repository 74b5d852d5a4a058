//! Compare command handler: the same query under both strategies.

use anyhow::{Context, Result};
use tracing::warn;
use tripgraph_lib::{ComparisonSummary, SearchEngine};

use crate::args::NetworkArgs;
use crate::output::emit;

/// Handle the compare subcommand.
pub fn handle_compare_command(args: &NetworkArgs) -> Result<()> {
    let options = args.search_options()?;
    let loaded = super::load(args)?;
    let metric = args.metric.into();

    let engine = SearchEngine::with_options(&loaded.network, options);
    let comparison = engine.compare(&args.from, &args.to, metric)?;
    let summary = ComparisonSummary::from_comparison(&comparison);

    if !summary.same_cost && !options.heuristic.is_admissible_for(metric) {
        warn!(
            %metric,
            "heuristic is not admissible for this metric; its route may be suboptimal"
        );
    }

    let report = summary
        .render(args.format.into())
        .context("failed to render comparison report")?;
    emit(&report, args.output.as_deref())
}
