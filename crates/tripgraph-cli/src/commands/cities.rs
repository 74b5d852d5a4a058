//! Cities command handler: list what the cities file loads to.

use anyhow::{Context, Result};
use tracing::info;
use tripgraph_lib::{load_locations, CityListing};

use crate::args::CitiesArgs;
use crate::output::emit;

/// Handle the cities subcommand.
pub fn handle_cities_command(args: &CitiesArgs) -> Result<()> {
    let (registry, report) = load_locations(&args.cities, args.loader_options())
        .with_context(|| format!("failed to load cities from {}", args.cities.display()))?;
    info!(
        locations = report.locations,
        skipped_rows = report.skipped_rows,
        "cities loaded"
    );

    let listing = CityListing::from_registry(&registry, &report);
    let rendered = listing
        .render(args.format.into())
        .context("failed to render city listing")?;
    emit(&rendered, args.output.as_deref())
}
