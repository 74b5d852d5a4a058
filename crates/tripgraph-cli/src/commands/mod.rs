// Handlers for CLI subcommands. main.rs dispatches to these.

pub mod cities;
pub mod compare;
pub mod route;

use anyhow::{Context, Result};
use tracing::info;
use tripgraph_lib::{load_network, LoadedNetwork};

use crate::args::NetworkArgs;

/// Load and resolve the network named by the input flags.
pub(crate) fn load(args: &NetworkArgs) -> Result<LoadedNetwork> {
    let loaded = load_network(&args.cities, &args.routes, args.loader_options())
        .with_context(|| {
            format!(
                "failed to load network from {} and {}",
                args.cities.display(),
                args.routes.display()
            )
        })?;

    info!(
        locations = loaded.report.locations,
        routes = loaded.report.routes,
        skipped_rows = loaded.report.skipped_rows,
        dropped_routes = loaded.network.dropped_routes(),
        "network loaded"
    );
    Ok(loaded)
}
