use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use tripgraph_cli::args::{CitiesArgs, NetworkArgs, StrategyArg};
use tripgraph_cli::commands::cities::handle_cities_command;
use tripgraph_cli::commands::compare::handle_compare_command;
use tripgraph_cli::commands::route::handle_route_command;

#[derive(Parser, Debug)]
#[command(author, version, about = "Least-cost trip planning over city route graphs")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Find the least-cost route between two cities.
    Route {
        #[command(flatten)]
        network: NetworkArgs,

        #[arg(long, value_enum, default_value_t = StrategyArg::default())]
        strategy: StrategyArg,
    },
    /// Run the same query uninformed and heuristic and compare the results.
    Compare {
        #[command(flatten)]
        network: NetworkArgs,
    },
    /// List the cities a cities file loads to.
    Cities {
        #[command(flatten)]
        cities: CitiesArgs,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Route { network, strategy } => handle_route_command(&network, strategy),
        Command::Compare { network } => handle_compare_command(&network),
        Command::Cities { cities } => handle_cities_command(&cities),
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
