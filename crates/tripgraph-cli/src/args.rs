//! Command-line argument types and their mapping onto library options.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Args, ValueEnum};
use tripgraph_lib::{
    DuplicatePolicy, HeuristicPolicy, LoaderOptions, Metric, RenderMode, SearchOptions, Strategy,
};

/// Edge weight to minimise.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum MetricArg {
    /// Travel time in hours
    #[default]
    Time,
    /// Ticket cost
    Cost,
    /// Great-circle distance in kilometres
    Distance,
}

impl From<MetricArg> for Metric {
    fn from(value: MetricArg) -> Self {
        match value {
            MetricArg::Time => Metric::Time,
            MetricArg::Cost => Metric::Cost,
            MetricArg::Distance => Metric::Distance,
        }
    }
}

/// Search strategy.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    /// Dijkstra: expand by cost so far
    Uninformed,
    /// A*: expand by cost so far plus great-circle estimate
    #[default]
    Heuristic,
}

impl From<StrategyArg> for Strategy {
    fn from(value: StrategyArg) -> Self {
        match value {
            StrategyArg::Uninformed => Strategy::Uninformed,
            StrategyArg::Heuristic => Strategy::Heuristic,
        }
    }
}

/// How the great-circle estimate is applied.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum HeuristicArg {
    /// Raw kilometres for every metric
    #[default]
    Always,
    /// Kilometres for distance, zero otherwise
    DistanceOnly,
    /// Kilometres times --heuristic-factor
    Scaled,
}

/// What to do with a repeated city name.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum DuplicatesArg {
    /// Keep the first row, skip later ones
    #[default]
    Reject,
    /// Let later rows replace earlier ones
    Overwrite,
}

impl From<DuplicatesArg> for DuplicatePolicy {
    fn from(value: DuplicatesArg) -> Self {
        match value {
            DuplicatesArg::Reject => DuplicatePolicy::Reject,
            DuplicatesArg::Overwrite => DuplicatePolicy::Overwrite,
        }
    }
}

/// Report format written to stdout or `--output`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    #[default]
    Text,
    Json,
    Html,
}

impl From<FormatArg> for RenderMode {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Text => RenderMode::PlainText,
            FormatArg::Json => RenderMode::Json,
            FormatArg::Html => RenderMode::Html,
        }
    }
}

/// Inputs, query and presentation flags shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct NetworkArgs {
    /// Cities CSV: country,city,latitude,longitude
    #[arg(long)]
    pub cities: PathBuf,

    /// Routes CSV: origin,destination,transport,time,cost[,note[,distance_km]]
    #[arg(long)]
    pub routes: PathBuf,

    /// Starting city name.
    #[arg(long = "from")]
    pub from: String,

    /// Destination city name.
    #[arg(long = "to")]
    pub to: String,

    #[arg(long, value_enum, default_value_t = MetricArg::default())]
    pub metric: MetricArg,

    #[arg(long, value_enum, default_value_t = HeuristicArg::default())]
    pub heuristic: HeuristicArg,

    /// Multiplier for `--heuristic scaled`, e.g. 1/max_speed_kmh for time.
    #[arg(long)]
    pub heuristic_factor: Option<f64>,

    #[arg(long, value_enum, default_value_t = DuplicatesArg::default())]
    pub duplicates: DuplicatesArg,

    /// Input files have no header row.
    #[arg(long)]
    pub no_headers: bool,

    #[arg(long, value_enum, default_value_t = FormatArg::default())]
    pub format: FormatArg,

    /// Write the report to this file instead of stdout.
    #[arg(long)]
    pub output: Option<PathBuf>,
}

/// Flags for listing the cities file on its own.
#[derive(Args, Debug, Clone)]
pub struct CitiesArgs {
    /// Cities CSV: country,city,latitude,longitude
    #[arg(long)]
    pub cities: PathBuf,

    #[arg(long, value_enum, default_value_t = DuplicatesArg::default())]
    pub duplicates: DuplicatesArg,

    /// Input file has no header row.
    #[arg(long)]
    pub no_headers: bool,

    #[arg(long, value_enum, default_value_t = FormatArg::default())]
    pub format: FormatArg,

    /// Write the listing to this file instead of stdout.
    #[arg(long)]
    pub output: Option<PathBuf>,
}

impl CitiesArgs {
    pub fn loader_options(&self) -> LoaderOptions {
        LoaderOptions {
            has_headers: !self.no_headers,
            duplicates: self.duplicates.into(),
        }
    }
}

impl NetworkArgs {
    pub fn loader_options(&self) -> LoaderOptions {
        LoaderOptions {
            has_headers: !self.no_headers,
            duplicates: self.duplicates.into(),
        }
    }

    pub fn search_options(&self) -> Result<SearchOptions> {
        let heuristic = match (self.heuristic, self.heuristic_factor) {
            (HeuristicArg::Scaled, Some(factor)) if factor.is_finite() && factor >= 0.0 => {
                HeuristicPolicy::Scaled { factor }
            }
            (HeuristicArg::Scaled, Some(factor)) => {
                bail!("--heuristic-factor must be a non-negative number, got {factor}")
            }
            (HeuristicArg::Scaled, None) => {
                bail!("--heuristic-factor is required with --heuristic scaled")
            }
            (_, Some(_)) => bail!("--heuristic-factor only applies to --heuristic scaled"),
            (HeuristicArg::Always, None) => HeuristicPolicy::Always,
            (HeuristicArg::DistanceOnly, None) => HeuristicPolicy::DistanceOnly,
        };
        Ok(SearchOptions { heuristic })
    }
}
