//! CSV ingestion for cities and routes.
//!
//! Cities are read as `country,city,latitude,longitude` and routes as
//! `origin,destination,transport,time,cost[,note[,distance_km]]`. Columns are positional;
//! a header row, when present, only has to be wide enough. Rows that cannot be
//! used are skipped with a warning and counted in the [`LoadReport`].

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::graph::RouteNetwork;
use crate::registry::{DuplicatePolicy, LocationRegistry};
use crate::routes::{Route, RouteSet};

const CITY_COLUMNS: usize = 4;
const ROUTE_COLUMNS: usize = 5;

/// Options controlling how input files are parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoaderOptions {
    /// Treat the first row of each file as a header.
    pub has_headers: bool,
    /// Policy applied to repeated city names.
    pub duplicates: DuplicatePolicy,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            has_headers: true,
            duplicates: DuplicatePolicy::Reject,
        }
    }
}

/// Row counts gathered while loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct LoadReport {
    pub locations: usize,
    pub routes: usize,
    pub skipped_rows: usize,
}

/// A resolved network together with its load statistics.
#[derive(Debug, Clone)]
pub struct LoadedNetwork {
    pub network: RouteNetwork,
    pub report: LoadReport,
}

/// Load a cities file and a routes file and resolve them into a network.
pub fn load_network(
    cities_path: &Path,
    routes_path: &Path,
    options: LoaderOptions,
) -> Result<LoadedNetwork> {
    let mut report = LoadReport::default();

    let routes = read_routes(File::open(routes_path)?, options, &mut report)?;
    debug!(path = %routes_path.display(), routes = report.routes, "routes parsed");

    let registry = read_locations(File::open(cities_path)?, options, &mut report)?;
    debug!(path = %cities_path.display(), locations = report.locations, "cities parsed");

    let network = RouteNetwork::build(registry, routes);
    Ok(LoadedNetwork { network, report })
}

/// Load only a cities file, for listing locations without any routes.
pub fn load_locations(
    cities_path: &Path,
    options: LoaderOptions,
) -> Result<(LocationRegistry, LoadReport)> {
    let mut report = LoadReport::default();
    let registry = read_locations(File::open(cities_path)?, options, &mut report)?;
    debug!(path = %cities_path.display(), locations = report.locations, "cities parsed");
    Ok((registry, report))
}

/// Parse cities into a fresh registry.
pub fn read_locations<R: Read>(
    reader: R,
    options: LoaderOptions,
    report: &mut LoadReport,
) -> Result<LocationRegistry> {
    let mut csv_reader = reader_for(reader, options);
    check_headers(&mut csv_reader, options, CITY_COLUMNS, "cities")?;

    let mut registry = LocationRegistry::with_policy(options.duplicates);
    for_each_record(&mut csv_reader, report, |record, line, report| {
        let Some(row) = parse_city(record) else {
            warn!(line, "skipping malformed city row");
            report.skipped_rows += 1;
            return;
        };
        match registry.add_location(row.name, row.country, row.lat, row.lon) {
            Ok(_) => report.locations += 1,
            Err(err) => {
                warn!(line, %err, "skipping city row");
                report.skipped_rows += 1;
            }
        }
    })?;

    Ok(registry)
}

/// Parse routes into a fresh route set.
pub fn read_routes<R: Read>(
    reader: R,
    options: LoaderOptions,
    report: &mut LoadReport,
) -> Result<RouteSet> {
    let mut csv_reader = reader_for(reader, options);
    check_headers(&mut csv_reader, options, ROUTE_COLUMNS, "routes")?;

    let mut routes = RouteSet::new();
    for_each_record(&mut csv_reader, report, |record, line, report| {
        match parse_route(record) {
            Some(route) => {
                routes.push(route);
                report.routes += 1;
            }
            None => {
                warn!(line, "skipping malformed route row");
                report.skipped_rows += 1;
            }
        }
    })?;

    Ok(routes)
}

fn reader_for<R: Read>(reader: R, options: LoaderOptions) -> csv::Reader<R> {
    ReaderBuilder::new()
        .has_headers(options.has_headers)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader)
}

fn check_headers<R: Read>(
    csv_reader: &mut csv::Reader<R>,
    options: LoaderOptions,
    required: usize,
    file: &str,
) -> Result<()> {
    if !options.has_headers {
        return Ok(());
    }
    let headers = csv_reader.headers()?;
    // An empty file has no header row; it simply yields no records.
    if !headers.is_empty() && headers.len() < required {
        return Err(Error::InvalidRecord {
            line: 1,
            message: format!(
                "{file} header has {} columns, expected at least {required}",
                headers.len()
            ),
        });
    }
    Ok(())
}

fn for_each_record<R: Read>(
    csv_reader: &mut csv::Reader<R>,
    report: &mut LoadReport,
    mut visit: impl FnMut(&StringRecord, u64, &mut LoadReport),
) -> Result<()> {
    for result in csv_reader.records() {
        match result {
            Ok(record) => {
                let line = record.position().map(|pos| pos.line()).unwrap_or(0);
                visit(&record, line, report);
            }
            Err(err) if err.is_io_error() => return Err(err.into()),
            Err(err) => {
                warn!(%err, "skipping unreadable row");
                report.skipped_rows += 1;
            }
        }
    }
    Ok(())
}

struct CityRow<'r> {
    country: &'r str,
    name: &'r str,
    lat: f64,
    lon: f64,
}

fn parse_city(record: &StringRecord) -> Option<CityRow<'_>> {
    if record.len() < CITY_COLUMNS {
        return None;
    }
    let country = record.get(0)?;
    let name = record.get(1)?;
    let lat: f64 = record.get(2)?.parse().ok()?;
    let lon: f64 = record.get(3)?.parse().ok()?;

    if name.is_empty() || !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return None;
    }

    Some(CityRow {
        country,
        name,
        lat,
        lon,
    })
}

fn parse_route(record: &StringRecord) -> Option<Route> {
    if record.len() < ROUTE_COLUMNS {
        return None;
    }
    let origin = record.get(0)?;
    let destination = record.get(1)?;
    let transport = record.get(2)?;
    let time: f64 = record.get(3)?.parse().ok()?;
    let cost: f64 = record.get(4)?.parse().ok()?;
    let note = record.get(5).unwrap_or_default();
    let distance_km: Option<f64> = match record.get(6) {
        None | Some("") => None,
        Some(raw) => Some(raw.parse().ok()?),
    };

    if origin.is_empty() || destination.is_empty() {
        return None;
    }
    if !(time.is_finite() && cost.is_finite() && time >= 0.0 && cost >= 0.0) {
        return None;
    }

    if distance_km.is_some_and(|d| !(d.is_finite() && d >= 0.0)) {
        return None;
    }

    let route = Route::new(origin, destination, transport, time, cost, note);
    Some(match distance_km {
        Some(distance) => route.with_distance(distance),
        None => route,
    })
}
