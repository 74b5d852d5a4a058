use std::fmt::Write;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::graph::Metric;
use crate::loader::LoadReport;
use crate::path::{Path, PathTotals};
use crate::registry::LocationRegistry;
use crate::search::{Comparison, Strategy};

/// Presentation style for turning a summary into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    #[default]
    PlainText,
    Json,
    Html,
}

/// Leg that brought the traveller to a step.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RouteLeg {
    pub transport: String,
    pub time: f64,
    pub cost: f64,
    pub distance_km: f64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub note: String,
}

/// Stop visited along a path.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RouteStep {
    pub index: usize,
    pub name: String,
    pub country: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leg: Option<RouteLeg>,
}

/// Structured representation of a solved path that consumers can serialise.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RouteSummary {
    pub metric: Metric,
    pub strategy: Strategy,
    pub hops: usize,
    pub total: f64,
    pub totals: PathTotals,
    pub nodes_visited: usize,
    pub elapsed_ms: f64,
    pub steps: Vec<RouteStep>,
}

impl RouteSummary {
    /// Convert a [`Path`] into a summary with owned, display-ready fields.
    pub fn from_path(path: &Path) -> Result<Self> {
        if path.stops.is_empty() {
            return Err(Error::EmptyPath);
        }

        let steps = path
            .stops
            .iter()
            .enumerate()
            .map(|(index, stop)| RouteStep {
                index,
                name: stop.location.name.clone(),
                country: stop.location.country.clone(),
                lat: stop.location.position.lat,
                lon: stop.location.position.lon,
                leg: stop.incoming.as_ref().map(|segment| RouteLeg {
                    transport: segment.route.transport.clone(),
                    time: segment.time,
                    cost: segment.cost,
                    distance_km: segment.distance_km,
                    note: segment.route.note.clone(),
                }),
            })
            .collect();

        Ok(Self {
            metric: path.metric,
            strategy: path.strategy,
            hops: path.hop_count(),
            total: path.total_cost(),
            totals: path.totals,
            nodes_visited: path.stats.nodes_visited,
            elapsed_ms: path.stats.elapsed.as_secs_f64() * 1000.0,
            steps,
        })
    }

    fn start_name(&self) -> &str {
        self.steps.first().map_or("<unknown>", |step| step.name.as_str())
    }

    fn goal_name(&self) -> &str {
        self.steps.last().map_or("<unknown>", |step| step.name.as_str())
    }

    /// Render the summary using the requested mode.
    pub fn render(&self, mode: RenderMode) -> Result<String> {
        match mode {
            RenderMode::PlainText => Ok(self.render_plain()),
            RenderMode::Json => Ok(serde_json::to_string_pretty(self)?),
            RenderMode::Html => Ok(self.render_html()),
        }
    }

    fn render_plain(&self) -> String {
        let mut buffer = String::new();
        let _ = writeln!(
            buffer,
            "Route: {} -> {} ({} hops, metric: {}, strategy: {})",
            self.start_name(),
            self.goal_name(),
            self.hops,
            self.metric,
            self.strategy
        );
        for step in &self.steps {
            match &step.leg {
                None => {
                    let _ = writeln!(
                        buffer,
                        "{:>3}: {} ({})",
                        step.index, step.name, step.country
                    );
                }
                Some(leg) => {
                    let _ = write!(
                        buffer,
                        "{:>3}: {} ({}) via {}, {:.2} h, {:.2} cost, {:.1} km",
                        step.index,
                        step.name,
                        step.country,
                        leg.transport,
                        leg.time,
                        leg.cost,
                        leg.distance_km
                    );
                    if !leg.note.is_empty() {
                        let _ = write!(buffer, " [{}]", leg.note);
                    }
                    buffer.push('\n');
                }
            }
        }
        let _ = writeln!(
            buffer,
            "Totals: {:.2} h, {:.2} cost, {:.1} km",
            self.totals.time, self.totals.cost, self.totals.distance_km
        );
        let _ = writeln!(
            buffer,
            "Visited {} nodes in {:.3} ms",
            self.nodes_visited, self.elapsed_ms
        );
        buffer
    }

    fn render_html(&self) -> String {
        let mut buffer = String::new();
        let title = format!("{} to {}", self.start_name(), self.goal_name());
        let _ = writeln!(buffer, "<!DOCTYPE html>");
        let _ = writeln!(buffer, "<html lang=\"en\">");
        let _ = writeln!(
            buffer,
            "<head><meta charset=\"utf-8\"><title>{}</title></head>",
            escape_html(&title)
        );
        let _ = writeln!(buffer, "<body>");
        let _ = writeln!(buffer, "<h1>{}</h1>", escape_html(&title));

        if let Some(start) = self.steps.first() {
            let _ = writeln!(
                buffer,
                "<div class=\"card start\"><h2>{}</h2><p>{}</p><p>{:.4}, {:.4}</p></div>",
                escape_html(&start.name),
                escape_html(&start.country),
                start.lat,
                start.lon
            );
        }

        for step in &self.steps {
            let Some(leg) = &step.leg else {
                continue;
            };
            let _ = writeln!(buffer, "<div class=\"card leg\">");
            let _ = writeln!(
                buffer,
                "<h3>{}. {} ({})</h3>",
                step.index,
                escape_html(&step.name),
                escape_html(&step.country)
            );
            let _ = writeln!(
                buffer,
                "<p>{} &middot; {:.2} h &middot; {:.2} cost &middot; {:.1} km</p>",
                escape_html(&leg.transport),
                leg.time,
                leg.cost,
                leg.distance_km
            );
            if !leg.note.is_empty() {
                let _ = writeln!(buffer, "<p class=\"note\">{}</p>", escape_html(&leg.note));
            }
            let _ = writeln!(buffer, "</div>");
        }

        let _ = writeln!(
            buffer,
            "<div class=\"summary\"><h2>Summary</h2><ul><li>Distance: {:.1} km</li>\
             <li>Cost: {:.2}</li><li>Time: {:.2} h</li><li>Stops: {}</li></ul></div>",
            self.totals.distance_km,
            self.totals.cost,
            self.totals.time,
            self.steps.len()
        );
        let _ = writeln!(
            buffer,
            "<div class=\"stats\"><h2>Search</h2><ul><li>Strategy: {}</li><li>Metric: {}</li>\
             <li>Nodes visited: {}</li><li>Elapsed: {:.3} ms</li></ul></div>",
            self.strategy, self.metric, self.nodes_visited, self.elapsed_ms
        );
        let _ = writeln!(buffer, "</body>");
        let _ = writeln!(buffer, "</html>");
        buffer
    }
}

/// Side-by-side figures for one strategy in a [`ComparisonSummary`].
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StrategyFigures {
    pub strategy: Strategy,
    pub total: f64,
    pub hops: usize,
    pub nodes_visited: usize,
    pub stops: Vec<String>,
}

impl StrategyFigures {
    fn from_path(path: &Path) -> Self {
        Self {
            strategy: path.strategy,
            total: path.total_cost(),
            hops: path.hop_count(),
            nodes_visited: path.stats.nodes_visited,
            stops: path
                .location_names()
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }
}

/// Serialisable view of a [`Comparison`].
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ComparisonSummary {
    pub metric: Metric,
    pub same_cost: bool,
    pub visits_saved: i64,
    pub uninformed: StrategyFigures,
    pub heuristic: StrategyFigures,
}

impl ComparisonSummary {
    /// Totals closer than this are reported as equal.
    const COST_TOLERANCE: f64 = 1e-9;

    pub fn from_comparison(comparison: &Comparison) -> Self {
        Self {
            metric: comparison.uninformed.metric,
            same_cost: comparison.same_cost(Self::COST_TOLERANCE),
            visits_saved: comparison.visits_saved(),
            uninformed: StrategyFigures::from_path(&comparison.uninformed),
            heuristic: StrategyFigures::from_path(&comparison.heuristic),
        }
    }

    pub fn render(&self, mode: RenderMode) -> Result<String> {
        match mode {
            RenderMode::Json => Ok(serde_json::to_string_pretty(self)?),
            RenderMode::PlainText => Ok(self.render_plain()),
            RenderMode::Html => Ok(self.render_html()),
        }
    }

    fn render_plain(&self) -> String {
        let mut buffer = String::new();
        let _ = writeln!(buffer, "Comparison (metric: {})", self.metric);
        for figures in [&self.uninformed, &self.heuristic] {
            let _ = writeln!(
                buffer,
                "{}: total {:.2}, {} hops, {} nodes visited: {}",
                figures.strategy,
                figures.total,
                figures.hops,
                figures.nodes_visited,
                figures.stops.join(" -> ")
            );
        }
        let verdict = if self.same_cost { "same" } else { "different" };
        let _ = writeln!(
            buffer,
            "Totals are {verdict}; heuristic saved {} visits",
            self.visits_saved
        );
        buffer
    }

    fn render_html(&self) -> String {
        let mut buffer = String::new();
        let _ = writeln!(buffer, "<!DOCTYPE html>");
        let _ = writeln!(
            buffer,
            "<html lang=\"en\"><head><meta charset=\"utf-8\"><title>Comparison</title></head>"
        );
        let _ = writeln!(buffer, "<body><h1>Comparison by {}</h1>", self.metric);
        let _ = writeln!(
            buffer,
            "<table><tr><th>Strategy</th><th>Total</th><th>Hops</th>\
             <th>Nodes visited</th><th>Stops</th></tr>"
        );
        for figures in [&self.uninformed, &self.heuristic] {
            let _ = writeln!(
                buffer,
                "<tr><td>{}</td><td>{:.2}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                figures.strategy,
                figures.total,
                figures.hops,
                figures.nodes_visited,
                escape_html(&figures.stops.join(" -> "))
            );
        }
        let _ = writeln!(buffer, "</table></body></html>");
        buffer
    }
}

/// One row of a [`CityListing`].
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CityEntry {
    pub name: String,
    pub country: String,
    pub lat: f64,
    pub lon: f64,
}

/// Every loaded city in registry order, with the load counts.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CityListing {
    pub count: usize,
    pub skipped_rows: usize,
    pub cities: Vec<CityEntry>,
}

impl CityListing {
    pub fn from_registry(registry: &LocationRegistry, report: &LoadReport) -> Self {
        let cities: Vec<CityEntry> = registry
            .iter()
            .map(|(_, location)| CityEntry {
                name: location.name.clone(),
                country: location.country.clone(),
                lat: location.position.lat,
                lon: location.position.lon,
            })
            .collect();
        Self {
            count: cities.len(),
            skipped_rows: report.skipped_rows,
            cities,
        }
    }

    pub fn render(&self, mode: RenderMode) -> Result<String> {
        match mode {
            RenderMode::Json => Ok(serde_json::to_string_pretty(self)?),
            RenderMode::PlainText => Ok(self.render_plain()),
            RenderMode::Html => Ok(self.render_html()),
        }
    }

    fn render_plain(&self) -> String {
        let mut buffer = String::new();
        let _ = writeln!(
            buffer,
            "Cities: {} ({} rows skipped)",
            self.count, self.skipped_rows
        );
        for city in &self.cities {
            let _ = writeln!(
                buffer,
                "  {} ({}) {:.4}, {:.4}",
                city.name, city.country, city.lat, city.lon
            );
        }
        buffer
    }

    fn render_html(&self) -> String {
        let mut buffer = String::new();
        let _ = writeln!(buffer, "<!DOCTYPE html>");
        let _ = writeln!(
            buffer,
            "<html lang=\"en\"><head><meta charset=\"utf-8\"><title>Cities</title></head>"
        );
        let _ = writeln!(buffer, "<body><h1>{} cities</h1>", self.count);
        let _ = writeln!(
            buffer,
            "<table><tr><th>City</th><th>Country</th><th>Latitude</th><th>Longitude</th></tr>"
        );
        for city in &self.cities {
            let _ = writeln!(
                buffer,
                "<tr><td>{}</td><td>{}</td><td>{:.4}</td><td>{:.4}</td></tr>",
                escape_html(&city.name),
                escape_html(&city.country),
                city.lat,
                city.lon
            );
        }
        let _ = writeln!(buffer, "</table></body></html>");
        buffer
    }
}

/// Escape text for inclusion in HTML element content or attribute values.
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::RouteNetwork;
    use crate::registry::LocationRegistry;
    use crate::routes::RouteSet;
    use crate::search::SearchEngine;

    fn network() -> RouteNetwork {
        let mut registry = LocationRegistry::new();
        registry.add_location("Lyon", "France", 45.764, 4.8357).unwrap();
        registry.add_location("Turin", "Italy", 45.0703, 7.6869).unwrap();
        registry.add_location("Milan", "Italy", 45.4642, 9.19).unwrap();
        let mut routes = RouteSet::new();
        routes.add_route("Lyon", "Turin", "train", 4.0, 40.0, "via <Fréjus> & tunnel");
        routes.add_route("Turin", "Milan", "train", 1.0, 12.0, "");
        RouteNetwork::build(registry, routes)
    }

    fn summary() -> RouteSummary {
        let network = network();
        let path = SearchEngine::new(&network)
            .run("Lyon", "Milan", Metric::Time, Strategy::Uninformed)
            .unwrap();
        RouteSummary::from_path(&path).unwrap()
    }

    #[test]
    fn summary_carries_steps_and_totals() {
        let summary = summary();
        assert_eq!(summary.hops, 2);
        assert_eq!(summary.total, 5.0);
        assert_eq!(summary.totals.cost, 52.0);
        assert!(summary.steps[0].leg.is_none());
        assert_eq!(summary.steps[1].leg.as_ref().unwrap().transport, "train");
    }

    #[test]
    fn plain_text_lists_every_stop() {
        let text = summary().render(RenderMode::PlainText).unwrap();
        assert!(text.starts_with("Route: Lyon -> Milan (2 hops, metric: time"));
        assert!(text.contains("  1: Turin (Italy) via train"));
        assert!(text.contains("Totals: 5.00 h, 52.00 cost"));
    }

    #[test]
    fn json_is_structured() {
        let json = summary().render(RenderMode::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["metric"], "time");
        assert_eq!(value["strategy"], "uninformed");
        assert_eq!(value["steps"][2]["name"], "Milan");
        assert!(value["steps"][0].get("leg").is_none());
    }

    #[test]
    fn html_escapes_user_text() {
        let html = summary().render(RenderMode::Html).unwrap();
        assert!(html.contains("via &lt;Fréjus&gt; &amp; tunnel"));
        assert!(!html.contains("<Fréjus>"));
        assert!(html.contains("class=\"card start\""));
        assert_eq!(html.matches("class=\"card leg\"").count(), 2);
    }

    #[test]
    fn comparison_reports_both_strategies() {
        let network = network();
        let comparison = SearchEngine::new(&network)
            .compare("Lyon", "Milan", Metric::Cost)
            .unwrap();
        let summary = ComparisonSummary::from_comparison(&comparison);
        assert!(summary.same_cost);
        assert_eq!(summary.uninformed.stops, vec!["Lyon", "Turin", "Milan"]);

        let text = summary.render(RenderMode::PlainText).unwrap();
        assert!(text.contains("uninformed: total 52.00"));
    }

    #[test]
    fn city_listing_keeps_registry_order() {
        let network = network();
        let report = LoadReport {
            locations: 3,
            routes: 0,
            skipped_rows: 2,
        };
        let listing = CityListing::from_registry(network.registry(), &report);
        assert_eq!(listing.count, 3);
        let names: Vec<&str> = listing.cities.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Lyon", "Turin", "Milan"]);

        let text = listing.render(RenderMode::PlainText).unwrap();
        assert!(text.starts_with("Cities: 3 (2 rows skipped)"));
        assert!(text.contains("  Turin (Italy) 45.0703, 7.6869"));

        let html = listing.render(RenderMode::Html).unwrap();
        assert_eq!(html.matches("<tr><td>").count(), 3);
    }

    #[test]
    fn escape_covers_markup_characters() {
        assert_eq!(
            escape_html(r#"<a href="x">'&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;"
        );
    }
}
