use std::fs;
use std::path::PathBuf;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../tripgraph-lib/tests/fixtures")
        .join(name)
        .canonicalize()
        .expect("fixture present")
}

fn cli(subcommand: &str, from: &str, to: &str) -> Command {
    let mut cmd = cargo_bin_cmd!("tripgraph");
    cmd.env("RUST_LOG", "error")
        .arg(subcommand)
        .arg("--cities")
        .arg(fixture("cities.csv"))
        .arg("--routes")
        .arg(fixture("routes.csv"))
        .arg("--from")
        .arg(from)
        .arg("--to")
        .arg(to);
    cmd
}

#[test]
fn route_prints_text_report() {
    cli("route", "London", "Berlin")
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "Route: London -> Berlin (2 hops, metric: time, strategy: heuristic)",
        ))
        .stdout(predicate::str::contains("Amsterdam"));
}

#[test]
fn route_by_cost_uninformed_as_json() {
    let output = cli("route", "Paris", "Rome")
        .args(["--metric", "cost", "--strategy", "uninformed", "--format", "json"])
        .output()
        .expect("runs");
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json report");
    assert_eq!(value["strategy"], "uninformed");
    assert_eq!(value["total"].as_f64(), Some(165.0));
    assert_eq!(value["steps"][1]["name"], "Milan");
}

#[test]
fn html_report_is_written_to_file() {
    let dir = tempdir().expect("temp dir");
    let target = dir.path().join("trip.html");

    cli("route", "Madrid", "Zurich")
        .args(["--metric", "distance", "--format", "html", "--output"])
        .arg(&target)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let html = fs::read_to_string(&target).expect("report written");
    assert!(html.contains("<title>Madrid to Zurich</title>"));
}

#[test]
fn unknown_city_suggests_alternatives() {
    cli("route", "Berlinn", "Rome")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown start location: Berlinn"))
        .stderr(predicate::str::contains("Did you mean 'Berlin'?"));
}

#[test]
fn unreachable_city_fails_cleanly() {
    cli("route", "Paris", "Reykjavik")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "no path exists between Paris and Reykjavik",
        ));
}

#[test]
fn scaled_heuristic_requires_factor() {
    cli("route", "Paris", "Rome")
        .args(["--heuristic", "scaled"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--heuristic-factor is required"));
}

#[test]
fn compare_reports_both_strategies() {
    cli("compare", "Barcelona", "Berlin")
        .args(["--metric", "distance"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Comparison (metric: distance)"))
        .stdout(predicate::str::contains("uninformed: total"))
        .stdout(predicate::str::contains("heuristic: total"))
        .stdout(predicate::str::contains("Totals are same"));
}

#[test]
fn cities_lists_fixture_as_json() {
    let output = cargo_bin_cmd!("tripgraph")
        .env("RUST_LOG", "error")
        .arg("cities")
        .arg("--cities")
        .arg(fixture("cities.csv"))
        .args(["--format", "json"])
        .output()
        .expect("runs");
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json listing");
    assert_eq!(value["count"], 12);
    assert_eq!(value["skipped_rows"], 0);
    let names: Vec<&str> = value["cities"]
        .as_array()
        .expect("cities array")
        .iter()
        .filter_map(|city| city["name"].as_str())
        .collect();
    assert!(names.contains(&"Reykjavik"));
}

#[test]
fn cities_text_listing_and_missing_file() {
    cargo_bin_cmd!("tripgraph")
        .env("RUST_LOG", "error")
        .arg("cities")
        .arg("--cities")
        .arg(fixture("cities.csv"))
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Cities: 12 (0 rows skipped)"))
        .stdout(predicate::str::contains("Berlin"));

    cargo_bin_cmd!("tripgraph")
        .env("RUST_LOG", "error")
        .args(["cities", "--cities", "nope.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load cities from nope.csv"));
}

#[test]
fn missing_input_file_is_reported() {
    let mut cmd = cargo_bin_cmd!("tripgraph");
    cmd.env("RUST_LOG", "error")
        .args(["route", "--cities", "nope.csv", "--routes", "nope.csv"])
        .args(["--from", "A", "--to", "B"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load network"));
}
