//! Output format tests: json, csv, html, chart file
//!
//! Each format must round out to a well-formed document containing the
//! headline sections.

use assert_cmd::Command;
use predicates::prelude::*;

fn regresar() -> Command {
    Command::cargo_bin("regresar").unwrap()
}

fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

#[test]
fn test_json_output_parses_and_compares_models() {
    let output = regresar()
        .args([
            "-d",
            &fixture("corrupcao.csv"),
            "-y",
            "cpi",
            "-x",
            "regiao",
            "--dummies",
            "--compare-naive",
            "--label",
            "pais",
            "--format",
            "json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let document: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();

    assert_eq!(document["study"], "categorical");
    assert_eq!(document["n_observations"], 18);
    assert_eq!(document["reference_level"], "America_do_Sul");

    // Intercept plus four dummies
    let coefficients = document["model"]["coefficients"].as_array().unwrap();
    assert_eq!(coefficients.len(), 5);

    // Dummies must explain at least as much as the arbitrary weighting
    let dummy_r2 = document["model"]["r_squared"].as_f64().unwrap();
    let naive_r2 = document["naive_model"]["r_squared"].as_f64().unwrap();
    assert!(dummy_r2 >= naive_r2, "dummy {} naive {}", dummy_r2, naive_r2);

    // Intercept is the reference-group mean
    let intercept = coefficients[0]["estimate"].as_f64().unwrap();
    assert!((intercept - 4.18).abs() < 0.01, "intercept {}", intercept);

    let frequency = document["frequency"].as_array().unwrap();
    assert_eq!(frequency.len(), 5);
}

#[test]
fn test_json_output_boxcox_section() {
    let output = regresar()
        .args([
            "-d",
            &fixture("bebes.csv"),
            "-y",
            "comprimento",
            "-x",
            "idade",
            "--boxcox",
            "--predict",
            "52",
            "--format",
            "json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let document: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();

    assert_eq!(document["study"], "continuous");
    let lambda = document["boxcox"]["lambda"].as_f64().unwrap();
    assert!((0.5..=4.0).contains(&lambda), "lambda {}", lambda);

    let linear_r2 = document["boxcox"]["linear_r_squared"].as_f64().unwrap();
    let transformed_r2 = document["boxcox"]["model"]["r_squared"].as_f64().unwrap();
    assert!(transformed_r2 >= linear_r2 - 1e-6);

    let prediction = document["prediction"]["linear"].as_f64().unwrap();
    assert!((73.0..=77.0).contains(&prediction), "prediction {}", prediction);
}

#[test]
fn test_csv_output_observation_table() {
    regresar()
        .args([
            "-d",
            &fixture("corrupcao.csv"),
            "-y",
            "cpi",
            "-x",
            "regiao",
            "--dummies",
            "--label",
            "pais",
            "--format",
            "csv",
        ])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("label,regiao,cpi,fitted,residual\n"))
        .stdout(predicate::str::contains("Brasil,1,3.9,"))
        .stdout(predicate::str::contains("Nova_Zelandia,5,9.3,"));
}

#[test]
fn test_csv_output_line_count() {
    let output = regresar()
        .args([
            "-d",
            &fixture("corrupcao.csv"),
            "-y",
            "cpi",
            "-x",
            "regiao",
            "--dummies",
            "--format",
            "csv",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let text = String::from_utf8(output.stdout).unwrap();
    // Header plus 18 observations
    assert_eq!(text.lines().count(), 19);
}

#[test]
fn test_html_report_written_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.html");

    regresar()
        .args([
            "-d",
            &fixture("corrupcao.csv"),
            "-y",
            "cpi",
            "-x",
            "regiao",
            "--dummies",
            "--fit-curve",
            "--label",
            "pais",
            "--format",
            "html",
            "-o",
            path.to_str().unwrap(),
        ])
        .assert()
        .success();

    let html = std::fs::read_to_string(&path).unwrap();
    assert!(html.contains("<!DOCTYPE html>"));
    assert!(html.contains("<svg"));
    assert!(html.contains("Dummy-encoded model"));
    assert!(html.contains("Brasil"));
    // Spline curve rendered as a polyline
    assert!(html.contains("<polyline"));
}

#[test]
fn test_standalone_chart_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("chart.svg");

    regresar()
        .args([
            "-d",
            &fixture("bebes.csv"),
            "-y",
            "comprimento",
            "-x",
            "idade",
            "--boxcox",
            "--chart",
            path.to_str().unwrap(),
        ])
        .assert()
        .success();

    let svg = std::fs::read_to_string(&path).unwrap();
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("<circle"));
    assert!(svg.contains("box-cox fit"));
}

#[test]
fn test_text_output_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.txt");

    regresar()
        .args([
            "-d",
            &fixture("bebes.csv"),
            "-y",
            "comprimento",
            "-x",
            "idade",
            "-o",
            path.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("Linear model"));
}
