//! CLI argument parsing for regresar

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for analysis reports
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format (default)
    Text,
    /// JSON format for machine parsing
    Json,
    /// CSV observation table for spreadsheet analysis
    Csv,
    /// Self-contained HTML report with an embedded chart
    Html,
}

#[derive(Parser, Debug)]
#[command(name = "regresar")]
#[command(version)]
#[command(about = "Pure Rust exploratory regression analysis for tabular datasets", long_about = None)]
pub struct Cli {
    /// CSV dataset to analyze
    #[arg(short = 'd', long = "data", value_name = "FILE")]
    pub data: PathBuf,

    /// Response (dependent) column name
    #[arg(short = 'y', long = "response", value_name = "COL")]
    pub response: String,

    /// Predictor (explanatory) column name
    #[arg(short = 'x', long = "predictor", value_name = "COL")]
    pub predictor: String,

    /// Text column used to annotate observations (e.g. country name)
    #[arg(long = "label", value_name = "COL")]
    pub label: Option<String>,

    /// Treat the predictor as categorical and expand it to dummy variables
    #[arg(long = "dummies")]
    pub dummies: bool,

    /// Also fit the naive label-coded model for comparison (requires --dummies)
    #[arg(long = "compare-naive")]
    pub compare_naive: bool,

    /// Interpolate a spline through per-group median fitted values (requires --dummies)
    #[arg(long = "fit-curve")]
    pub fit_curve: bool,

    /// Apply a Box-Cox transform to the response and refit
    #[arg(long = "boxcox")]
    pub boxcox: bool,

    /// Predict the response at this predictor value (numeric predictors only)
    #[arg(long = "predict", value_name = "X")]
    pub predict: Option<f64>,

    /// Show descriptive statistics for the modeled columns
    #[arg(short = 'c', long = "describe")]
    pub describe: bool,

    /// Extend descriptive statistics with upper-tail percentiles (requires -c)
    #[arg(long = "stats-extended")]
    pub stats_extended: bool,

    /// Significance level for hypothesis tests (default: 0.05)
    #[arg(long = "alpha", value_name = "ALPHA", default_value = "0.05")]
    pub alpha: f64,

    /// Residual outlier threshold in standard deviations (default: 3.0)
    #[arg(
        long = "outlier-threshold",
        value_name = "SIGMA",
        default_value = "3.0"
    )]
    pub outlier_threshold: f64,

    /// Output format
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Write the report to a file instead of stdout
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Also write the chart as a standalone SVG file
    #[arg(long = "chart", value_name = "FILE")]
    pub chart: Option<PathBuf>,

    /// Enable debug logging to stderr
    #[arg(long = "debug")]
    pub debug: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> Vec<&'static str> {
        vec![
            "regresar",
            "-d",
            "corrupcao.csv",
            "-y",
            "cpi",
            "-x",
            "regiao",
        ]
    }

    #[test]
    fn test_cli_parses_required_args() {
        let cli = Cli::parse_from(base_args());
        assert_eq!(cli.response, "cpi");
        assert_eq!(cli.predictor, "regiao");
        assert_eq!(cli.data, PathBuf::from("corrupcao.csv"));
    }

    #[test]
    fn test_cli_rejects_missing_response() {
        let result = Cli::try_parse_from(["regresar", "-d", "data.csv", "-x", "idade"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_dummies_default_false() {
        let cli = Cli::parse_from(base_args());
        assert!(!cli.dummies);
        assert!(!cli.compare_naive);
        assert!(!cli.fit_curve);
    }

    #[test]
    fn test_cli_dummies_flags() {
        let mut args = base_args();
        args.extend(["--dummies", "--compare-naive", "--fit-curve"]);
        let cli = Cli::parse_from(args);
        assert!(cli.dummies);
        assert!(cli.compare_naive);
        assert!(cli.fit_curve);
    }

    #[test]
    fn test_cli_boxcox_and_predict() {
        let mut args = base_args();
        args.extend(["--boxcox", "--predict", "52"]);
        let cli = Cli::parse_from(args);
        assert!(cli.boxcox);
        assert_eq!(cli.predict, Some(52.0));
    }

    #[test]
    fn test_cli_alpha_default() {
        let cli = Cli::parse_from(base_args());
        assert_eq!(cli.alpha, 0.05);
    }

    #[test]
    fn test_cli_outlier_threshold_custom() {
        let mut args = base_args();
        args.extend(["--outlier-threshold", "2.5"]);
        let cli = Cli::parse_from(args);
        assert_eq!(cli.outlier_threshold, 2.5);
    }

    #[test]
    fn test_cli_format_values() {
        for (raw, _) in [("text", 0), ("json", 1), ("csv", 2), ("html", 3)] {
            let mut args = base_args();
            args.extend(["--format", raw]);
            assert!(Cli::try_parse_from(args).is_ok(), "format {}", raw);
        }
    }

    #[test]
    fn test_cli_describe_flags() {
        let mut args = base_args();
        args.extend(["-c", "--stats-extended"]);
        let cli = Cli::parse_from(args);
        assert!(cli.describe);
        assert!(cli.stats_extended);
    }
}
