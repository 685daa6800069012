use anyhow::{Context, Result};
use clap::Parser;
use regresar::analysis::{self, AnalysisRequest};
use regresar::cli::{Cli, OutputFormat};
use regresar::config::AnalysisConfig;
use regresar::{chart, csv_output, html_output, json_output, report};
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Reject flag combinations that cannot mean anything
fn validate(args: &Cli) -> Result<()> {
    if args.compare_naive && !args.dummies {
        anyhow::bail!("--compare-naive requires --dummies");
    }
    if args.fit_curve && !args.dummies {
        anyhow::bail!("--fit-curve requires --dummies");
    }
    if args.boxcox && args.dummies {
        anyhow::bail!("--boxcox applies to continuous studies; drop --dummies");
    }
    if args.predict.is_some() && args.dummies {
        anyhow::bail!("--predict needs a numeric predictor; drop --dummies");
    }
    if args.stats_extended && !args.describe {
        anyhow::bail!("--stats-extended requires -c/--describe");
    }
    Ok(())
}

/// Write a rendered report to the chosen sink
fn write_output(content: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => std::fs::write(path, content)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => print!("{}", content),
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Cli::parse();

    validate(&args)?;
    init_tracing(args.debug);

    let request = AnalysisRequest {
        response: args.response.clone(),
        predictor: args.predictor.clone(),
        label: args.label.clone(),
        dummies: args.dummies,
        predict_at: args.predict,
        extended_stats: args.stats_extended,
        config: AnalysisConfig {
            alpha: args.alpha,
            outlier_threshold: args.outlier_threshold,
            boxcox: args.boxcox,
            compare_naive: args.compare_naive,
            fit_curve: args.fit_curve,
            ..AnalysisConfig::default()
        },
    };

    let report_data = analysis::run(&args.data, &request)?;

    let rendered = match args.format {
        OutputFormat::Text => report::render(&report_data, args.describe),
        OutputFormat::Json => json_output::render(&report_data)?,
        OutputFormat::Csv => csv_output::render(&report_data),
        OutputFormat::Html => html_output::render(&report_data),
    };
    write_output(&rendered, args.output.as_deref())?;

    if let Some(path) = &args.chart {
        let svg = chart::from_report(&report_data).to_svg();
        std::fs::write(path, svg)
            .with_context(|| format!("failed to write chart {}", path.display()))?;
        tracing::info!(path = %path.display(), "chart written");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> Cli {
        let mut argv = vec![
            "regresar",
            "-d",
            "data.csv",
            "-y",
            "cpi",
            "-x",
            "regiao",
        ];
        argv.extend(extra);
        Cli::parse_from(argv)
    }

    #[test]
    fn test_validate_accepts_plain_run() {
        assert!(validate(&args(&[])).is_ok());
    }

    #[test]
    fn test_validate_compare_naive_needs_dummies() {
        assert!(validate(&args(&["--compare-naive"])).is_err());
        assert!(validate(&args(&["--dummies", "--compare-naive"])).is_ok());
    }

    #[test]
    fn test_validate_fit_curve_needs_dummies() {
        assert!(validate(&args(&["--fit-curve"])).is_err());
        assert!(validate(&args(&["--dummies", "--fit-curve"])).is_ok());
    }

    #[test]
    fn test_validate_boxcox_conflicts_with_dummies() {
        assert!(validate(&args(&["--dummies", "--boxcox"])).is_err());
        assert!(validate(&args(&["--boxcox"])).is_ok());
    }

    #[test]
    fn test_validate_predict_conflicts_with_dummies() {
        assert!(validate(&args(&["--dummies", "--predict", "3"])).is_err());
        assert!(validate(&args(&["--predict", "52"])).is_ok());
    }

    #[test]
    fn test_validate_stats_extended_needs_describe() {
        assert!(validate(&args(&["--stats-extended"])).is_err());
        assert!(validate(&args(&["-c", "--stats-extended"])).is_ok());
    }
}
