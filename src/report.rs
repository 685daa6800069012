//! Terminal report rendering
//!
//! Fixed-width tables in the spirit of the classic regression summary
//! printout: one block per fitted model, then diagnostics, then
//! predictions. All sections render into one String so the caller decides
//! between stdout and a file.

use crate::analysis::{AnalysisReport, StudyKind};
use crate::ols::OlsModel;

/// Render the full text report
pub fn render(report: &AnalysisReport, show_describe: bool) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "=== regresar: {} ~ {} ===\n",
        report.response, report.predictor
    ));
    out.push_str(&format!(
        "Dataset: {} ({} observations)\n",
        report.data_path, report.n_observations
    ));
    let schema: Vec<String> = report
        .schema
        .iter()
        .map(|(name, kind)| format!("{} ({})", name, kind))
        .collect();
    out.push_str(&format!("Columns: {}\n\n", schema.join(", ")));

    if show_describe {
        render_describe(report, &mut out);
    }

    if let Some(frequency) = &report.frequency {
        render_frequency(frequency, &mut out);
    }

    if let Some(naive) = &report.naive {
        out.push_str(&model_summary(
            "Arbitrary weighting (label codes; for comparison only)",
            naive,
        ));
        out.push('\n');
    }

    let primary_title = match report.kind {
        StudyKind::Categorical => "Dummy-encoded model",
        StudyKind::Continuous => "Linear model",
    };
    out.push_str(&model_summary(primary_title, &report.primary));
    out.push('\n');

    if let Some(reference) = &report.reference_level {
        out.push_str(&format!(
            "Reference level: {} (coefficients shift against it)\n\n",
            reference
        ));
    }

    if let Some(naive) = &report.naive {
        out.push_str("--- Model comparison ---\n");
        out.push_str(&format!(
            "R-squared (arbitrary weighting): {:.4}\n",
            naive.r_squared
        ));
        out.push_str(&format!(
            "R-squared (dummies):             {:.4}\n",
            report.primary.r_squared
        ));
        out.push_str(
            "Label codes impose a quantitative scale on qualitative levels;\n\
             the dummy model is the one to read.\n\n",
        );
    }

    if let Some(boxcox) = &report.boxcox {
        out.push_str(&format!(
            "--- Box-Cox transform (lambda = {:.4}) ---\n",
            boxcox.lambda
        ));
        out.push_str(&model_summary("Box-Cox model", &boxcox.model));
        out.push_str(&format!(
            "\nR-squared (linear):  {:.4}\nR-squared (Box-Cox): {:.4}\n\n",
            boxcox.linear_r_squared, boxcox.model.r_squared
        ));
        out.push_str("Transformed-model residuals:\n");
        out.push_str(&boxcox.normality.to_report_string());
        out.push('\n');
    }

    out.push_str("--- Residual diagnostics ---\n");
    out.push_str(&report.normality.to_report_string());
    out.push_str(&format!(
        "Durbin-Watson: {:.3} (2 means no first-order autocorrelation)\n",
        report.diagnostics.durbin_watson
    ));
    render_outliers(report, &mut out);
    out.push('\n');

    if let Some(curve) = &report.curve {
        out.push_str(&format!(
            "Fitted-value curve: {} spline points over codes {:.1}..{:.1}\n\n",
            curve.len(),
            curve.first().map(|p| p.0).unwrap_or(0.0),
            curve.last().map(|p| p.0).unwrap_or(0.0),
        ));
    }

    if let Some(prediction) = &report.prediction {
        out.push_str("--- Prediction ---\n");
        out.push_str(&format!(
            "{} at {} = {}: {:.3} (linear)\n",
            report.response, report.predictor, prediction.at, prediction.linear
        ));
        if let Some(transformed) = prediction.transformed {
            out.push_str(&format!(
                "{} at {} = {}: {:.3} (Box-Cox, original scale)\n",
                report.response, report.predictor, prediction.at, transformed
            ));
        }
        out.push('\n');
    }

    out
}

/// One model block: header stats then the coefficient table
fn model_summary(title: &str, model: &OlsModel) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== {} ===\n", title));
    out.push_str(&format!(
        "Dep. Variable: {:<18} No. Observations: {}\n",
        model.response, model.n_observations
    ));
    out.push_str(&format!(
        "R-squared:     {:<18.4} Adj. R-squared:   {:.4}\n",
        model.r_squared, model.adj_r_squared
    ));
    out.push_str(&format!(
        "F-statistic:   {:<18.3} Prob (F):         {:.4}\n",
        model.f_statistic, model.f_pvalue
    ));
    out.push_str(&format!("Df Residuals:  {}\n", model.df_residual));

    out.push_str(
        "------------------------------------------------------------------\n",
    );
    out.push_str(&format!(
        "{:<24} {:>10} {:>10} {:>8} {:>8}\n",
        "term", "coef", "std err", "t", "P>|t|"
    ));
    out.push_str(
        "------------------------------------------------------------------\n",
    );
    for coefficient in &model.coefficients {
        out.push_str(&format!(
            "{:<24} {:>10.4} {:>10.4} {:>8.3} {:>8.4}\n",
            coefficient.term,
            coefficient.estimate,
            coefficient.std_error,
            coefficient.t_statistic,
            coefficient.p_value
        ));
    }
    out.push_str(
        "------------------------------------------------------------------\n",
    );

    out
}

fn render_describe(report: &AnalysisReport, out: &mut String) {
    out.push_str("--- Descriptive statistics ---\n");
    out.push_str(&format!(
        "{:<16} {:>6} {:>9} {:>9} {:>8} {:>8} {:>8} {:>8} {:>8}\n",
        "variable", "count", "mean", "std", "min", "25%", "50%", "75%", "max"
    ));
    for summary in &report.describe {
        out.push_str(&format!(
            "{:<16} {:>6} {:>9.3} {:>9.3} {:>8.2} {:>8.2} {:>8.2} {:>8.2} {:>8.2}\n",
            summary.name,
            summary.count,
            summary.mean,
            summary.std_dev,
            summary.min,
            summary.p25,
            summary.median,
            summary.p75,
            summary.max
        ));
    }

    if let Some(extended) = &report.extended {
        out.push_str(&format!(
            "{:<16} {:>8} {:>8} {:>8}\n",
            "variable", "P90", "P95", "P99"
        ));
        for (name, ext) in extended {
            out.push_str(&format!(
                "{:<16} {:>8.2} {:>8.2} {:>8.2}\n",
                name, ext.p90, ext.p95, ext.p99
            ));
        }
    }
    out.push('\n');
}

fn render_frequency(frequency: &crate::frequency::FrequencyTable, out: &mut String) {
    out.push_str(&format!(
        "--- Frequencies: {} ({} levels) ---\n",
        frequency.column,
        frequency.n_levels()
    ));
    out.push_str(&format!(
        "{:<24} {:>7} {:>8}\n",
        "level", "count", "%"
    ));
    for entry in &frequency.entries {
        out.push_str(&format!(
            "{:<24} {:>7} {:>7.1}%\n",
            entry.level, entry.count, entry.percent
        ));
    }
    out.push('\n');
}

fn render_outliers(report: &AnalysisReport, out: &mut String) {
    let outliers = &report.diagnostics.outliers;
    if outliers.is_empty() {
        out.push_str(&format!(
            "No residual outliers beyond {:.1} sigma.\n",
            report.diagnostics.threshold
        ));
        return;
    }

    out.push_str(&format!(
        "⚠️  {} residual outlier(s) beyond {:.1} sigma:\n",
        outliers.len(),
        report.diagnostics.threshold
    ));
    for outlier in outliers {
        let label = outlier.label.as_deref().unwrap_or("-");
        out.push_str(&format!(
            "  row {:<4} {:<20} residual {:>8.3}  z = {:>6.2}  [{:?}]\n",
            outlier.row, label, outlier.residual, outlier.z_score, outlier.severity
        ));
    }
}
