//! HTML output format for analysis reports
//!
//! Rich visual report with styled tables and embedded CSS, self-contained
//! in one file: observation table, coefficient tables, diagnostics, and
//! the chart SVG inlined (hover any point for its tooltip).

use crate::analysis::{AnalysisReport, StudyKind};
use crate::chart;
use crate::ols::OlsModel;

/// HTML output formatter
#[derive(Debug)]
pub struct HtmlOutput<'a> {
    report: &'a AnalysisReport,
}

impl<'a> HtmlOutput<'a> {
    pub fn new(report: &'a AnalysisReport) -> Self {
        Self { report }
    }

    /// Escape HTML special characters to prevent XSS
    fn escape_html(text: &str) -> String {
        text.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
            .replace('\'', "&#39;")
    }

    /// Generate embedded CSS styles
    fn generate_styles() -> &'static str {
        r#"
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            margin: 20px;
            background-color: #f5f5f5;
        }
        h1, h2 {
            color: #333;
        }
        table {
            border-collapse: collapse;
            width: 100%;
            background-color: white;
            box-shadow: 0 1px 3px rgba(0,0,0,0.1);
            margin-bottom: 20px;
        }
        th, td {
            border: 1px solid #ddd;
            padding: 8px;
            text-align: left;
        }
        th {
            background-color: #4a90d9;
            color: white;
            font-weight: bold;
        }
        tr:nth-child(even) {
            background-color: #f9f9f9;
        }
        tr:hover {
            background-color: #f0f0f0;
        }
        .label {
            font-weight: bold;
        }
        .num {
            font-family: monospace;
            text-align: right;
        }
        .significant {
            color: #1a7f37;
            font-weight: bold;
        }
        .stats-table th {
            background-color: #5cb85c;
        }
        .verdict-ok {
            color: #1a7f37;
        }
        .verdict-bad {
            color: #cc0000;
        }
        .chart {
            background-color: white;
            box-shadow: 0 1px 3px rgba(0,0,0,0.1);
            padding: 10px;
            margin-bottom: 20px;
        }
        .footer {
            margin-top: 20px;
            font-size: 0.8em;
            color: #888;
            text-align: center;
        }
        "#
    }

    /// Coefficient table for one model
    fn render_model(title: &str, model: &OlsModel, alpha: f64) -> String {
        let mut html = String::new();

        html.push_str(&format!("    <h2>{}</h2>\n", Self::escape_html(title)));
        html.push_str(&format!(
            "    <p>R&sup2; = {:.4}, adjusted R&sup2; = {:.4}, F = {:.3} (p = {:.4}), n = {}</p>\n",
            model.r_squared,
            model.adj_r_squared,
            model.f_statistic,
            model.f_pvalue,
            model.n_observations
        ));

        html.push_str("    <table class=\"stats-table\">\n");
        html.push_str(
            "        <tr><th>term</th><th>coef</th><th>std err</th><th>t</th><th>P&gt;|t|</th></tr>\n",
        );
        for coefficient in &model.coefficients {
            let p_class = if coefficient.p_value < alpha {
                " class=\"num significant\""
            } else {
                " class=\"num\""
            };
            html.push_str(&format!(
                "        <tr><td class=\"label\">{}</td><td class=\"num\">{:.4}</td><td class=\"num\">{:.4}</td><td class=\"num\">{:.3}</td><td{}>{:.4}</td></tr>\n",
                Self::escape_html(&coefficient.term),
                coefficient.estimate,
                coefficient.std_error,
                coefficient.t_statistic,
                p_class,
                coefficient.p_value
            ));
        }
        html.push_str("    </table>\n");

        html
    }

    /// Observation table with fitted values and residuals
    fn render_observations(&self) -> String {
        let report = self.report;
        let mut html = String::new();

        html.push_str("    <h2>Observations</h2>\n");
        html.push_str("    <table>\n");

        let mut headers = Vec::new();
        if report.labels.is_some() {
            headers.push("label");
        }
        headers.push(report.predictor.as_str());
        headers.push(report.response.as_str());
        headers.push("fitted");
        headers.push("residual");
        let header_cells: Vec<String> = headers
            .iter()
            .map(|h| format!("<th>{}</th>", Self::escape_html(h)))
            .collect();
        html.push_str(&format!("        <tr>{}</tr>\n", header_cells.join("")));

        for row in 0..report.n_observations {
            let mut cells = Vec::new();
            if let Some(labels) = &report.labels {
                cells.push(format!(
                    "<td class=\"label\">{}</td>",
                    Self::escape_html(labels.get(row).map(|s| s.as_str()).unwrap_or(""))
                ));
            }
            cells.push(format!("<td class=\"num\">{}</td>", report.x_values[row]));
            cells.push(format!("<td class=\"num\">{}</td>", report.y_values[row]));
            cells.push(format!(
                "<td class=\"num\">{:.4}</td>",
                report.primary.fitted[row]
            ));
            cells.push(format!(
                "<td class=\"num\">{:.4}</td>",
                report.primary.residuals[row]
            ));
            html.push_str(&format!("        <tr>{}</tr>\n", cells.join("")));
        }

        html.push_str("    </table>\n");
        html
    }

    /// Diagnostics section: normality verdict, Durbin-Watson, outliers
    fn render_diagnostics(&self) -> String {
        let report = self.report;
        let mut html = String::new();

        html.push_str("    <h2>Diagnostics</h2>\n");

        let (class, verdict) = match report.normality.p_value {
            p if p.is_nan() => ("", "insufficient data".to_string()),
            p if p < report.normality.alpha => (
                " class=\"verdict-bad\"",
                format!("departs from normality (p = {:.4})", p),
            ),
            p => (
                " class=\"verdict-ok\"",
                format!("compatible with normality (p = {:.4})", p),
            ),
        };
        html.push_str(&format!(
            "    <p>Shapiro-Francia W&prime; = {:.4}: <span{}>{}</span></p>\n",
            report.normality.statistic, class, verdict
        ));
        html.push_str(&format!(
            "    <p>Durbin-Watson = {:.3}</p>\n",
            report.diagnostics.durbin_watson
        ));

        if report.diagnostics.outliers.is_empty() {
            html.push_str(&format!(
                "    <p>No residual outliers beyond {:.1}&sigma;.</p>\n",
                report.diagnostics.threshold
            ));
        } else {
            html.push_str("    <table>\n");
            html.push_str(
                "        <tr><th>row</th><th>label</th><th>residual</th><th>z</th></tr>\n",
            );
            for outlier in &report.diagnostics.outliers {
                html.push_str(&format!(
                    "        <tr><td class=\"num\">{}</td><td>{}</td><td class=\"num\">{:.3}</td><td class=\"num\">{:.2}</td></tr>\n",
                    outlier.row,
                    Self::escape_html(outlier.label.as_deref().unwrap_or("-")),
                    outlier.residual,
                    outlier.z_score
                ));
            }
            html.push_str("    </table>\n");
        }

        html
    }

    /// Generate complete HTML document
    pub fn to_html(&self) -> String {
        let report = self.report;
        let mut html = String::new();

        html.push_str("<!DOCTYPE html>\n");
        html.push_str("<html lang=\"en\">\n");

        html.push_str("<head>\n");
        html.push_str("    <meta charset=\"UTF-8\">\n");
        html.push_str(
            "    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
        );
        html.push_str(&format!(
            "    <title>regresar: {} ~ {}</title>\n",
            Self::escape_html(&report.response),
            Self::escape_html(&report.predictor)
        ));
        html.push_str("    <style>");
        html.push_str(Self::generate_styles());
        html.push_str("</style>\n");
        html.push_str("</head>\n");

        html.push_str("<body>\n");
        html.push_str(&format!(
            "    <h1>Regression report: {} ~ {}</h1>\n",
            Self::escape_html(&report.response),
            Self::escape_html(&report.predictor)
        ));
        html.push_str(&format!(
            "    <p>Dataset: {} ({} observations)</p>\n",
            Self::escape_html(&report.data_path),
            report.n_observations
        ));

        // Chart first: it is what the reader came for
        html.push_str("    <div class=\"chart\">\n");
        html.push_str(&chart::from_report(report).to_svg());
        html.push_str("    </div>\n");

        if let Some(naive) = &report.naive {
            html.push_str(&Self::render_model(
                "Arbitrary weighting (comparison only)",
                naive,
                report.config.alpha,
            ));
        }

        let primary_title = match report.kind {
            StudyKind::Categorical => "Dummy-encoded model",
            StudyKind::Continuous => "Linear model",
        };
        html.push_str(&Self::render_model(
            primary_title,
            &report.primary,
            report.config.alpha,
        ));

        if let Some(reference) = &report.reference_level {
            html.push_str(&format!(
                "    <p>Reference level: <span class=\"label\">{}</span></p>\n",
                Self::escape_html(reference)
            ));
        }

        if let Some(boxcox) = &report.boxcox {
            html.push_str(&Self::render_model(
                &format!("Box-Cox model (&lambda; = {:.4})", boxcox.lambda),
                &boxcox.model,
                report.config.alpha,
            ));
        }

        if let Some(prediction) = &report.prediction {
            html.push_str("    <h2>Prediction</h2>\n");
            html.push_str(&format!(
                "    <p>{} at {} = {}: <span class=\"num\">{:.3}</span> (linear)",
                Self::escape_html(&report.response),
                Self::escape_html(&report.predictor),
                prediction.at,
                prediction.linear
            ));
            if let Some(transformed) = prediction.transformed {
                html.push_str(&format!(
                    ", <span class=\"num\">{:.3}</span> (Box-Cox)",
                    transformed
                ));
            }
            html.push_str("</p>\n");
        }

        html.push_str(&self.render_diagnostics());
        html.push_str(&self.render_observations());

        html.push_str("    <div class=\"footer\">\n");
        html.push_str("        Generated by regresar - Exploratory Regression Analysis\n");
        html.push_str("    </div>\n");

        html.push_str("</body>\n");
        html.push_str("</html>\n");

        html
    }
}

/// Render a finished report as a self-contained HTML document
pub fn render(report: &AnalysisReport) -> String {
    HtmlOutput::new(report).to_html()
}
