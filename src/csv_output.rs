//! CSV output format for analysis results
//!
//! Emits the per-observation table (with fitted values and residuals) for
//! spreadsheet analysis and machine parsing.

use crate::analysis::AnalysisReport;

/// CSV record for a single observation
#[derive(Debug, Clone)]
pub struct CsvObservation {
    pub label: Option<String>,
    pub predictor: f64,
    pub response: f64,
    pub fitted: f64,
    pub residual: f64,
}

/// CSV output formatter
#[derive(Debug)]
pub struct CsvOutput {
    predictor_name: String,
    response_name: String,
    include_label: bool,
    observations: Vec<CsvObservation>,
}

impl CsvOutput {
    /// Create a new CSV output formatter
    pub fn new(predictor_name: &str, response_name: &str, include_label: bool) -> Self {
        Self {
            predictor_name: predictor_name.to_string(),
            response_name: response_name.to_string(),
            include_label,
            observations: Vec::new(),
        }
    }

    /// Add an observation to the output
    pub fn add_observation(&mut self, observation: CsvObservation) {
        self.observations.push(observation);
    }

    /// Generate CSV header row
    fn header(&self) -> String {
        let mut headers: Vec<&str> = Vec::new();
        if self.include_label {
            headers.push("label");
        }
        headers.push(&self.predictor_name);
        headers.push(&self.response_name);
        headers.push("fitted");
        headers.push("residual");
        headers.join(",")
    }

    /// Escape CSV field (handle commas, quotes, newlines)
    fn escape_field(field: &str) -> String {
        if field.contains(',') || field.contains('"') || field.contains('\n') {
            format!("\"{}\"", field.replace('"', "\"\""))
        } else {
            field.to_string()
        }
    }

    /// Format an observation as CSV row
    fn format_observation(&self, observation: &CsvObservation) -> String {
        let mut fields: Vec<String> = Vec::new();

        if self.include_label {
            fields.push(Self::escape_field(
                observation.label.as_deref().unwrap_or(""),
            ));
        }
        fields.push(format!("{}", observation.predictor));
        fields.push(format!("{}", observation.response));
        fields.push(format!("{:.6}", observation.fitted));
        fields.push(format!("{:.6}", observation.residual));

        fields.join(",")
    }

    /// Generate CSV output as string
    pub fn to_csv(&self) -> String {
        let mut output = String::new();

        output.push_str(&self.header());
        output.push('\n');

        for observation in &self.observations {
            output.push_str(&self.format_observation(observation));
            output.push('\n');
        }

        output
    }
}

/// Build the observation CSV for a finished report
pub fn render(report: &AnalysisReport) -> String {
    let mut output = CsvOutput::new(
        &report.predictor,
        &report.response,
        report.labels.is_some(),
    );

    for row in 0..report.n_observations {
        output.add_observation(CsvObservation {
            label: report
                .labels
                .as_ref()
                .and_then(|labels| labels.get(row).cloned()),
            predictor: report.x_values[row],
            response: report.y_values[row],
            fitted: report.primary.fitted[row],
            residual: report.primary.residuals[row],
        });
    }

    output.to_csv()
}
