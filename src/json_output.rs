//! JSON output format for analysis reports
//!
//! One self-contained document per run; optional sections are skipped when
//! the corresponding stage did not run.

use crate::analysis::{AnalysisReport, StudyKind};
use crate::normality::{NormalityTest, NormalityVerdict};
use serde::{Deserialize, Serialize};

/// A fitted coefficient with its sampling statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonCoefficient {
    pub term: String,
    pub estimate: f64,
    pub std_error: f64,
    pub t_statistic: f64,
    pub p_value: f64,
}

/// One fitted model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonModel {
    pub response: String,
    pub coefficients: Vec<JsonCoefficient>,
    pub r_squared: f64,
    pub adj_r_squared: f64,
    pub f_statistic: f64,
    pub f_pvalue: f64,
    pub n_observations: usize,
    pub df_residual: usize,
}

/// Descriptive statistics for one variable
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonDescribe {
    pub variable: String,
    pub count: usize,
    pub mean: f32,
    pub std_dev: f32,
    pub min: f32,
    pub p25: f32,
    pub median: f32,
    pub p75: f32,
    pub max: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p90: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p95: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p99: Option<f32>,
}

/// One categorical frequency entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonFrequency {
    pub level: String,
    pub count: u64,
    pub percent: f64,
}

/// Shapiro-Francia result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonNormality {
    pub statistic: f64,
    pub p_value: f64,
    pub alpha: f64,
    pub verdict: String,
}

/// Residual diagnostics block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonDiagnostics {
    pub durbin_watson: f64,
    pub outlier_threshold: f64,
    pub outliers: Vec<JsonOutlier>,
}

/// A flagged residual outlier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonOutlier {
    pub row: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub residual: f64,
    pub z_score: f64,
}

/// Box-Cox refit block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonBoxCox {
    pub lambda: f64,
    pub linear_r_squared: f64,
    pub model: JsonModel,
    pub normality: JsonNormality,
}

/// Prediction block (continuous studies)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonPrediction {
    pub at: f64,
    pub linear: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transformed: Option<f64>,
}

/// Complete analysis report document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonReport {
    pub study: String,
    pub dataset: String,
    pub n_observations: usize,
    pub response: String,
    pub predictor: String,
    pub describe: Vec<JsonDescribe>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<Vec<JsonFrequency>>,
    pub model: JsonModel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub naive_model: Option<JsonModel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_level: Option<String>,
    pub normality: JsonNormality,
    pub diagnostics: JsonDiagnostics,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boxcox: Option<JsonBoxCox>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub curve: Option<Vec<(f64, f64)>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prediction: Option<JsonPrediction>,
}

fn convert_model(model: &crate::ols::OlsModel) -> JsonModel {
    JsonModel {
        response: model.response.clone(),
        coefficients: model
            .coefficients
            .iter()
            .map(|c| JsonCoefficient {
                term: c.term.clone(),
                estimate: c.estimate,
                std_error: c.std_error,
                t_statistic: c.t_statistic,
                p_value: c.p_value,
            })
            .collect(),
        r_squared: model.r_squared,
        adj_r_squared: model.adj_r_squared,
        f_statistic: model.f_statistic,
        f_pvalue: model.f_pvalue,
        n_observations: model.n_observations,
        df_residual: model.df_residual,
    }
}

fn convert_normality(test: &NormalityTest) -> JsonNormality {
    let verdict = match &test.verdict {
        NormalityVerdict::Normal => "normal",
        NormalityVerdict::NonNormal => "non_normal",
        NormalityVerdict::InsufficientData { .. } => "insufficient_data",
    };
    JsonNormality {
        statistic: test.statistic,
        p_value: test.p_value,
        alpha: test.alpha,
        verdict: verdict.to_string(),
    }
}

/// Render a report as pretty-printed JSON
pub fn render(report: &AnalysisReport) -> anyhow::Result<String> {
    let describe = report
        .describe
        .iter()
        .map(|summary| {
            let extended = report.extended.as_ref().and_then(|entries| {
                entries
                    .iter()
                    .find(|(name, _)| *name == summary.name)
                    .map(|(_, e)| e)
            });
            JsonDescribe {
                variable: summary.name.clone(),
                count: summary.count,
                mean: summary.mean,
                std_dev: summary.std_dev,
                min: summary.min,
                p25: summary.p25,
                median: summary.median,
                p75: summary.p75,
                max: summary.max,
                p90: extended.map(|e| e.p90),
                p95: extended.map(|e| e.p95),
                p99: extended.map(|e| e.p99),
            }
        })
        .collect();

    let document = JsonReport {
        study: match report.kind {
            StudyKind::Categorical => "categorical".to_string(),
            StudyKind::Continuous => "continuous".to_string(),
        },
        dataset: report.data_path.clone(),
        n_observations: report.n_observations,
        response: report.response.clone(),
        predictor: report.predictor.clone(),
        describe,
        frequency: report.frequency.as_ref().map(|table| {
            table
                .entries
                .iter()
                .map(|entry| JsonFrequency {
                    level: entry.level.clone(),
                    count: entry.count,
                    percent: entry.percent,
                })
                .collect()
        }),
        model: convert_model(&report.primary),
        naive_model: report.naive.as_ref().map(convert_model),
        reference_level: report.reference_level.clone(),
        normality: convert_normality(&report.normality),
        diagnostics: JsonDiagnostics {
            durbin_watson: report.diagnostics.durbin_watson,
            outlier_threshold: report.diagnostics.threshold,
            outliers: report
                .diagnostics
                .outliers
                .iter()
                .map(|o| JsonOutlier {
                    row: o.row,
                    label: o.label.clone(),
                    residual: o.residual,
                    z_score: o.z_score,
                })
                .collect(),
        },
        boxcox: report.boxcox.as_ref().map(|section| JsonBoxCox {
            lambda: section.lambda,
            linear_r_squared: section.linear_r_squared,
            model: convert_model(&section.model),
            normality: convert_normality(&section.normality),
        }),
        curve: report.curve.clone(),
        prediction: report.prediction.as_ref().map(|p| JsonPrediction {
            at: p.at,
            linear: p.linear,
            transformed: p.transformed,
        }),
    };

    Ok(serde_json::to_string_pretty(&document)?)
}
