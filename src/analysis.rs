//! Analysis pipeline orchestration
//!
//! One run is five sequential stages: load, describe, model, diagnose,
//! and assembling everything the renderers need into an [`AnalysisReport`].
//! The categorical path (dummy-encoded multiple regression) and the
//! continuous path (simple regression, optionally Box-Cox refit) share
//! every stage except model construction.

use crate::boxcox::BoxCox;
use crate::config::AnalysisConfig;
use crate::dataset::Dataset;
use crate::describe::{DescriptiveSummary, ExtendedSummary};
use crate::diagnostics::{self, ResidualDiagnostics};
use crate::encoding::{DummyEncoding, LabelEncoding};
use crate::frequency::FrequencyTable;
use crate::normality::{self, NormalityTest};
use crate::ols::{self, OlsModel};
use crate::spline::CubicSpline;
use anyhow::{Context, Result};
use aprender::stats::DescriptiveStats;
use std::path::Path;
use trueno::Vector;

/// Which study shape a report came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudyKind {
    /// response ~ dummy-encoded categorical predictor
    Categorical,
    /// response ~ one numeric predictor
    Continuous,
}

/// What to analyze, decoupled from clap so the library stays drivable
/// from tests
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub response: String,
    pub predictor: String,
    pub label: Option<String>,
    pub dummies: bool,
    pub predict_at: Option<f64>,
    pub extended_stats: bool,
    pub config: AnalysisConfig,
}

/// Box-Cox refit section of a report
#[derive(Debug, Clone)]
pub struct BoxCoxSection {
    pub lambda: f64,
    pub model: OlsModel,
    /// R² of the untransformed linear model, for the comparison block
    pub linear_r_squared: f64,
    pub normality: NormalityTest,
}

/// Prediction section of a report (continuous studies)
#[derive(Debug, Clone)]
pub struct PredictionSection {
    pub at: f64,
    pub linear: f64,
    /// Box-Cox prediction mapped back to the original scale
    pub transformed: Option<f64>,
}

/// Everything a renderer needs for one analysis run
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub kind: StudyKind,
    pub data_path: String,
    pub n_observations: usize,
    pub schema: Vec<(String, String)>,
    pub response: String,
    pub predictor: String,
    pub describe: Vec<DescriptiveSummary>,
    pub extended: Option<Vec<(String, ExtendedSummary)>>,
    pub frequency: Option<FrequencyTable>,
    pub labels: Option<Vec<String>>,
    /// Numeric predictor per row: raw values, or level codes when the
    /// predictor is categorical
    pub x_values: Vec<f64>,
    pub y_values: Vec<f64>,
    pub primary: OlsModel,
    /// The arbitrary-weighting comparison model (--compare-naive)
    pub naive: Option<OlsModel>,
    pub normality: NormalityTest,
    pub diagnostics: ResidualDiagnostics,
    pub boxcox: Option<BoxCoxSection>,
    /// Spline through per-group median fitted values (--fit-curve)
    pub curve: Option<Vec<(f64, f64)>>,
    pub prediction: Option<PredictionSection>,
    /// Reference level of the dummy expansion (categorical studies)
    pub reference_level: Option<String>,
    pub config: AnalysisConfig,
}

/// Calculate median using aprender's DescriptiveStats
fn median(values: &[f64]) -> Result<f64> {
    let data: Vec<f32> = values.iter().map(|&v| v as f32).collect();
    let vector = Vector::from_slice(&data);
    let stats = DescriptiveStats::new(&vector);
    stats
        .quantile(0.5)
        .map(|q| q as f64)
        .map_err(|e| anyhow::anyhow!("failed to compute median: {}", e))
}

/// Rows visited in ascending predictor order (for Durbin-Watson)
fn predictor_order(x_values: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..x_values.len()).collect();
    order.sort_by(|&a, &b| {
        x_values[a]
            .partial_cmp(&x_values[b])
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    order
}

/// Run the full pipeline against a CSV file
pub fn run(path: &Path, request: &AnalysisRequest) -> Result<AnalysisReport> {
    request
        .config
        .validate()
        .map_err(|e| anyhow::anyhow!(e))?;

    tracing::info!(path = %path.display(), "loading dataset");
    let dataset = Dataset::from_path(path)?;

    if dataset.len() < request.config.min_observations {
        anyhow::bail!(
            "dataset has {} rows; configured minimum is {}",
            dataset.len(),
            request.config.min_observations
        );
    }

    let y_values = dataset.numeric(&request.response)?.to_vec();
    let labels = match &request.label {
        Some(column) => Some(dataset.text(column)?.to_vec()),
        None => None,
    };

    if request.dummies {
        run_categorical(path, &dataset, request, y_values, labels)
    } else {
        run_continuous(path, &dataset, request, y_values, labels)
    }
}

fn describe_stage(
    request: &AnalysisRequest,
    named: &[(&str, &[f64])],
) -> (Vec<DescriptiveSummary>, Option<Vec<(String, ExtendedSummary)>>) {
    tracing::debug!("computing descriptive statistics");
    let describe: Vec<DescriptiveSummary> = named
        .iter()
        .map(|(name, values)| DescriptiveSummary::from_values(name, values))
        .collect();

    let extended = request.extended_stats.then(|| {
        named
            .iter()
            .zip(&describe)
            .map(|((name, values), summary)| (name.to_string(), summary.extended(values)))
            .collect()
    });

    (describe, extended)
}

fn run_categorical(
    path: &Path,
    dataset: &Dataset,
    request: &AnalysisRequest,
    y_values: Vec<f64>,
    labels: Option<Vec<String>>,
) -> Result<AnalysisReport> {
    let levels = dataset.text(&request.predictor)?;
    let frequency = FrequencyTable::from_values(&request.predictor, levels);

    let label_encoding = LabelEncoding::fit(&request.predictor, levels);
    let x_values = label_encoding.codes().to_vec();

    let dummies = DummyEncoding::fit(&request.predictor, levels);
    if dummies.n_columns() == 0 {
        anyhow::bail!(
            "predictor '{}' has a single level; nothing to contrast",
            request.predictor
        );
    }

    let (mut describe, extended) =
        describe_stage(request, &[(request.response.as_str(), y_values.as_slice())]);

    // Per-level response summaries, the group-by view of the same column
    for level in label_encoding.levels() {
        let group: Vec<f64> = levels
            .iter()
            .zip(&y_values)
            .filter(|(l, _)| *l == level)
            .map(|(_, &v)| v)
            .collect();
        describe.push(DescriptiveSummary::from_values(
            &format!("{} ({})", request.response, level),
            &group,
        ));
    }

    tracing::info!(
        terms = dummies.n_columns(),
        reference = %dummies.reference_level,
        "fitting dummy-encoded model"
    );
    let primary = ols::fit(&request.response, &y_values, dummies.columns())
        .context("dummy-encoded model")?;

    let naive = if request.config.compare_naive {
        tracing::info!("fitting arbitrary-weighting comparison model");
        let term = vec![(label_encoding.code_column(), x_values.clone())];
        Some(ols::fit(&request.response, &y_values, &term).context("arbitrary-weighting model")?)
    } else {
        None
    };

    let curve = if request.config.fit_curve {
        Some(fitted_median_curve(&label_encoding, &primary)?)
    } else {
        None
    };

    let normality = normality::shapiro_francia(&primary.residuals, request.config.alpha);
    let diagnostics = diagnostics::analyze(
        &primary.residuals,
        &predictor_order(&x_values),
        labels.as_deref(),
        request.config.outlier_threshold,
    );

    Ok(AnalysisReport {
        kind: StudyKind::Categorical,
        data_path: path.display().to_string(),
        n_observations: dataset.len(),
        schema: schema_strings(dataset),
        response: request.response.clone(),
        predictor: request.predictor.clone(),
        describe,
        extended,
        frequency: Some(frequency),
        labels,
        x_values,
        y_values,
        primary,
        naive,
        normality,
        diagnostics,
        boxcox: None,
        curve,
        prediction: None,
        reference_level: Some(dummies.reference_level.clone()),
        config: request.config.clone(),
    })
}

fn run_continuous(
    path: &Path,
    dataset: &Dataset,
    request: &AnalysisRequest,
    y_values: Vec<f64>,
    labels: Option<Vec<String>>,
) -> Result<AnalysisReport> {
    let x_values = dataset.numeric(&request.predictor)?.to_vec();

    let (describe, extended) = describe_stage(
        request,
        &[
            (request.predictor.as_str(), x_values.as_slice()),
            (request.response.as_str(), y_values.as_slice()),
        ],
    );

    tracing::info!(predictor = %request.predictor, "fitting linear model");
    let term = vec![(request.predictor.clone(), x_values.clone())];
    let primary = ols::fit(&request.response, &y_values, &term).context("linear model")?;

    let boxcox = if request.config.boxcox {
        Some(boxcox_refit(request, &y_values, &x_values, &primary)?)
    } else {
        None
    };

    let prediction = request.predict_at.map(|at| PredictionSection {
        at,
        linear: primary.predict(&[at]),
        transformed: boxcox
            .as_ref()
            .map(|section| inverse_prediction(section, at)),
    });

    let normality = normality::shapiro_francia(&primary.residuals, request.config.alpha);
    let diagnostics = diagnostics::analyze(
        &primary.residuals,
        &predictor_order(&x_values),
        labels.as_deref(),
        request.config.outlier_threshold,
    );

    Ok(AnalysisReport {
        kind: StudyKind::Continuous,
        data_path: path.display().to_string(),
        n_observations: dataset.len(),
        schema: schema_strings(dataset),
        response: request.response.clone(),
        predictor: request.predictor.clone(),
        describe,
        extended,
        frequency: None,
        labels,
        x_values,
        y_values,
        primary,
        naive: None,
        normality,
        diagnostics,
        boxcox,
        curve: None,
        prediction,
        reference_level: None,
        config: request.config.clone(),
    })
}

fn schema_strings(dataset: &Dataset) -> Vec<(String, String)> {
    dataset
        .schema()
        .into_iter()
        .map(|(name, kind)| (name, kind.to_string()))
        .collect()
}

/// Transform the response, refit, and test the transformed residuals
fn boxcox_refit(
    request: &AnalysisRequest,
    y_values: &[f64],
    x_values: &[f64],
    linear: &OlsModel,
) -> Result<BoxCoxSection> {
    tracing::info!("fitting Box-Cox transform");
    let transform = BoxCox::fit(y_values)?;
    let transformed = transform.transform(y_values);

    let response_name = format!("{}_boxcox", request.response);
    let term = vec![(request.predictor.clone(), x_values.to_vec())];
    let model = ols::fit(&response_name, &transformed, &term).context("Box-Cox model")?;

    let normality = normality::shapiro_francia(&model.residuals, request.config.alpha);

    Ok(BoxCoxSection {
        lambda: transform.lambda,
        model,
        linear_r_squared: linear.r_squared,
        normality,
    })
}

/// Predict on the transformed scale, then invert back
fn inverse_prediction(section: &BoxCoxSection, at: f64) -> f64 {
    crate::boxcox::inverse_value(section.model.predict(&[at]), section.lambda)
}

/// Spline through the per-group median of fitted values
fn fitted_median_curve(
    encoding: &LabelEncoding,
    model: &OlsModel,
) -> Result<Vec<(f64, f64)>> {
    let codes = encoding.codes();
    let n_levels = encoding.levels().len();

    let mut knots_x = Vec::with_capacity(n_levels);
    let mut knots_y = Vec::with_capacity(n_levels);
    for code in 1..=n_levels {
        let group: Vec<f64> = codes
            .iter()
            .zip(&model.fitted)
            .filter(|(&c, _)| c as usize == code)
            .map(|(_, &f)| f)
            .collect();
        if group.is_empty() {
            continue;
        }
        knots_x.push(code as f64);
        knots_y.push(median(&group)?);
    }

    let spline = CubicSpline::fit(&knots_x, &knots_y)
        .context("fitted-value curve needs at least 3 predictor levels")?;
    Ok(spline.eval_grid(0.1))
}
