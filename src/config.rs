//! Configuration for an analysis run
//!
//! Thresholds are explicit and validated up front rather than scattered as
//! magic numbers through the pipeline.

use serde::{Deserialize, Serialize};

/// Configuration for one analysis run
///
/// # Example
/// ```
/// use regresar::config::AnalysisConfig;
///
/// let config = AnalysisConfig::default();
/// assert_eq!(config.alpha, 0.05); // 95% confidence
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Statistical significance level (alpha) for hypothesis tests
    ///
    /// - 0.05 (default): 95% confidence
    /// - 0.01: stricter, fewer false rejections of normality
    /// - 0.10: looser
    pub alpha: f64,

    /// Residual outlier threshold in standard deviations
    ///
    /// Observations whose standardized residual exceeds this are flagged.
    /// Default: 3.0
    pub outlier_threshold: f64,

    /// Minimum number of observations before any model is fitted
    ///
    /// OLS technically needs k+2, but tiny samples make every statistic
    /// in the report meaningless. Default: 5
    pub min_observations: usize,

    /// Apply a Box-Cox transform to the response and refit
    pub boxcox: bool,

    /// Also fit the naive label-coded model for comparison (categorical
    /// studies only)
    pub compare_naive: bool,

    /// Interpolate a spline curve through per-group median fitted values
    /// (categorical studies only)
    pub fit_curve: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            alpha: 0.05,
            outlier_threshold: 3.0,
            min_observations: 5,
            boxcox: false,
            compare_naive: false,
            fit_curve: false,
        }
    }
}

impl AnalysisConfig {
    /// Validate threshold ranges
    pub fn validate(&self) -> Result<(), String> {
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(format!(
                "alpha must be in (0, 1), got {}",
                self.alpha
            ));
        }
        if self.outlier_threshold <= 0.0 {
            return Err(format!(
                "outlier threshold must be positive, got {}",
                self.outlier_threshold
            ));
        }
        if self.min_observations < 3 {
            return Err(format!(
                "minimum observations must be at least 3, got {}",
                self.min_observations
            ));
        }
        Ok(())
    }
}
