//! Residual diagnostics: outlier flags and autocorrelation
//!
//! Residuals are standardized against their own mean and standard deviation
//! (trueno SIMD reductions) and flagged as outliers beyond a configurable
//! σ threshold. The Durbin-Watson statistic is computed on residuals in
//! predictor order to expose serial structure the scatter of a bad fit
//! leaves behind.

use serde::Serialize;
use trueno::Vector;

/// Outlier severity classification based on |z|
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OutlierSeverity {
    /// threshold..threshold+1 σ from the mean
    Low,
    /// threshold+1..threshold+2 σ from the mean
    Medium,
    /// beyond threshold+2 σ
    High,
}

/// One flagged observation
#[derive(Debug, Clone, Serialize)]
pub struct ResidualOutlier {
    /// 0-based row in the dataset
    pub row: usize,
    /// Optional label (e.g. country name) carried from the label column
    pub label: Option<String>,
    pub residual: f64,
    pub z_score: f64,
    pub severity: OutlierSeverity,
}

/// Residual diagnostics for one fitted model
#[derive(Debug, Clone)]
pub struct ResidualDiagnostics {
    pub standardized: Vec<f64>,
    pub outliers: Vec<ResidualOutlier>,
    pub durbin_watson: f64,
    pub threshold: f64,
}

fn classify(z_abs: f64, threshold: f64) -> OutlierSeverity {
    if z_abs >= threshold + 2.0 {
        OutlierSeverity::High
    } else if z_abs >= threshold + 1.0 {
        OutlierSeverity::Medium
    } else {
        OutlierSeverity::Low
    }
}

/// Durbin-Watson statistic: Σ(eₜ - eₜ₋₁)² / Σeₜ²
///
/// Near 2 means no first-order autocorrelation; toward 0 positive, toward 4
/// negative. Order matters: pass residuals sorted by the predictor.
pub fn durbin_watson(residuals: &[f64]) -> f64 {
    let ss: f64 = residuals.iter().map(|e| e * e).sum();
    if ss <= f64::EPSILON || residuals.len() < 2 {
        return 0.0;
    }
    let diff_ss: f64 = residuals.windows(2).map(|w| (w[1] - w[0]).powi(2)).sum();
    diff_ss / ss
}

/// Run residual diagnostics at the given σ threshold
///
/// `order` gives the predictor-sorted visit order for Durbin-Watson;
/// `labels` (optional) annotates flagged rows.
pub fn analyze(
    residuals: &[f64],
    order: &[usize],
    labels: Option<&[String]>,
    threshold: f64,
) -> ResidualDiagnostics {
    let data: Vec<f32> = residuals.iter().map(|&r| r as f32).collect();
    let v = Vector::from_slice(&data);
    let mean = v.mean().unwrap_or(0.0) as f64;
    let stddev = v.stddev().unwrap_or(0.0) as f64;

    let standardized: Vec<f64> = if stddev > 0.0 {
        residuals.iter().map(|r| (r - mean) / stddev).collect()
    } else {
        vec![0.0; residuals.len()]
    };

    let mut outliers: Vec<ResidualOutlier> = standardized
        .iter()
        .enumerate()
        .filter(|(_, z)| z.abs() > threshold)
        .map(|(row, &z)| ResidualOutlier {
            row,
            label: labels.and_then(|l| l.get(row).cloned()),
            residual: residuals[row],
            z_score: z,
            severity: classify(z.abs(), threshold),
        })
        .collect();
    outliers.sort_by(|a, b| {
        b.z_score
            .abs()
            .partial_cmp(&a.z_score.abs())
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let ordered: Vec<f64> = order.iter().map(|&i| residuals[i]).collect();

    ResidualDiagnostics {
        standardized,
        outliers,
        durbin_watson: durbin_watson(&ordered),
        threshold,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity_order(n: usize) -> Vec<usize> {
        (0..n).collect()
    }

    #[test]
    fn test_no_outliers_in_tight_residuals() {
        let residuals = vec![0.1, -0.1, 0.05, -0.05, 0.08, -0.08];
        let diag = analyze(&residuals, &identity_order(6), None, 3.0);

        assert!(diag.outliers.is_empty());
        assert_eq!(diag.standardized.len(), 6);
    }

    #[test]
    fn test_spike_is_flagged() {
        let mut residuals = vec![0.1, -0.1, 0.05, -0.05, 0.08, -0.12, 0.02, -0.03, 0.06, -0.04];
        residuals.push(5.0); // gross outlier

        let diag = analyze(&residuals, &identity_order(11), None, 2.0);

        assert_eq!(diag.outliers.len(), 1);
        assert_eq!(diag.outliers[0].row, 10);
        assert!(diag.outliers[0].z_score > 2.0);
    }

    #[test]
    fn test_outlier_carries_label() {
        let residuals = vec![0.1, -0.1, 0.0, 0.1, -0.1, 6.0];
        let labels: Vec<String> = ["a", "b", "c", "d", "e", "Chile"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let diag = analyze(&residuals, &identity_order(6), Some(&labels), 1.5);

        assert_eq!(diag.outliers[0].label.as_deref(), Some("Chile"));
    }

    #[test]
    fn test_durbin_watson_alternating_near_four() {
        // Perfectly alternating residuals: negative autocorrelation
        let residuals = vec![1.0, -1.0, 1.0, -1.0, 1.0, -1.0, 1.0, -1.0];
        let dw = durbin_watson(&residuals);
        assert!(dw > 3.0, "dw={}", dw);
    }

    #[test]
    fn test_durbin_watson_trending_near_zero() {
        // Slowly drifting residuals: positive autocorrelation
        let residuals = vec![-1.0, -0.8, -0.6, -0.4, -0.2, 0.0, 0.2, 0.4, 0.6, 0.8, 1.0];
        let dw = durbin_watson(&residuals);
        assert!(dw < 1.0, "dw={}", dw);
    }

    #[test]
    fn test_durbin_watson_respects_order() {
        let residuals = vec![1.0, -1.0, 1.0, -1.0];
        // Visiting in an order that groups the signs flips the verdict
        let grouped = analyze(&residuals, &[0, 2, 1, 3], None, 3.0);
        let alternating = analyze(&residuals, &[0, 1, 2, 3], None, 3.0);

        assert!(grouped.durbin_watson < alternating.durbin_watson);
    }

    #[test]
    fn test_constant_residuals_no_panic() {
        let residuals = vec![0.0; 5];
        let diag = analyze(&residuals, &identity_order(5), None, 3.0);
        assert!(diag.outliers.is_empty());
        assert_eq!(diag.durbin_watson, 0.0);
    }

    #[test]
    fn test_severity_escalates() {
        assert_eq!(classify(3.5, 3.0), OutlierSeverity::Low);
        assert_eq!(classify(4.5, 3.0), OutlierSeverity::Medium);
        assert_eq!(classify(5.5, 3.0), OutlierSeverity::High);
    }
}
