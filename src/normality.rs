//! Residual normality testing (Shapiro-Francia)
//!
//! W′ is the squared correlation between the ordered residuals and the
//! expected normal order statistics (Blom scores). The p-value uses
//! Royston's normal approximation for ln(1 - W′), valid for 5 ≤ n ≤ 5000.
//!
//! Scientific Foundation:
//! - Shapiro, S. & Francia, R. (1972). An approximate analysis of variance
//!   test for normality. JASA 67.
//! - Royston, P. (1993). A pocket-calculator algorithm for the
//!   Shapiro-Francia test for non-normality. Statistics in Medicine 12.

use crate::distributions::{normal_ppf, normal_sf};

/// Sample size bounds of Royston's approximation
const MIN_SAMPLES: usize = 5;
const MAX_SAMPLES: usize = 5000;

/// Verdict on residual normality at a significance level
#[derive(Debug, Clone, PartialEq)]
pub enum NormalityVerdict {
    /// Fail to reject H0: residuals compatible with a normal distribution
    Normal,

    /// Reject H0: residuals depart from normality (p < alpha)
    NonNormal,

    /// Not enough observations for the approximation to hold
    InsufficientData { reason: String },
}

/// Shapiro-Francia test result
#[derive(Debug, Clone)]
pub struct NormalityTest {
    /// W′ statistic in (0, 1]; closer to 1 is more normal
    pub statistic: f64,
    /// Upper-tail p-value from Royston's z approximation
    pub p_value: f64,
    /// Significance level the verdict used
    pub alpha: f64,
    pub n: usize,
    pub verdict: NormalityVerdict,
}

impl NormalityTest {
    /// Generate human-readable report
    pub fn to_report_string(&self) -> String {
        let mut report = String::new();

        match &self.verdict {
            NormalityVerdict::Normal => {
                report.push_str("✅ RESIDUALS COMPATIBLE WITH NORMALITY\n\n");
                report.push_str(&format!(
                    "Shapiro-Francia W' = {:.4}, p = {:.4} (alpha = {})\n",
                    self.statistic, self.p_value, self.alpha
                ));
                report.push_str("H0 not rejected: inference on the coefficients stands.\n");
            }
            NormalityVerdict::NonNormal => {
                report.push_str("❌ RESIDUALS DEPART FROM NORMALITY\n\n");
                report.push_str(&format!(
                    "Shapiro-Francia W' = {:.4}, p = {:.4} (alpha = {})\n",
                    self.statistic, self.p_value, self.alpha
                ));
                report.push_str(
                    "H0 rejected: consider a Box-Cox transform of the response (--boxcox).\n",
                );
            }
            NormalityVerdict::InsufficientData { reason } => {
                report.push_str("⚠️  INSUFFICIENT DATA FOR NORMALITY TEST\n\n");
                report.push_str(&format!("Reason: {}\n", reason));
            }
        }

        report
    }
}

/// Shapiro-Francia normality test at significance level `alpha`
pub fn shapiro_francia(values: &[f64], alpha: f64) -> NormalityTest {
    let n = values.len();

    if !(MIN_SAMPLES..=MAX_SAMPLES).contains(&n) {
        return NormalityTest {
            statistic: f64::NAN,
            p_value: f64::NAN,
            alpha,
            n,
            verdict: NormalityVerdict::InsufficientData {
                reason: format!(
                    "Royston's approximation needs {} to {} observations, got {}",
                    MIN_SAMPLES, MAX_SAMPLES, n
                ),
            },
        };
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    // Blom scores: m_i = Φ⁻¹((i - 3/8) / (n + 1/4)), i = 1..n
    let scores: Vec<f64> = (1..=n)
        .map(|i| normal_ppf((i as f64 - 0.375) / (n as f64 + 0.25)))
        .collect();

    let statistic = squared_correlation(&sorted, &scores);

    // Royston (1993): z = (ln(1 - W') - mu) / sigma is ~N(0,1) under H0
    let nu = (n as f64).ln();
    let u1 = nu.ln() - nu;
    let u2 = nu.ln() + 2.0 / nu;
    let mu = -1.2725 + 1.0521 * u1;
    let sigma = 1.0308 - 0.26758 * u2;

    let z = ((1.0 - statistic).max(1e-12).ln() - mu) / sigma;
    let p_value = normal_sf(z).clamp(0.0, 1.0);

    let verdict = if p_value < alpha {
        NormalityVerdict::NonNormal
    } else {
        NormalityVerdict::Normal
    };

    NormalityTest {
        statistic,
        p_value,
        alpha,
        n,
        verdict,
    }
}

/// Squared Pearson correlation of two equal-length samples
fn squared_correlation(a: &[f64], b: &[f64]) -> f64 {
    let n = a.len() as f64;
    let mean_a = a.iter().sum::<f64>() / n;
    let mean_b = b.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for (x, y) in a.iter().zip(b) {
        let dx = x - mean_a;
        let dy = y - mean_b;
        cov += dx * dy;
        var_a += dx * dx;
        var_b += dy * dy;
    }

    if var_a <= f64::EPSILON || var_b <= f64::EPSILON {
        return 0.0;
    }
    (cov * cov) / (var_a * var_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Deterministic near-normal sample: normal quantiles at evenly spaced
    /// probabilities are a perfect order-statistic draw
    fn normal_like(n: usize) -> Vec<f64> {
        (1..=n)
            .map(|i| normal_ppf(i as f64 / (n as f64 + 1.0)))
            .collect()
    }

    #[test]
    fn test_normal_sample_not_rejected() {
        let test = shapiro_francia(&normal_like(30), 0.05);

        assert_eq!(test.verdict, NormalityVerdict::Normal);
        assert!(test.statistic > 0.97, "W'={}", test.statistic);
        assert!(test.p_value > 0.05);
    }

    #[test]
    fn test_skewed_sample_rejected() {
        // Exponential-ish growth: heavily right-skewed
        let values: Vec<f64> = (1..=30).map(|i| (i as f64 * 0.3).exp()).collect();
        let test = shapiro_francia(&values, 0.05);

        assert_eq!(test.verdict, NormalityVerdict::NonNormal);
        assert!(test.p_value < 0.05, "p={}", test.p_value);
    }

    #[test]
    fn test_small_sample_insufficient() {
        let test = shapiro_francia(&[1.0, 2.0, 3.0], 0.05);
        assert!(matches!(
            test.verdict,
            NormalityVerdict::InsufficientData { .. }
        ));
        assert!(test.statistic.is_nan());
    }

    #[test]
    fn test_statistic_bounded() {
        let values: Vec<f64> = (1..=50).map(|i| (i % 7) as f64 + 0.1 * i as f64).collect();
        let test = shapiro_francia(&values, 0.05);

        assert!(test.statistic > 0.0 && test.statistic <= 1.0);
        assert!((0.0..=1.0).contains(&test.p_value));
    }

    #[test]
    fn test_report_strings() {
        let normal = shapiro_francia(&normal_like(25), 0.05);
        assert!(normal.to_report_string().contains("COMPATIBLE WITH NORMALITY"));

        let skewed: Vec<f64> = (1..=25).map(|i| (i as f64 * 0.4).exp()).collect();
        let rejected = shapiro_francia(&skewed, 0.05);
        assert!(rejected.to_report_string().contains("DEPART FROM NORMALITY"));
        assert!(rejected.to_report_string().contains("Box-Cox"));

        let tiny = shapiro_francia(&[1.0], 0.05);
        assert!(tiny.to_report_string().contains("INSUFFICIENT"));
    }

    #[test]
    fn test_squared_correlation_perfect_line() {
        let a = vec![1.0, 2.0, 3.0, 4.0];
        let b = vec![2.0, 4.0, 6.0, 8.0];
        assert!((squared_correlation(&a, &b) - 1.0).abs() < 1e-12);
    }
}
