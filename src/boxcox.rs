//! Box-Cox power transform of a positive response
//!
//! λ is chosen by maximizing the profile log-likelihood with a
//! golden-section search over [-5, 5]; the same bracket scipy uses by
//! default. The transform and its exact inverse let predictions made on
//! the transformed scale be reported on the original one.
//!
//! Scientific Foundation:
//! - Box, G.E.P. & Cox, D.R. (1964). An analysis of transformations.
//!   JRSS B 26(2).

use anyhow::Result;
use trueno::Vector;

/// λ search bracket
const LAMBDA_MIN: f64 = -5.0;
const LAMBDA_MAX: f64 = 5.0;
/// λ within this of zero is treated as the log transform
const LOG_EPSILON: f64 = 1e-6;

/// A fitted Box-Cox transform
#[derive(Debug, Clone)]
pub struct BoxCox {
    pub lambda: f64,
    /// Profile log-likelihood at the chosen λ
    pub log_likelihood: f64,
}

/// y⁽λ⁾ for one value: (yᵡ - 1)/λ, or ln y when λ ≈ 0
pub fn transform_value(y: f64, lambda: f64) -> f64 {
    if lambda.abs() < LOG_EPSILON {
        y.ln()
    } else {
        (y.powf(lambda) - 1.0) / lambda
    }
}

/// Inverse transform back to the original scale
pub fn inverse_value(t: f64, lambda: f64) -> f64 {
    if lambda.abs() < LOG_EPSILON {
        t.exp()
    } else {
        (lambda * t + 1.0).powf(1.0 / lambda)
    }
}

/// Profile log-likelihood of λ for the sample
///
/// llf(λ) = -n/2 · ln σ̂²(y⁽λ⁾) + (λ - 1) Σ ln yᵢ
fn log_likelihood(values: &[f64], lambda: f64) -> f64 {
    let n = values.len() as f64;
    let transformed: Vec<f32> = values
        .iter()
        .map(|&y| transform_value(y, lambda) as f32)
        .collect();

    let variance = Vector::from_slice(&transformed).variance().unwrap_or(0.0) as f64;
    if variance <= 0.0 {
        return f64::NEG_INFINITY;
    }

    let log_sum: f64 = values.iter().map(|y| y.ln()).sum();
    -n / 2.0 * variance.ln() + (lambda - 1.0) * log_sum
}

impl BoxCox {
    /// Fit λ by golden-section maximization of the profile log-likelihood
    ///
    /// Requires at least 3 strictly positive values.
    pub fn fit(values: &[f64]) -> Result<Self> {
        if values.len() < 3 {
            anyhow::bail!(
                "Box-Cox needs at least 3 observations, got {}",
                values.len()
            );
        }
        if let Some(bad) = values.iter().find(|&&y| y <= 0.0 || !y.is_finite()) {
            anyhow::bail!(
                "Box-Cox requires a strictly positive response, found {}",
                bad
            );
        }

        // Golden-section search: unimodal in practice over this bracket
        let phi = (5.0_f64.sqrt() - 1.0) / 2.0;
        let mut a = LAMBDA_MIN;
        let mut b = LAMBDA_MAX;
        let mut c = b - phi * (b - a);
        let mut d = a + phi * (b - a);
        let mut fc = log_likelihood(values, c);
        let mut fd = log_likelihood(values, d);

        while (b - a).abs() > 1e-6 {
            if fc > fd {
                b = d;
                d = c;
                fd = fc;
                c = b - phi * (b - a);
                fc = log_likelihood(values, c);
            } else {
                a = c;
                c = d;
                fc = fd;
                d = a + phi * (b - a);
                fd = log_likelihood(values, d);
            }
        }

        let lambda = (a + b) / 2.0;
        Ok(Self {
            lambda,
            log_likelihood: log_likelihood(values, lambda),
        })
    }

    /// Transform a whole response column
    pub fn transform(&self, values: &[f64]) -> Vec<f64> {
        values
            .iter()
            .map(|&y| transform_value(y, self.lambda))
            .collect()
    }

    /// Map a transformed-scale value back to the original scale
    pub fn inverse(&self, t: f64) -> f64 {
        inverse_value(t, self.lambda)
    }
}
