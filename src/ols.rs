//! Ordinary least squares with coefficient inference
//!
//! Coefficients come from aprender's `LinearRegression` (crates.io), not a
//! custom solver. What aprender does not expose is the coefficient
//! covariance, so standard errors, t-statistics and p-values are derived
//! here in f64 from (XᵀX)⁻¹ and the residual variance.
//!
//! Scientific Foundation:
//! - Greene, W. (2012). Econometric Analysis, 7th ed. §3-4 (classical OLS
//!   inference: Var(b) = s²(XᵀX)⁻¹, F test of overall significance).

use crate::distributions::{f_sf, student_t_two_sided};
use anyhow::Result;
use aprender::prelude::*;

/// One fitted coefficient with its sampling statistics
#[derive(Debug, Clone)]
pub struct CoefficientEstimate {
    pub term: String,
    pub estimate: f64,
    pub std_error: f64,
    pub t_statistic: f64,
    pub p_value: f64,
}

/// A fitted OLS model with residual-based fit measures
#[derive(Debug, Clone)]
pub struct OlsModel {
    pub response: String,
    /// Intercept first, then one entry per term in input order
    pub coefficients: Vec<CoefficientEstimate>,
    pub fitted: Vec<f64>,
    pub residuals: Vec<f64>,
    pub r_squared: f64,
    pub adj_r_squared: f64,
    pub f_statistic: f64,
    pub f_pvalue: f64,
    pub n_observations: usize,
    pub df_residual: usize,
}

impl OlsModel {
    /// Point prediction for one observation; `values` holds one value per
    /// non-intercept term, in fit order
    pub fn predict(&self, values: &[f64]) -> f64 {
        let intercept = self.coefficients[0].estimate;
        intercept
            + self.coefficients[1..]
                .iter()
                .zip(values)
                .map(|(c, v)| c.estimate * v)
                .sum::<f64>()
    }

    /// Names of the non-intercept terms
    pub fn terms(&self) -> Vec<&str> {
        self.coefficients[1..].iter().map(|c| c.term.as_str()).collect()
    }
}

/// Invert a symmetric positive-definite matrix via Gauss-Jordan elimination
/// with partial pivoting; errors on singular input
fn invert(mut a: Vec<Vec<f64>>) -> Result<Vec<Vec<f64>>> {
    let n = a.len();
    let scale = a
        .iter()
        .flat_map(|row| row.iter().map(|v| v.abs()))
        .fold(0.0_f64, f64::max)
        .max(1.0);

    let mut inv: Vec<Vec<f64>> = (0..n)
        .map(|i| (0..n).map(|j| if i == j { 1.0 } else { 0.0 }).collect())
        .collect();

    for col in 0..n {
        // Partial pivot: largest magnitude on or below the diagonal
        let pivot_row = (col..n)
            .max_by(|&a_i, &b_i| {
                a[a_i][col]
                    .abs()
                    .partial_cmp(&a[b_i][col].abs())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .unwrap_or(col);

        if a[pivot_row][col].abs() < 1e-10 * scale {
            anyhow::bail!(
                "design matrix is singular; check for collinear or constant predictors"
            );
        }

        a.swap(col, pivot_row);
        inv.swap(col, pivot_row);

        let pivot = a[col][col];
        for j in 0..n {
            a[col][j] /= pivot;
            inv[col][j] /= pivot;
        }

        for row in 0..n {
            if row == col {
                continue;
            }
            let factor = a[row][col];
            for j in 0..n {
                a[row][j] -= factor * a[col][j];
                inv[row][j] -= factor * inv[col][j];
            }
        }
    }

    Ok(inv)
}

/// Fit `response ~ terms` by OLS with an intercept
///
/// `terms` holds (name, values) pairs forming the design matrix columns.
pub fn fit(response: &str, y: &[f64], terms: &[(String, Vec<f64>)]) -> Result<OlsModel> {
    let n = y.len();
    let k = terms.len();

    if k == 0 {
        anyhow::bail!("model needs at least one predictor term");
    }
    for (name, values) in terms {
        if values.len() != n {
            anyhow::bail!(
                "term '{}' has {} values but response '{}' has {}",
                name,
                values.len(),
                response,
                n
            );
        }
    }
    if n <= k + 1 {
        anyhow::bail!(
            "need more than {} observations to fit {} terms plus intercept, got {}",
            k + 1,
            k,
            n
        );
    }

    // Estimate coefficients with aprender (row-major n x k design)
    let mut data = Vec::with_capacity(n * k);
    for row in 0..n {
        for (_, values) in terms {
            data.push(values[row] as f32);
        }
    }
    let x = Matrix::from_vec(n, k, data)
        .map_err(|e| anyhow::anyhow!("failed to build design matrix: {:?}", e))?;
    let y_vec = Vector::from_vec(y.iter().map(|&v| v as f32).collect());

    let mut model = LinearRegression::new();
    model
        .fit(&x, &y_vec)
        .map_err(|e| anyhow::anyhow!("OLS fit failed: {}", e))?;

    let intercept = model.intercept() as f64;
    let betas: Vec<f64> = model
        .coefficients()
        .as_slice()
        .iter()
        .map(|&b| b as f64)
        .collect();

    // Fitted values and residuals in f64 from the estimated coefficients
    let fitted: Vec<f64> = (0..n)
        .map(|row| {
            intercept
                + terms
                    .iter()
                    .zip(&betas)
                    .map(|((_, values), b)| b * values[row])
                    .sum::<f64>()
        })
        .collect();
    let residuals: Vec<f64> = y.iter().zip(&fitted).map(|(obs, fit)| obs - fit).collect();

    let y_mean = y.iter().sum::<f64>() / n as f64;
    let ss_total: f64 = y.iter().map(|v| (v - y_mean).powi(2)).sum();
    let ss_residual: f64 = residuals.iter().map(|r| r * r).sum();

    if ss_total <= f64::EPSILON {
        anyhow::bail!("response '{}' is constant; nothing to model", response);
    }

    let df_residual = n - k - 1;
    let r_squared = 1.0 - ss_residual / ss_total;
    let adj_r_squared = 1.0 - (1.0 - r_squared) * (n as f64 - 1.0) / df_residual as f64;

    let f_statistic = (r_squared / k as f64) / ((1.0 - r_squared).max(f64::EPSILON) / df_residual as f64);
    let f_pvalue = f_sf(f_statistic, k as f64, df_residual as f64);

    // Coefficient covariance: s² (XᵀX)⁻¹ on the intercept-augmented design
    let p = k + 1;
    let mut xtx = vec![vec![0.0_f64; p]; p];
    let design_col = |j: usize, row: usize| -> f64 {
        if j == 0 {
            1.0
        } else {
            terms[j - 1].1[row]
        }
    };
    for i in 0..p {
        for j in i..p {
            let mut sum = 0.0;
            for row in 0..n {
                sum += design_col(i, row) * design_col(j, row);
            }
            xtx[i][j] = sum;
            xtx[j][i] = sum;
        }
    }
    let xtx_inv = invert(xtx)?;
    let sigma2 = ss_residual / df_residual as f64;

    let mut coefficients = Vec::with_capacity(p);
    let estimates: Vec<(String, f64)> = std::iter::once(("Intercept".to_string(), intercept))
        .chain(terms.iter().zip(&betas).map(|((name, _), &b)| (name.clone(), b)))
        .collect();

    for (j, (term, estimate)) in estimates.into_iter().enumerate() {
        let variance = (sigma2 * xtx_inv[j][j]).max(0.0);
        let std_error = variance.sqrt();
        let t_statistic = if std_error > 0.0 {
            estimate / std_error
        } else {
            f64::INFINITY
        };
        let p_value = student_t_two_sided(t_statistic, df_residual as f64);

        coefficients.push(CoefficientEstimate {
            term,
            estimate,
            std_error,
            t_statistic,
            p_value,
        });
    }

    Ok(OlsModel {
        response: response.to_string(),
        coefficients,
        fitted,
        residuals,
        r_squared,
        adj_r_squared,
        f_statistic,
        f_pvalue,
        n_observations: n,
        df_residual,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn term(name: &str, values: &[f64]) -> (String, Vec<f64>) {
        (name.to_string(), values.to_vec())
    }

    #[test]
    fn test_fit_exact_line() {
        // y = 2x + 1, no noise
        let x: Vec<f64> = (1..=10).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|v| 2.0 * v + 1.0).collect();

        let model = fit("y", &y, &[term("x", &x)]).unwrap();

        assert!((model.coefficients[0].estimate - 1.0).abs() < 1e-2);
        assert!((model.coefficients[1].estimate - 2.0).abs() < 1e-3);
        assert!(model.r_squared > 0.999);
        assert!(model.coefficients[1].p_value < 1e-6);
        assert_eq!(model.n_observations, 10);
        assert_eq!(model.df_residual, 8);
    }

    #[test]
    fn test_dummy_coefficients_are_group_mean_shifts() {
        // Two groups: reference mean 4.0, indicator group mean 9.0
        let indicator = vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0];
        let y = vec![3.8, 4.0, 4.2, 8.8, 9.0, 9.2];

        let model = fit("y", &y, &[term("grupo_b", &indicator)]).unwrap();

        assert!((model.coefficients[0].estimate - 4.0).abs() < 1e-2);
        assert!((model.coefficients[1].estimate - 5.0).abs() < 1e-2);
    }

    #[test]
    fn test_unrelated_predictor_not_significant() {
        let x = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
        let y = vec![5.1, 4.9, 5.05, 5.0, 4.95, 5.02, 4.97, 5.06];

        let model = fit("y", &y, &[term("x", &x)]).unwrap();

        assert!(model.coefficients[1].p_value > 0.05);
        assert!(model.r_squared < 0.5);
    }

    #[test]
    fn test_collinear_terms_rejected() {
        let x = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let y = vec![2.0, 4.0, 6.0, 8.0, 10.0, 12.0];

        let result = fit("y", &y, &[term("x", &x), term("x_copy", &x)]);
        assert!(result.is_err());
    }

    #[test]
    fn test_too_few_observations() {
        let result = fit("y", &[1.0, 2.0], &[term("x", &[1.0, 2.0])]);
        assert!(result.is_err());
    }

    #[test]
    fn test_length_mismatch() {
        let result = fit("y", &[1.0, 2.0, 3.0], &[term("x", &[1.0, 2.0])]);
        assert!(result.is_err());
    }

    #[test]
    fn test_constant_response_rejected() {
        let x = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let y = vec![7.0; 5];
        assert!(fit("y", &y, &[term("x", &x)]).is_err());
    }

    #[test]
    fn test_predict_matches_fitted() {
        let x: Vec<f64> = (1..=8).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|v| 3.0 * v - 2.0).collect();

        let model = fit("y", &y, &[term("x", &x)]).unwrap();

        for (i, &xv) in x.iter().enumerate() {
            assert!((model.predict(&[xv]) - model.fitted[i]).abs() < 1e-9);
        }
    }

    #[test]
    fn test_residuals_sum_near_zero() {
        let x: Vec<f64> = (1..=12).map(|i| i as f64).collect();
        let y: Vec<f64> = x
            .iter()
            .enumerate()
            .map(|(i, v)| 1.5 * v + if i % 2 == 0 { 0.3 } else { -0.3 })
            .collect();

        let model = fit("y", &y, &[term("x", &x)]).unwrap();
        let total: f64 = model.residuals.iter().sum();

        // Intercept absorbs the residual mean
        assert!(total.abs() < 1e-2);
    }
}
