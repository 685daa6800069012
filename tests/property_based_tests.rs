//! Property-based tests for the numeric core
//!
//! Invariants that must hold for arbitrary well-formed inputs, not just
//! the fixtures.

use proptest::prelude::*;
use regresar::boxcox::{inverse_value, transform_value};
use regresar::describe::DescriptiveSummary;
use regresar::normality::shapiro_francia;
use regresar::ols;
use regresar::spline::CubicSpline;

proptest! {
    /// OLS recovers an exact line to within solver precision
    #[test]
    fn ols_recovers_exact_line(
        slope in -50.0_f64..50.0,
        intercept in -100.0_f64..100.0,
    ) {
        prop_assume!(slope.abs() > 0.01);

        let x: Vec<f64> = (1..=20).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|v| slope * v + intercept).collect();

        let model = ols::fit("y", &y, &[("x".to_string(), x)]).unwrap();

        let est_intercept = model.coefficients[0].estimate;
        let est_slope = model.coefficients[1].estimate;
        prop_assert!((est_slope - slope).abs() < 1e-2 * slope.abs().max(1.0));
        prop_assert!((est_intercept - intercept).abs() < 0.15 * intercept.abs().max(1.0));
        prop_assert!(model.r_squared > 0.999);
    }

    /// Box-Cox transform and inverse are bijective on positive reals
    #[test]
    fn boxcox_round_trip(
        lambda in -3.0_f64..3.0,
        y in 0.01_f64..1000.0,
    ) {
        let t = transform_value(y, lambda);
        let back = inverse_value(t, lambda);
        prop_assert!((back - y).abs() < 1e-6 * y.max(1.0), "y={} back={}", y, back);
    }

    /// Summary statistics stay inside the sample range
    #[test]
    fn describe_within_bounds(values in proptest::collection::vec(-1e4_f64..1e4, 2..60)) {
        let summary = DescriptiveSummary::from_values("v", &values);

        prop_assert!(summary.min <= summary.p25 + 1e-3);
        prop_assert!(summary.p25 <= summary.median + 1e-3);
        prop_assert!(summary.median <= summary.p75 + 1e-3);
        prop_assert!(summary.p75 <= summary.max + 1e-3);
        // f32 accumulation slack on wide samples
        prop_assert!(summary.mean >= summary.min - 0.5);
        prop_assert!(summary.mean <= summary.max + 0.5);
    }

    /// A natural cubic spline passes through every knot
    #[test]
    fn spline_interpolates_knots(ys in proptest::collection::vec(-100.0_f64..100.0, 3..12)) {
        let xs: Vec<f64> = (0..ys.len()).map(|i| i as f64).collect();
        let spline = CubicSpline::fit(&xs, &ys).unwrap();

        for (x, y) in xs.iter().zip(&ys) {
            prop_assert!((spline.eval(*x) - y).abs() < 1e-7);
        }
    }

    /// The normality p-value is always a probability
    #[test]
    fn normality_p_value_bounded(values in proptest::collection::vec(-1e3_f64..1e3, 5..200)) {
        let spread = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max)
            - values.iter().cloned().fold(f64::INFINITY, f64::min);
        prop_assume!(spread > 1e-6);

        let test = shapiro_francia(&values, 0.05);
        prop_assert!((0.0..=1.0).contains(&test.p_value));
        prop_assert!(test.statistic > 0.0 && test.statistic <= 1.0 + 1e-9);
    }
}
