//! Regression metrics

use serde::{Deserialize, Serialize};

/// MSE, MAE and R2 of one prediction set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionMetrics {
    /// Mean squared residual.
    pub mse: f64,
    /// Mean absolute residual.
    pub mae: f64,
    /// Coefficient of determination.
    pub r2: f64,
}

impl RegressionMetrics {
    /// Score `predicted` against `actual`.
    ///
    /// A constant target (zero total sum of squares) scores R2 = 1.0 only
    /// when the residual is also zero, else 0.0.
    #[must_use]
    pub fn compute(actual: &[f64], predicted: &[f64]) -> Self {
        let n = actual.len();
        if n == 0 {
            return Self {
                mse: 0.0,
                mae: 0.0,
                r2: 0.0,
            };
        }
        #[allow(clippy::cast_precision_loss)]
        let count = n as f64;

        let (sse, sae) = actual
            .iter()
            .zip(predicted)
            .fold((0.0, 0.0), |(sse, sae), (t, p)| {
                let e = t - p;
                (e.mul_add(e, sse), sae + e.abs())
            });
        let mse = sse / count;
        let mae = sae / count;

        let mean = actual.iter().sum::<f64>() / count;
        let sst: f64 = actual.iter().map(|t| (t - mean).powi(2)).sum();
        let r2 = if sst == 0.0 {
            if mse == 0.0 {
                1.0
            } else {
                0.0
            }
        } else {
            1.0 - sse / sst
        };

        Self { mse, mae, r2 }
    }

    /// MAE divided by the target range, so gates compare across units.
    /// Falls back to the raw MAE for a constant target.
    #[must_use]
    pub fn normalized_mae(&self, actual: &[f64]) -> f64 {
        let (lo, hi) = actual
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        let range = hi - lo;
        if range.is_finite() && range > 0.0 {
            self.mae / range
        } else {
            self.mae
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfect_prediction() {
        let y = [1.0, 2.0, 3.0];
        let m = RegressionMetrics::compute(&y, &y);
        assert_eq!(m, RegressionMetrics { mse: 0.0, mae: 0.0, r2: 1.0 });
    }

    #[test]
    fn test_known_values() {
        let m = RegressionMetrics::compute(&[1.0, 2.0, 3.0, 4.0], &[1.0, 2.0, 3.0, 6.0]);
        assert!((m.mse - 1.0).abs() < 1e-12);
        assert!((m.mae - 0.5).abs() < 1e-12);
        // sst = 5, sse = 4
        assert!((m.r2 - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_constant_target_convention() {
        assert!((RegressionMetrics::compute(&[2.0, 2.0], &[2.0, 2.0]).r2 - 1.0).abs() < f64::EPSILON);
        assert!(RegressionMetrics::compute(&[2.0, 2.0], &[2.0, 3.0]).r2.abs() < f64::EPSILON);
    }

    #[test]
    fn test_normalized_mae() {
        let y = [0.0, 10.0];
        let m = RegressionMetrics::compute(&y, &[1.0, 9.0]);
        assert!((m.normalized_mae(&y) - 0.1).abs() < 1e-12);

        let flat = [3.0, 3.0];
        let m = RegressionMetrics::compute(&flat, &[4.0, 4.0]);
        assert!((m.normalized_mae(&flat) - 1.0).abs() < 1e-12);
    }
}
