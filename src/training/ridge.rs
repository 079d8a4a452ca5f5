//! Ridge-regularized linear least squares with an unpenalized bias term

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Singular values at or below `PINV_RCOND · σ_max` count as zero in the
/// pseudoinverse of the normal equations.
pub const PINV_RCOND: f64 = 1e-12;

/// Fitted linear surrogate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainedModel {
    /// One weight per feature followed by the bias.
    pub weights: Vec<f64>,
    /// Feature names, aligned with `weights`.
    pub feature_names: Vec<String>,
    /// Provenance of the training data.
    pub dataset_source: String,
}

impl TrainedModel {
    /// Feature weights without the bias.
    #[must_use]
    pub fn coefficients(&self) -> &[f64] {
        &self.weights[..self.weights.len().saturating_sub(1)]
    }

    /// Bias (intercept) term.
    #[must_use]
    pub fn bias(&self) -> f64 {
        self.weights.last().copied().unwrap_or(0.0)
    }

    /// Predictions for every row of `x`.
    #[must_use]
    pub fn predict(&self, x: &DMatrix<f64>) -> Vec<f64> {
        predict(x, &self.weights)
    }
}

fn with_bias_column(x: &DMatrix<f64>) -> DMatrix<f64> {
    x.clone().insert_column(x.ncols(), 1.0)
}

/// SVD pseudoinverse with a cutoff relative to the largest singular value.
///
/// # Errors
/// Returns `Other` if the decomposition rejects the cutoff
pub fn pseudo_inverse(a: DMatrix<f64>) -> Result<DMatrix<f64>> {
    let svd = a.svd(true, true);
    let cutoff = PINV_RCOND * svd.singular_values.amax();
    svd.pseudo_inverse(cutoff)
        .map_err(|e| Error::Other(format!("pseudoinverse failed: {e}")))
}

/// Solve `(XᵀX + λ·I') w = Xᵀy` over `X` augmented with a bias column, where
/// `I'` is the identity with the bias entry zeroed.
///
/// The pseudoinverse keeps rank-deficient inputs (duplicate or constant
/// columns) solvable and returns the minimum-norm solution for them.
///
/// # Errors
/// Returns `DatasetFormat` if `y` does not match the row count of `x`
pub fn fit_ridge(x: &DMatrix<f64>, y: &[f64], ridge_lambda: f64) -> Result<Vec<f64>> {
    if y.len() != x.nrows() {
        return Err(Error::DatasetFormat(format!(
            "{} targets for {} feature rows",
            y.len(),
            x.nrows()
        )));
    }
    let aug = with_bias_column(x);
    let n = aug.ncols();

    let mut penalty = DMatrix::<f64>::identity(n, n);
    penalty[(n - 1, n - 1)] = 0.0;

    let xt = aug.transpose();
    let a = &xt * &aug + penalty * ridge_lambda;
    let b = &xt * DVector::from_column_slice(y);
    let w = pseudo_inverse(a)? * b;
    Ok(w.iter().copied().collect())
}

/// `[X | 1] · weights`
///
/// Weights beyond the feature count plus bias are ignored; missing ones
/// count as zero.
#[must_use]
pub fn predict(x: &DMatrix<f64>, weights: &[f64]) -> Vec<f64> {
    let aug = with_bias_column(x);
    let w = DVector::from_fn(aug.ncols(), |i, _| weights.get(i).copied().unwrap_or(0.0));
    (aug * w).iter().copied().collect()
}
