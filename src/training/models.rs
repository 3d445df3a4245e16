//! Model adapter traits
//!
//! Every regression algorithm the harness can evaluate is an [`Estimator`]:
//! fitting never mutates the estimator, it hands back a fresh [`Predictor`]
//! owned by whoever asked for the fit.

use crate::error::{HarnessError, Result};
use ndarray::{Array1, ArrayView1, ArrayView2};

/// A configured, unfitted regression algorithm
pub trait Estimator {
    /// Fitted model produced by [`Estimator::fit`]
    type Fitted: Predictor;

    /// Short lowercase name used in report headers
    fn name(&self) -> &'static str;

    /// Fit the model to training data
    fn fit(&self, x: ArrayView2<'_, f64>, y: ArrayView1<'_, f64>) -> Result<Self::Fitted>;
}

/// A fitted model
pub trait Predictor {
    /// Number of features seen during fitting
    fn n_features(&self) -> usize;

    /// Predict one value per row of `x`
    fn predict(&self, x: ArrayView2<'_, f64>) -> Result<Array1<f64>>;

    /// Fitted coefficients, for linear models only
    fn coefficients(&self) -> Option<ArrayView1<'_, f64>> {
        None
    }
}

/// Reject a training set whose target length disagrees with the row count
pub(crate) fn check_training_shapes(x: &ArrayView2<'_, f64>, y: &ArrayView1<'_, f64>) -> Result<()> {
    if x.nrows() != y.len() {
        return Err(HarnessError::DimensionMismatch {
            expected: format!("y length = {}", x.nrows()),
            actual: format!("y length = {}", y.len()),
        });
    }
    if x.nrows() == 0 {
        return Err(HarnessError::Fit("cannot fit on an empty training set".to_string()));
    }
    Ok(())
}

/// Reject a prediction matrix whose width differs from the training data
pub(crate) fn check_feature_count(expected: usize, x: &ArrayView2<'_, f64>) -> Result<()> {
    if x.ncols() != expected {
        return Err(HarnessError::DimensionMismatch {
            expected: format!("{} features", expected),
            actual: format!("{} features", x.ncols()),
        });
    }
    Ok(())
}
