//! Experiment datasets
//!
//! A [`Dataset`] bundles the feature matrix, the target vector and, for
//! generated training data, the coefficients the targets were drawn from.

mod loader;

pub use loader::{DatasetFormat, DatasetLoader};

use crate::error::{HarnessError, Result};
use ndarray::{Array1, Array2};

/// Feature matrix, target vector and optional ground-truth coefficients.
///
/// Immutable once constructed; the constructor enforces the shape
/// invariants every consumer relies on.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    x: Array2<f64>,
    y: Array1<f64>,
    true_coef: Option<Array1<f64>>,
}

impl Dataset {
    /// Build a dataset, checking that `x` has one row per target, at least
    /// one sample and feature, and that `true_coef` has one entry per feature.
    pub fn new(x: Array2<f64>, y: Array1<f64>, true_coef: Option<Array1<f64>>) -> Result<Self> {
        if x.nrows() != y.len() {
            return Err(HarnessError::DimensionMismatch {
                expected: format!("{} targets (one per row of X)", x.nrows()),
                actual: format!("{} targets", y.len()),
            });
        }
        if x.nrows() == 0 {
            return Err(HarnessError::InvalidArgument(
                "dataset has no samples".to_string(),
            ));
        }
        if x.ncols() == 0 {
            return Err(HarnessError::InvalidArgument(
                "dataset has no features".to_string(),
            ));
        }
        if let Some(coef) = &true_coef {
            if coef.len() != x.ncols() {
                return Err(HarnessError::DimensionMismatch {
                    expected: format!("{} coefficients (one per feature)", x.ncols()),
                    actual: format!("{} coefficients", coef.len()),
                });
            }
        }
        Ok(Self { x, y, true_coef })
    }

    pub fn x(&self) -> &Array2<f64> {
        &self.x
    }

    pub fn y(&self) -> &Array1<f64> {
        &self.y
    }

    pub fn true_coef(&self) -> Option<&Array1<f64>> {
        self.true_coef.as_ref()
    }

    pub fn n_samples(&self) -> usize {
        self.x.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.x.ncols()
    }

    /// Drop the ground-truth coefficients. Test datasets never carry them.
    pub fn without_true_coef(mut self) -> Self {
        self.true_coef = None;
        self
    }
}
