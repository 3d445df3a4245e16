//! Harness configuration
//!
//! Everything the surrounding experiment tooling used to keep in global
//! settings lives in one immutable [`HarnessConfig`] that is built once at
//! startup and passed down explicitly.

use crate::error::{HarnessError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for an experiment run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Number of cross-validation folds
    pub n_folds: usize,

    /// Shuffle sample indices before cutting folds
    pub shuffle: bool,

    /// Seed used when the invocation does not pass one
    pub default_cv_seed: u64,

    /// Run cross-validation for methods without hyperparameters (OLS).
    /// When false, training predictions are in-sample predictions of the
    /// final model.
    pub cross_validate_parameter_free: bool,

    /// Maximum coordinate-descent sweeps for Lasso
    pub lasso_max_iter: usize,

    /// Convergence tolerance for Lasso coordinate descent
    pub lasso_tol: f64,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            n_folds: 10,
            shuffle: true,
            default_cv_seed: 123_456,
            cross_validate_parameter_free: true,
            lasso_max_iter: 10_000,
            lasso_tol: 1e-6,
        }
    }
}

impl HarnessConfig {
    /// Create the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file. Missing keys take their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            HarnessError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config: Self = toml::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_n_folds(mut self, n_folds: usize) -> Self {
        self.n_folds = n_folds;
        self
    }

    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    pub fn with_default_cv_seed(mut self, seed: u64) -> Self {
        self.default_cv_seed = seed;
        self
    }

    pub fn with_cross_validate_parameter_free(mut self, enabled: bool) -> Self {
        self.cross_validate_parameter_free = enabled;
        self
    }

    pub fn with_lasso_max_iter(mut self, max_iter: usize) -> Self {
        self.lasso_max_iter = max_iter;
        self
    }

    pub fn with_lasso_tol(mut self, tol: f64) -> Self {
        self.lasso_tol = tol;
        self
    }

    /// Check that the configuration describes a runnable experiment
    pub fn validate(&self) -> Result<()> {
        if self.n_folds < 2 {
            return Err(HarnessError::InvalidArgument(format!(
                "n_folds must be at least 2, got {}",
                self.n_folds
            )));
        }
        if self.lasso_max_iter == 0 {
            return Err(HarnessError::InvalidArgument(
                "lasso_max_iter must be positive".to_string(),
            ));
        }
        if !(self.lasso_tol.is_finite() && self.lasso_tol > 0.0) {
            return Err(HarnessError::InvalidArgument(format!(
                "lasso_tol must be a positive number, got {}",
                self.lasso_tol
            )));
        }
        Ok(())
    }
}
