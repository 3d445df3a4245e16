//! Regression methods selectable from the command line

use super::linear_models::{LassoRegression, LinearModel, LinearRegression, RidgeRegression};
use super::models::Estimator;
use crate::config::HarnessConfig;
use crate::error::{HarnessError, Result};
use ndarray::{ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The model adapter variants the harness can evaluate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "lowercase")]
pub enum Method {
    /// Ordinary least squares, no hyperparameters
    Ols,
    /// L2-penalized least squares
    Ridge { alpha: f64 },
    /// L1-penalized least squares
    Lasso { alpha: f64 },
}

impl Method {
    /// Build a method from its name and optional regularization strength
    pub fn parse(name: &str, alpha: Option<f64>) -> Result<Self> {
        let method = match (name.to_ascii_lowercase().as_str(), alpha) {
            ("ols", None) => Method::Ols,
            ("ols", Some(_)) => {
                return Err(HarnessError::InvalidArgument(
                    "ols takes no hyperparameters".to_string(),
                ))
            }
            ("ridge", Some(alpha)) => Method::Ridge { alpha },
            ("lasso", Some(alpha)) => Method::Lasso { alpha },
            ("ridge" | "lasso", None) => {
                return Err(HarnessError::InvalidArgument(format!(
                    "{} requires an alpha value",
                    name
                )))
            }
            _ => {
                return Err(HarnessError::InvalidArgument(format!(
                    "unknown method '{}' (expected ols, ridge or lasso)",
                    name
                )))
            }
        };
        method.validate()?;
        Ok(method)
    }

    /// Lowercase method name as written in report headers
    pub fn name(&self) -> &'static str {
        match self {
            Method::Ols => "ols",
            Method::Ridge { .. } => "ridge",
            Method::Lasso { .. } => "lasso",
        }
    }

    /// The tunable regularization strength, if the method has one
    pub fn alpha(&self) -> Option<f64> {
        match self {
            Method::Ols => None,
            Method::Ridge { alpha } | Method::Lasso { alpha } => Some(*alpha),
        }
    }

    pub fn has_hyperparameters(&self) -> bool {
        self.alpha().is_some()
    }

    /// Reject hyperparameter values no solver accepts
    pub fn validate(&self) -> Result<()> {
        if let Some(alpha) = self.alpha() {
            if !alpha.is_finite() || alpha < 0.0 {
                return Err(HarnessError::InvalidArgument(format!(
                    "alpha must be a finite non-negative number, got {}",
                    alpha
                )));
            }
        }
        Ok(())
    }

    /// Bind the method to the solver settings of a configuration
    pub fn estimator(&self, config: &HarnessConfig) -> MethodEstimator {
        let solver = match *self {
            Method::Ols => Solver::Ols(LinearRegression::new()),
            Method::Ridge { alpha } => Solver::Ridge(RidgeRegression::new(alpha)),
            Method::Lasso { alpha } => Solver::Lasso(
                LassoRegression::new(alpha)
                    .with_max_iter(config.lasso_max_iter)
                    .with_tol(config.lasso_tol),
            ),
        };
        MethodEstimator { solver }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.alpha() {
            Some(alpha) => write!(f, "{}(alpha={})", self.name(), alpha),
            None => write!(f, "{}", self.name()),
        }
    }
}

#[derive(Debug, Clone)]
enum Solver {
    Ols(LinearRegression),
    Ridge(RidgeRegression),
    Lasso(LassoRegression),
}

/// A [`Method`] bound to concrete solver settings
#[derive(Debug, Clone)]
pub struct MethodEstimator {
    solver: Solver,
}

impl Estimator for MethodEstimator {
    type Fitted = LinearModel;

    fn name(&self) -> &'static str {
        match &self.solver {
            Solver::Ols(m) => m.name(),
            Solver::Ridge(m) => m.name(),
            Solver::Lasso(m) => m.name(),
        }
    }

    fn fit(&self, x: ArrayView2<'_, f64>, y: ArrayView1<'_, f64>) -> Result<LinearModel> {
        match &self.solver {
            Solver::Ols(m) => m.fit(x, y),
            Solver::Ridge(m) => m.fit(x, y),
            Solver::Lasso(m) => m.fit(x, y),
        }
    }
}
