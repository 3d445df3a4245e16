//! Linear model implementations

use super::models::{check_feature_count, check_training_shapes, Estimator, Predictor};
use crate::error::{HarnessError, Result};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Pivots below this fraction of the largest matrix entry count as zero
const RELATIVE_PIVOT_TOL: f64 = 1e-10;

fn pivot_tolerance(a: &Array2<f64>) -> f64 {
    let scale = a.iter().fold(0.0_f64, |m, v| m.max(v.abs()));
    (RELATIVE_PIVOT_TOL * scale).max(f64::MIN_POSITIVE)
}

/// Solve symmetric positive-definite system Ax = b using Cholesky decomposition.
/// Returns `None` when A is not numerically positive definite.
fn cholesky_solve(a: &Array2<f64>, b: &Array1<f64>, tol: f64) -> Option<Array1<f64>> {
    let n = a.nrows();
    let mut l = Array2::<f64>::zeros((n, n));

    for i in 0..n {
        for j in 0..=i {
            let mut sum = 0.0;
            for k in 0..j {
                sum += l[[i, k]] * l[[j, k]];
            }

            if i == j {
                let diag = a[[i, i]] - sum;
                if diag <= tol {
                    return None;
                }
                l[[i, j]] = diag.sqrt();
            } else {
                l[[i, j]] = (a[[i, j]] - sum) / l[[j, j]];
            }
        }
    }

    // Forward substitution: L * z = b
    let mut z = Array1::<f64>::zeros(n);
    for i in 0..n {
        let mut sum = 0.0;
        for j in 0..i {
            sum += l[[i, j]] * z[j];
        }
        z[i] = (b[i] - sum) / l[[i, i]];
    }

    // Backward substitution: L^T * x = z
    let mut x = Array1::<f64>::zeros(n);
    for i in (0..n).rev() {
        let mut sum = 0.0;
        for j in (i + 1)..n {
            sum += l[[j, i]] * x[j];
        }
        x[i] = (z[i] - sum) / l[[i, i]];
    }

    Some(x)
}

/// Gaussian elimination with partial pivoting. Returns `None` on a zero pivot.
fn gaussian_solve(mut a: Array2<f64>, mut b: Array1<f64>, tol: f64) -> Option<Array1<f64>> {
    let n = a.nrows();

    for col in 0..n {
        let mut max_row = col;
        for row in col + 1..n {
            if a[[row, col]].abs() > a[[max_row, col]].abs() {
                max_row = row;
            }
        }

        if a[[max_row, col]].abs() <= tol {
            return None;
        }

        if max_row != col {
            for j in 0..n {
                a.swap([col, j], [max_row, j]);
            }
            b.swap(col, max_row);
        }

        for row in col + 1..n {
            let factor = a[[row, col]] / a[[col, col]];
            if factor == 0.0 {
                continue;
            }
            for j in col..n {
                a[[row, j]] -= factor * a[[col, j]];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = Array1::<f64>::zeros(n);
    for i in (0..n).rev() {
        let mut sum = 0.0;
        for j in (i + 1)..n {
            sum += a[[i, j]] * x[j];
        }
        x[i] = (b[i] - sum) / a[[i, i]];
    }

    Some(x)
}

/// Solve the normal equations `A w = b`: Cholesky first, pivoted elimination
/// if A is not positive definite, error if A is singular.
fn solve_normal_equations(a: Array2<f64>, b: Array1<f64>) -> Result<Array1<f64>> {
    let tol = pivot_tolerance(&a);
    if let Some(w) = cholesky_solve(&a, &b, tol) {
        return Ok(w);
    }
    trace!("Cholesky failed, falling back to pivoted elimination");
    gaussian_solve(a, b, tol).ok_or_else(|| {
        HarnessError::Fit("normal equations are singular, cannot solve least squares".to_string())
    })
}

fn check_alpha(alpha: f64) -> Result<()> {
    if !alpha.is_finite() || alpha < 0.0 {
        return Err(HarnessError::Fit(format!(
            "alpha must be a finite non-negative number, got {}",
            alpha
        )));
    }
    Ok(())
}

/// Mean-centered copy of the training data
struct Centered {
    x: Array2<f64>,
    y: Array1<f64>,
    x_mean: Array1<f64>,
    y_mean: f64,
}

fn center(x: ArrayView2<'_, f64>, y: ArrayView1<'_, f64>, fit_intercept: bool) -> Result<Centered> {
    if !fit_intercept {
        return Ok(Centered {
            x: x.to_owned(),
            y: y.to_owned(),
            x_mean: Array1::zeros(x.ncols()),
            y_mean: 0.0,
        });
    }

    let empty = || HarnessError::Fit("cannot center an empty training set".to_string());
    let x_mean = x.mean_axis(Axis(0)).ok_or_else(empty)?;
    let y_mean = y.mean().ok_or_else(empty)?;
    Ok(Centered {
        x: &x - &x_mean,
        y: &y - y_mean,
        x_mean,
        y_mean,
    })
}

/// Fitted linear model: `y = X w + b`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    /// Fitted coefficients (weights)
    pub coefficients: Array1<f64>,
    /// Fitted intercept (bias)
    pub intercept: f64,
}

impl LinearModel {
    fn from_centered(coefficients: Array1<f64>, data: &Centered) -> Self {
        let intercept = data.y_mean - coefficients.dot(&data.x_mean);
        Self {
            coefficients,
            intercept,
        }
    }

    /// Get R² score
    pub fn score(&self, x: ArrayView2<'_, f64>, y: ArrayView1<'_, f64>) -> Result<f64> {
        let y_pred = self.predict(x)?;

        let y_mean = y.mean().unwrap_or(0.0);
        let ss_res = (&y_pred - &y).mapv(|v| v * v).sum();
        let ss_tot = y.mapv(|v| (v - y_mean) * (v - y_mean)).sum();

        if ss_tot == 0.0 {
            return Ok(1.0);
        }

        Ok(1.0 - ss_res / ss_tot)
    }
}

impl Predictor for LinearModel {
    fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    fn predict(&self, x: ArrayView2<'_, f64>) -> Result<Array1<f64>> {
        check_feature_count(self.coefficients.len(), &x)?;
        Ok(x.dot(&self.coefficients) + self.intercept)
    }

    fn coefficients(&self) -> Option<ArrayView1<'_, f64>> {
        Some(self.coefficients.view())
    }
}

/// Ordinary least squares
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearRegression {
    /// Whether to fit intercept
    pub fit_intercept: bool,
}

impl Default for LinearRegression {
    fn default() -> Self {
        Self::new()
    }
}

impl LinearRegression {
    pub fn new() -> Self {
        Self { fit_intercept: true }
    }

    /// Enable/disable fitting intercept
    pub fn with_fit_intercept(mut self, fit_intercept: bool) -> Self {
        self.fit_intercept = fit_intercept;
        self
    }
}

impl Estimator for LinearRegression {
    type Fitted = LinearModel;

    fn name(&self) -> &'static str {
        "ols"
    }

    /// Solve the normal equations `(X^T X) w = X^T y`
    fn fit(&self, x: ArrayView2<'_, f64>, y: ArrayView1<'_, f64>) -> Result<LinearModel> {
        check_training_shapes(&x, &y)?;
        let data = center(x, y, self.fit_intercept)?;

        let xtx = data.x.t().dot(&data.x);
        let xty = data.x.t().dot(&data.y);
        let coefficients = solve_normal_equations(xtx, xty)?;

        Ok(LinearModel::from_centered(coefficients, &data))
    }
}

/// Ridge regression (L2-regularized least squares)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RidgeRegression {
    pub fit_intercept: bool,
    /// L2 regularization strength
    pub alpha: f64,
}

impl Default for RidgeRegression {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl RidgeRegression {
    pub fn new(alpha: f64) -> Self {
        Self {
            fit_intercept: true,
            alpha,
        }
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_fit_intercept(mut self, fit_intercept: bool) -> Self {
        self.fit_intercept = fit_intercept;
        self
    }
}

impl Estimator for RidgeRegression {
    type Fitted = LinearModel;

    fn name(&self) -> &'static str {
        "ridge"
    }

    /// Solve `(X^T X + alpha*I) w = X^T y`
    fn fit(&self, x: ArrayView2<'_, f64>, y: ArrayView1<'_, f64>) -> Result<LinearModel> {
        check_alpha(self.alpha)?;
        check_training_shapes(&x, &y)?;
        let data = center(x, y, self.fit_intercept)?;

        let mut xtx = data.x.t().dot(&data.x);
        for i in 0..xtx.nrows() {
            xtx[[i, i]] += self.alpha;
        }
        let xty = data.x.t().dot(&data.y);
        let coefficients = solve_normal_equations(xtx, xty)?;

        Ok(LinearModel::from_centered(coefficients, &data))
    }
}

/// Lasso Regression (L1-regularized via coordinate descent)
///
/// Minimizes `1/(2n) * ||y - Xw||^2 + alpha * ||w||_1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LassoRegression {
    pub fit_intercept: bool,
    /// L1 regularization strength
    pub alpha: f64,
    pub max_iter: usize,
    pub tol: f64,
}

impl Default for LassoRegression {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl LassoRegression {
    pub fn new(alpha: f64) -> Self {
        Self {
            fit_intercept: true,
            alpha,
            max_iter: 10_000,
            tol: 1e-6,
        }
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    pub fn with_fit_intercept(mut self, fit_intercept: bool) -> Self {
        self.fit_intercept = fit_intercept;
        self
    }

    /// Soft-threshold operator for L1 proximal step
    fn soft_threshold(val: f64, threshold: f64) -> f64 {
        if val > threshold {
            val - threshold
        } else if val < -threshold {
            val + threshold
        } else {
            0.0
        }
    }
}

impl Estimator for LassoRegression {
    type Fitted = LinearModel;

    fn name(&self) -> &'static str {
        "lasso"
    }

    fn fit(&self, x: ArrayView2<'_, f64>, y: ArrayView1<'_, f64>) -> Result<LinearModel> {
        check_alpha(self.alpha)?;
        if self.max_iter == 0 || !(self.tol > 0.0) {
            return Err(HarnessError::Fit(format!(
                "invalid solver settings: max_iter = {}, tol = {}",
                self.max_iter, self.tol
            )));
        }
        check_training_shapes(&x, &y)?;

        let n_samples = x.nrows();
        let n_features = x.ncols();
        let data = center(x, y, self.fit_intercept)?;

        // Pre-compute column norms
        let col_norms: Vec<f64> = (0..n_features)
            .map(|j| data.x.column(j).mapv(|v| v * v).sum())
            .collect();

        let lambda = self.alpha * n_samples as f64;
        let mut w = Array1::<f64>::zeros(n_features);
        let mut r = data.y.clone();

        for iter in 0..self.max_iter {
            let mut max_delta = 0.0_f64;

            for j in 0..n_features {
                if col_norms[j] < 1e-15 {
                    w[j] = 0.0;
                    continue;
                }
                // rho = x_j^T r + ||x_j||^2 w_j, with r the full residual
                let rho = data.x.column(j).dot(&r) + col_norms[j] * w[j];
                let old_wj = w[j];
                w[j] = Self::soft_threshold(rho, lambda) / col_norms[j];

                let delta = old_wj - w[j];
                if delta != 0.0 {
                    r.scaled_add(delta, &data.x.column(j));
                    max_delta = max_delta.max(delta.abs());
                }
            }

            let w_max = w.iter().fold(0.0_f64, |m, v| m.max(v.abs()));
            if max_delta <= self.tol * w_max.max(1.0) {
                trace!(iterations = iter + 1, "Lasso coordinate descent converged");
                return Ok(LinearModel::from_centered(w, &data));
            }
        }

        Err(HarnessError::Fit(format!(
            "lasso coordinate descent did not converge after {} iterations",
            self.max_iter
        )))
    }
}
