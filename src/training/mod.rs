//! Model training and cross-validation
//!
//! Provides:
//! - The model adapter contract ([`Estimator`], [`Predictor`])
//! - Linear models (OLS, Ridge, Lasso)
//! - Seeded K-fold partitioning
//! - The cross-validation driver and final fit
//! - Timing instrumentation and diagnostic metrics

pub mod cross_validation;
pub mod driver;
pub mod linear_models;
pub mod method;
pub mod metrics;
mod models;
pub mod timing;

pub use cross_validation::{CVSplit, KFold};
pub use driver::{final_fit, run_cv, CvOutcome, FinalFit};
pub use linear_models::{LassoRegression, LinearModel, LinearRegression, RidgeRegression};
pub use method::{Method, MethodEstimator};
pub use metrics::RegressionMetrics;
pub use models::{Estimator, Predictor};
pub use timing::{timed, ElapsedTime};
