//! cv-harness - reproducible cross-validation for regression experiments
//!
//! Evaluates a regression method on a train/test dataset pair:
//! - K-fold cross-validation on the training data yields out-of-fold
//!   predictions for every training sample
//! - A final fit on all training data predicts the test data
//! - Fit/predict wall-clock time is summed into one total
//! - Everything is written as a fixed text report for downstream aggregation
//!
//! # Modules
//!
//! - [`data`] - Dataset bundle and loaders (JSON, CSV)
//! - [`training`] - Model adapters, K-fold partitioning, CV driver, timing
//! - [`report`] - Result report rendering
//! - [`experiment`] - One complete experiment run
//! - [`config`] - Harness configuration
//! - [`cli`] - Command-line interface

// Core error handling
pub mod error;

pub mod config;
pub mod data;
pub mod training;
pub mod report;
pub mod experiment;

// Services
pub mod cli;

pub use error::{HarnessError, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::HarnessConfig;
    pub use crate::data::{Dataset, DatasetLoader};
    pub use crate::error::{HarnessError, Result};
    pub use crate::experiment::{run_experiment, run_on_datasets, ExperimentPlan};
    pub use crate::report::ResultReport;
    pub use crate::training::{
        final_fit, run_cv, Estimator, KFold, LassoRegression, LinearModel, LinearRegression,
        Method, Predictor, RidgeRegression,
    };
}
