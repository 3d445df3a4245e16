//! Experiment runner
//!
//! Ties the pieces together for one invocation: load both datasets, check
//! they are compatible, cross-validate on the training data, fit once on all
//! training data to predict the test data, and assemble the report. Nothing
//! is written anywhere here; the caller prints the finished report, so a
//! failure at any step leaves stdout untouched.

use crate::config::HarnessConfig;
use crate::data::{Dataset, DatasetLoader};
use crate::error::{HarnessError, Result};
use crate::report::ResultReport;
use crate::training::{
    final_fit, run_cv, timed, ElapsedTime, KFold, Method, Predictor, RegressionMetrics,
};
use ndarray::Array1;
use std::path::PathBuf;
use tracing::{info, warn};

/// What to run: a method and the pair of datasets to run it on
#[derive(Debug, Clone, PartialEq)]
pub struct ExperimentPlan {
    pub method: Method,
    pub train_path: PathBuf,
    pub test_path: PathBuf,
    /// Seed for the fold shuffle; the configured default when absent
    pub cv_seed: Option<u64>,
}

impl ExperimentPlan {
    pub fn new(method: Method, train_path: impl Into<PathBuf>, test_path: impl Into<PathBuf>) -> Self {
        Self {
            method,
            train_path: train_path.into(),
            test_path: test_path.into(),
            cv_seed: None,
        }
    }

    pub fn with_cv_seed(mut self, seed: Option<u64>) -> Self {
        self.cv_seed = seed;
        self
    }
}

/// Load the datasets named by `plan` and run the experiment on them
pub fn run_experiment(config: &HarnessConfig, plan: &ExperimentPlan) -> Result<ResultReport> {
    config.validate()?;
    plan.method.validate()?;

    let loader = DatasetLoader::new();
    let train = loader.load(&plan.train_path)?;
    let mut test = loader.load(&plan.test_path)?;
    if test.true_coef().is_some() {
        warn!(
            path = %plan.test_path.display(),
            "Ignoring true_coef in test dataset"
        );
        test = test.without_true_coef();
    }

    run_on_datasets(config, &plan.method, plan.cv_seed, &train, &test)
}

/// Run the experiment on datasets already in memory
pub fn run_on_datasets(
    config: &HarnessConfig,
    method: &Method,
    cv_seed: Option<u64>,
    train: &Dataset,
    test: &Dataset,
) -> Result<ResultReport> {
    config.validate()?;
    method.validate()?;
    if train.n_features() != test.n_features() {
        return Err(HarnessError::DimensionMismatch {
            expected: format!("{} features in test data (as in training data)", train.n_features()),
            actual: format!("{} features", test.n_features()),
        });
    }

    let estimator = method.estimator(config);
    let mut total = ElapsedTime::new();

    let cross_validate = method.has_hyperparameters() || config.cross_validate_parameter_free;
    let cv_predictions = if cross_validate {
        let seed = cv_seed.unwrap_or(config.default_cv_seed);
        let cv = KFold::new(config.n_folds)
            .with_shuffle(config.shuffle)
            .with_seed(seed);
        let outcome = run_cv(&estimator, train.x().view(), train.y().view(), &cv)?;
        info!(
            method = %method,
            n_folds = outcome.n_folds,
            seed,
            shuffle = config.shuffle,
            cv_secs = outcome.elapsed.seconds(),
            "Cross-validation finished"
        );
        total.absorb(outcome.elapsed);
        Some(outcome.predictions)
    } else {
        if cv_seed.is_some() {
            warn!(method = %method, "cv_seed given but cross-validation is disabled");
        }
        None
    };

    let fit = final_fit(&estimator, train.x().view(), train.y().view(), test.x().view())?;
    total.absorb(fit.elapsed);

    let train_predictions: Array1<f64> = match cv_predictions {
        Some(predictions) => predictions,
        None => {
            let (predictions, secs) = timed(|| fit.model.predict(train.x().view()));
            let predictions = predictions?;
            total.add(secs);
            predictions
        }
    };

    log_metrics("train", train.y(), &train_predictions);
    log_metrics("test", test.y(), &fit.test_predictions);
    info!(method = %method, total_secs = total.seconds(), "Experiment finished");

    ResultReport::builder(method.name())
        .cost(method.alpha())
        .train(train.y().view(), train_predictions.view())?
        .test(test.y().view(), fit.test_predictions.view())?
        .coefficients(train.true_coef().map(|c| c.view()), fit.model.coefficients())?
        .total_time(total.seconds())
        .build()
}

fn log_metrics(split: &str, y_true: &Array1<f64>, y_pred: &Array1<f64>) {
    if let Some(m) = RegressionMetrics::compute(y_true.view(), y_pred.view()) {
        info!(split, mse = m.mse, mae = m.mae, r2 = m.r2, n = m.n_samples, "Prediction error");
    }
}
