//! Cross-validation driver and final fit
//!
//! [`run_cv`] produces out-of-fold predictions: each training sample is
//! predicted by the one fold model that never saw it. [`final_fit`] trains
//! once on all training data and predicts the independent test set. The two
//! are timed separately.

use super::cross_validation::KFold;
use super::models::{Estimator, Predictor};
use super::timing::{timed, ElapsedTime};
use crate::error::{HarnessError, Result};
use ndarray::{Array1, ArrayView1, ArrayView2, Axis};
use tracing::debug;

/// Out-of-fold predictions and the time spent producing them
#[derive(Debug, Clone)]
pub struct CvOutcome {
    /// One prediction per training sample, in original sample order
    pub predictions: Array1<f64>,
    /// Sum of fit and predict durations over all folds
    pub elapsed: ElapsedTime,
    pub n_folds: usize,
}

/// Model trained on the full training set and its test predictions
#[derive(Debug, Clone)]
pub struct FinalFit<M> {
    pub model: M,
    pub test_predictions: Array1<f64>,
    /// Fit plus test-prediction duration
    pub elapsed: ElapsedTime,
}

/// Run K-fold cross-validation and assemble out-of-fold predictions.
///
/// Folds are visited in ascending fold order. Every sample must receive
/// exactly one prediction; anything else is reported as an internal error
/// rather than a silently incomplete vector.
pub fn run_cv<E: Estimator>(
    estimator: &E,
    x: ArrayView2<'_, f64>,
    y: ArrayView1<'_, f64>,
    cv: &KFold,
) -> Result<CvOutcome> {
    let n_samples = y.len();
    if x.nrows() != n_samples {
        return Err(HarnessError::DimensionMismatch {
            expected: format!("{} rows in X", n_samples),
            actual: format!("{} rows in X", x.nrows()),
        });
    }

    let splits = cv.split(n_samples)?;
    let mut predictions = Array1::<f64>::zeros(n_samples);
    let mut written = vec![false; n_samples];
    let mut elapsed = ElapsedTime::new();

    for split in &splits {
        let x_train = x.select(Axis(0), &split.train_indices);
        let y_train = y.select(Axis(0), &split.train_indices);
        let x_test = x.select(Axis(0), &split.test_indices);

        let (model, fit_secs) = timed(|| estimator.fit(x_train.view(), y_train.view()));
        let model = model?;
        let (fold_predictions, predict_secs) = timed(|| model.predict(x_test.view()));
        let fold_predictions = fold_predictions?;
        elapsed.add(fit_secs + predict_secs);

        if fold_predictions.len() != split.test_indices.len() {
            return Err(HarnessError::Internal(format!(
                "fold {} produced {} predictions for {} held-out samples",
                split.fold_idx,
                fold_predictions.len(),
                split.test_indices.len()
            )));
        }

        for (&idx, &pred) in split.test_indices.iter().zip(fold_predictions.iter()) {
            if written[idx] {
                return Err(HarnessError::Internal(format!(
                    "sample {} held out by more than one fold",
                    idx
                )));
            }
            predictions[idx] = pred;
            written[idx] = true;
        }

        debug!(
            fold = split.fold_idx,
            n_train = split.train_indices.len(),
            n_test = split.test_indices.len(),
            fit_secs,
            predict_secs,
            "Fold complete"
        );
    }

    if let Some(missing) = written.iter().position(|&w| !w) {
        return Err(HarnessError::Internal(format!(
            "sample {} was never held out",
            missing
        )));
    }

    Ok(CvOutcome {
        predictions,
        elapsed,
        n_folds: splits.len(),
    })
}

/// Fit once on the whole training set and predict the test set
pub fn final_fit<E: Estimator>(
    estimator: &E,
    x_train: ArrayView2<'_, f64>,
    y_train: ArrayView1<'_, f64>,
    x_test: ArrayView2<'_, f64>,
) -> Result<FinalFit<E::Fitted>> {
    let mut elapsed = ElapsedTime::new();

    let (model, fit_secs) = timed(|| estimator.fit(x_train, y_train));
    let model = model?;
    elapsed.add(fit_secs);

    let (test_predictions, predict_secs) = timed(|| model.predict(x_test));
    let test_predictions = test_predictions?;
    elapsed.add(predict_secs);

    debug!(
        n_train = x_train.nrows(),
        n_test = x_test.nrows(),
        fit_secs,
        predict_secs,
        "Final fit complete"
    );

    Ok(FinalFit {
        model,
        test_predictions,
        elapsed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::training::linear_models::RidgeRegression;
    use ndarray::{array, Array2};
    use std::collections::HashSet;

    /// Fitted model that remembers which sample ids it was trained on.
    /// Column 0 of X carries the sample id.
    struct Memorized {
        seen: HashSet<u64>,
    }

    impl Predictor for Memorized {
        fn n_features(&self) -> usize {
            1
        }

        fn predict(&self, x: ArrayView2<'_, f64>) -> Result<Array1<f64>> {
            Ok(x.column(0).mapv(|id| {
                if self.seen.contains(&(id as u64)) {
                    1.0
                } else {
                    0.0
                }
            }))
        }
    }

    struct Memorizer;

    impl Estimator for Memorizer {
        type Fitted = Memorized;

        fn name(&self) -> &'static str {
            "memorizer"
        }

        fn fit(&self, x: ArrayView2<'_, f64>, _y: ArrayView1<'_, f64>) -> Result<Memorized> {
            Ok(Memorized {
                seen: x.column(0).iter().map(|&id| id as u64).collect(),
            })
        }
    }

    /// Predicts the training mean for every row
    struct MeanModel(f64);

    impl Predictor for MeanModel {
        fn n_features(&self) -> usize {
            1
        }

        fn predict(&self, x: ArrayView2<'_, f64>) -> Result<Array1<f64>> {
            Ok(Array1::from_elem(x.nrows(), self.0))
        }
    }

    struct MeanEstimator;

    impl Estimator for MeanEstimator {
        type Fitted = MeanModel;

        fn name(&self) -> &'static str {
            "mean"
        }

        fn fit(&self, _x: ArrayView2<'_, f64>, y: ArrayView1<'_, f64>) -> Result<MeanModel> {
            Ok(MeanModel(y.mean().unwrap_or(0.0)))
        }
    }

    /// Always returns a single prediction
    struct ShortModel;

    impl Predictor for ShortModel {
        fn n_features(&self) -> usize {
            1
        }

        fn predict(&self, _x: ArrayView2<'_, f64>) -> Result<Array1<f64>> {
            Ok(array![0.0])
        }
    }

    struct ShortEstimator;

    impl Estimator for ShortEstimator {
        type Fitted = ShortModel;

        fn name(&self) -> &'static str {
            "short"
        }

        fn fit(&self, _x: ArrayView2<'_, f64>, _y: ArrayView1<'_, f64>) -> Result<ShortModel> {
            Ok(ShortModel)
        }
    }

    struct FailingEstimator;

    impl Estimator for FailingEstimator {
        type Fitted = MeanModel;

        fn name(&self) -> &'static str {
            "failing"
        }

        fn fit(&self, _x: ArrayView2<'_, f64>, _y: ArrayView1<'_, f64>) -> Result<MeanModel> {
            Err(HarnessError::Fit("singular".to_string()))
        }
    }

    fn id_matrix(n: usize) -> Array2<f64> {
        Array2::from_shape_fn((n, 1), |(i, _)| i as f64)
    }

    #[test]
    fn test_out_of_fold_purity() {
        let x = id_matrix(53);
        let y = Array1::<f64>::zeros(53);
        let cv = KFold::new(10).with_shuffle(true).with_seed(123_456);

        let outcome = run_cv(&Memorizer, x.view(), y.view(), &cv).unwrap();

        assert_eq!(outcome.n_folds, 10);
        assert_eq!(outcome.predictions.len(), 53);
        // Every sample was predicted by a model that never saw it
        assert!(outcome.predictions.iter().all(|&p| p == 0.0));
    }

    #[test]
    fn test_predictions_aligned_with_sample_order() {
        // Contiguous 2-fold split of [0, 0, 10, 10]: fold 0 holds out the
        // zeros and trains on the tens, fold 1 the reverse.
        let x = id_matrix(4);
        let y = array![0.0, 0.0, 10.0, 10.0];
        let cv = KFold::new(2);

        let outcome = run_cv(&MeanEstimator, x.view(), y.view(), &cv).unwrap();
        assert_eq!(outcome.predictions, array![10.0, 10.0, 0.0, 0.0]);
    }

    #[test]
    fn test_run_cv_deterministic() {
        let x = Array2::from_shape_fn((40, 3), |(i, j)| ((i * 7 + j * 13) % 11) as f64 + 0.1 * j as f64);
        let y = Array1::from_shape_fn(40, |i| (i % 5) as f64 * 1.5 + 0.25 * i as f64);
        let cv = KFold::new(5).with_shuffle(true).with_seed(7);
        let ridge = RidgeRegression::new(0.5);

        let first = run_cv(&ridge, x.view(), y.view(), &cv).unwrap();
        let second = run_cv(&ridge, x.view(), y.view(), &cv).unwrap();
        assert_eq!(first.predictions, second.predictions);
        assert!(first.elapsed.seconds() >= 0.0);
    }

    #[test]
    fn test_fit_errors_propagate() {
        let x = id_matrix(10);
        let y = Array1::<f64>::zeros(10);
        let err = run_cv(&FailingEstimator, x.view(), y.view(), &KFold::new(2)).unwrap_err();
        assert!(matches!(err, HarnessError::Fit(_)));
    }

    #[test]
    fn test_bad_fold_count_rejected() {
        let x = id_matrix(3);
        let y = Array1::<f64>::zeros(3);
        let err = run_cv(&MeanEstimator, x.view(), y.view(), &KFold::new(4)).unwrap_err();
        assert!(matches!(err, HarnessError::InvalidArgument(_)));
    }

    #[test]
    fn test_short_predictions_detected() {
        let x = id_matrix(10);
        let y = Array1::<f64>::zeros(10);
        let err = run_cv(&ShortEstimator, x.view(), y.view(), &KFold::new(2)).unwrap_err();
        assert!(matches!(err, HarnessError::Internal(_)));
    }

    #[test]
    fn test_row_mismatch_rejected() {
        let x = id_matrix(10);
        let y = Array1::<f64>::zeros(9);
        let err = run_cv(&MeanEstimator, x.view(), y.view(), &KFold::new(3)).unwrap_err();
        assert!(matches!(err, HarnessError::DimensionMismatch { .. }));
    }

    #[test]
    fn test_final_fit() {
        let x_train = array![[1.0], [2.0], [3.0], [4.0]];
        let y_train = array![3.0, 5.0, 7.0, 9.0];
        let x_test = array![[10.0], [0.0]];

        let fit = final_fit(
            &RidgeRegression::new(0.0),
            x_train.view(),
            y_train.view(),
            x_test.view(),
        )
        .unwrap();

        assert!((fit.test_predictions[0] - 21.0).abs() < 1e-9);
        assert!((fit.test_predictions[1] - 1.0).abs() < 1e-9);
        assert!(fit.elapsed.seconds() >= 0.0);
        assert_eq!(fit.model.n_features(), 1);
    }

    #[test]
    fn test_final_fit_dimension_mismatch() {
        let x_train = array![[1.0], [2.0], [3.0]];
        let y_train = array![1.0, 2.0, 3.0];
        let x_test = array![[1.0, 2.0]];
        let err = final_fit(
            &RidgeRegression::new(1.0),
            x_train.view(),
            y_train.view(),
            x_test.view(),
        )
        .unwrap_err();
        assert!(matches!(err, HarnessError::DimensionMismatch { .. }));
    }
}
