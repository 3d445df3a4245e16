//! Shared fixtures for integration tests

#![allow(dead_code)]

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde_json::json;
use std::path::{Path, PathBuf};

/// Linear regression problem with known coefficients
pub struct Problem {
    pub x: Vec<Vec<f64>>,
    pub y: Vec<f64>,
    pub coef: Vec<f64>,
}

/// `y = X coef + bias + noise`, half of the coefficients informative
pub fn make_regression(n_samples: usize, n_features: usize, noise: f64, seed: u64) -> Problem {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let bias = rng.gen_range(0.0..10.0);
    let coef: Vec<f64> = (0..n_features)
        .map(|j| {
            if j % 2 == 0 {
                rng.gen_range(-50.0..50.0)
            } else {
                0.0
            }
        })
        .collect();

    let x: Vec<Vec<f64>> = (0..n_samples)
        .map(|_| (0..n_features).map(|_| rng.gen_range(-2.0..2.0)).collect())
        .collect();
    let y = x
        .iter()
        .map(|row| {
            let signal: f64 = row.iter().zip(&coef).map(|(a, b)| a * b).sum();
            signal + bias + noise * rng.gen_range(-1.0..1.0)
        })
        .collect();

    Problem { x, y, coef }
}

/// Write a JSON dataset bundle into `dir`
pub fn write_bundle(dir: &Path, name: &str, x: &[Vec<f64>], y: &[f64], coef: Option<&[f64]>) -> PathBuf {
    let path = dir.join(format!("{}.json", name));
    let mut bundle = json!({ "X": x, "y": y });
    if let Some(coef) = coef {
        bundle["true_coef"] = json!(coef);
    }
    std::fs::write(&path, serde_json::to_string(&bundle).unwrap()).unwrap();
    path
}

/// Split a problem 2:1 into train/test bundles; only train keeps coefficients
pub fn write_train_test(dir: &Path, problem: &Problem) -> (PathBuf, PathBuf) {
    let n_train = problem.y.len() * 2 / 3;
    let train = write_bundle(
        dir,
        "dataset_train",
        &problem.x[..n_train],
        &problem.y[..n_train],
        Some(&problem.coef),
    );
    let test = write_bundle(
        dir,
        "dataset_test",
        &problem.x[n_train..],
        &problem.y[n_train..],
        None,
    );
    (train, test)
}

/// Parse the `<float> <float>` lines of a report block
pub fn block_pairs(report: &str, header: &str) -> Vec<(f64, f64)> {
    report
        .lines()
        .skip_while(|line| *line != header)
        .skip(1)
        .take_while(|line| !line.starts_with('%'))
        .map(|line| {
            let (a, b) = line.split_once(' ').unwrap();
            (a.parse().unwrap(), b.parse().unwrap())
        })
        .collect()
}
