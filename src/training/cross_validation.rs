//! K-fold partitioning

use crate::error::{HarnessError, Result};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// A single train/test split
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CVSplit {
    pub train_indices: Vec<usize>,
    pub test_indices: Vec<usize>,
    pub fold_idx: usize,
}

/// K-fold splitter.
///
/// The first `n_samples % n_splits` folds hold one extra sample. With
/// shuffling enabled the sample order is permuted by a `ChaCha8Rng` seeded
/// from `seed` before the folds are cut, so `(n_samples, n_splits, shuffle,
/// seed)` fully determines the partition. Index lists are ascending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KFold {
    n_splits: usize,
    shuffle: bool,
    seed: u64,
}

impl KFold {
    /// Contiguous folds
    pub fn new(n_splits: usize) -> Self {
        Self {
            n_splits,
            shuffle: false,
            seed: 0,
        }
    }

    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// Seed for the shuffle permutation
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn n_splits(&self) -> usize {
        self.n_splits
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn shuffle(&self) -> bool {
        self.shuffle
    }

    /// Fold each sample is held out in
    pub fn fold_assignment(&self, n_samples: usize) -> Result<Vec<usize>> {
        if self.n_splits < 2 {
            return Err(HarnessError::InvalidArgument(format!(
                "n_splits must be at least 2, got {}",
                self.n_splits
            )));
        }
        if n_samples < self.n_splits {
            return Err(HarnessError::InvalidArgument(format!(
                "n_samples ({}) must be >= n_splits ({})",
                n_samples, self.n_splits
            )));
        }

        let mut indices: Vec<usize> = (0..n_samples).collect();
        if self.shuffle {
            let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
            indices.shuffle(&mut rng);
        }

        let base = n_samples / self.n_splits;
        let remainder = n_samples % self.n_splits;

        let mut assignment = vec![0; n_samples];
        let mut current = 0;
        for fold_idx in 0..self.n_splits {
            let fold_size = if fold_idx < remainder { base + 1 } else { base };
            for &sample in &indices[current..current + fold_size] {
                assignment[sample] = fold_idx;
            }
            current += fold_size;
        }

        Ok(assignment)
    }

    /// Generate the train/test splits in fold order
    pub fn split(&self, n_samples: usize) -> Result<Vec<CVSplit>> {
        let assignment = self.fold_assignment(n_samples)?;

        let splits = (0..self.n_splits)
            .map(|fold_idx| {
                let (test_indices, train_indices): (Vec<usize>, Vec<usize>) =
                    (0..n_samples).partition(|&i| assignment[i] == fold_idx);
                CVSplit {
                    train_indices,
                    test_indices,
                    fold_idx,
                }
            })
            .collect();

        Ok(splits)
    }
}
