//! Error types for the cross-validation harness

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for harness operations
pub type Result<T> = std::result::Result<T, HarnessError>;

/// Main error type for the harness.
///
/// Every variant is fatal: the binary exits non-zero and no report is
/// written to stdout.
#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Failed to load dataset {}: {reason}", path.display())]
    DatasetLoad { path: PathBuf, reason: String },

    #[error("Fit error: {0}")]
    Fit(String),

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: String, actual: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl HarnessError {
    pub(crate) fn dataset(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        HarnessError::DatasetLoad {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

impl From<ndarray::ShapeError> for HarnessError {
    fn from(err: ndarray::ShapeError) -> Self {
        HarnessError::DimensionMismatch {
            expected: "valid shape".to_string(),
            actual: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for HarnessError {
    fn from(err: toml::de::Error) -> Self {
        HarnessError::Config(err.to_string())
    }
}
