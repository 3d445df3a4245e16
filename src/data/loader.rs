//! Dataset loading from JSON bundles and CSV tables

use super::Dataset;
use crate::error::{HarnessError, Result};
use ndarray::{Array1, Array2};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Instant;
use tracing::debug;

/// On-disk dataset encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetFormat {
    /// `{"X": [[..], ..], "y": [..], "true_coef": [..]}`
    Json,
    /// Header row, target column plus one column per feature
    Csv,
}

impl DatasetFormat {
    /// Detect the format from the file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(DatasetFormat::Json),
            "csv" => Some(DatasetFormat::Csv),
            _ => None,
        }
    }
}

/// Serialized layout of a JSON dataset bundle
#[derive(Debug, Serialize, Deserialize)]
struct DatasetBundle {
    #[serde(rename = "X")]
    x: Vec<Vec<f64>>,
    y: Vec<f64>,
    #[serde(default)]
    true_coef: Option<Vec<f64>>,
}

/// Loader for experiment datasets
#[derive(Debug, Clone)]
pub struct DatasetLoader {
    /// Name of the target column in CSV files
    target_column: String,
}

impl Default for DatasetLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DatasetLoader {
    pub fn new() -> Self {
        Self {
            target_column: "y".to_string(),
        }
    }

    /// Set the CSV target column name
    pub fn with_target_column(mut self, name: impl Into<String>) -> Self {
        self.target_column = name.into();
        self
    }

    /// Detect the format from the extension and load
    pub fn load(&self, path: impl AsRef<Path>) -> Result<Dataset> {
        let path = path.as_ref();
        let start = Instant::now();

        let dataset = match DatasetFormat::from_path(path) {
            Some(DatasetFormat::Json) => self.load_json(path)?,
            Some(DatasetFormat::Csv) => self.load_csv(path)?,
            None => {
                return Err(HarnessError::dataset(
                    path,
                    "unsupported file extension (expected .json or .csv)",
                ))
            }
        };

        debug!(
            path = %path.display(),
            n_samples = dataset.n_samples(),
            n_features = dataset.n_features(),
            has_true_coef = dataset.true_coef().is_some(),
            elapsed = ?start.elapsed(),
            "Loaded dataset"
        );
        Ok(dataset)
    }

    /// Load a JSON dataset bundle
    pub fn load_json(&self, path: impl AsRef<Path>) -> Result<Dataset> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| HarnessError::dataset(path, e))?;
        let bundle: DatasetBundle = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| HarnessError::dataset(path, e))?;

        let n_samples = bundle.x.len();
        let n_features = bundle.x.first().map_or(0, Vec::len);
        if let Some(row) = bundle.x.iter().position(|r| r.len() != n_features) {
            return Err(HarnessError::dataset(
                path,
                format!(
                    "row {} of X has {} values, expected {}",
                    row,
                    bundle.x[row].len(),
                    n_features
                ),
            ));
        }

        let flat: Vec<f64> = bundle.x.into_iter().flatten().collect();
        let x = Array2::from_shape_vec((n_samples, n_features), flat)
            .map_err(|e| HarnessError::dataset(path, e))?;
        let y = Array1::from_vec(bundle.y);
        let true_coef = bundle.true_coef.map(Array1::from_vec);

        Dataset::new(x, y, true_coef).map_err(|e| HarnessError::dataset(path, e))
    }

    /// Load a CSV table. The target column becomes `y`, every other column
    /// a feature in file order. CSV datasets carry no coefficients.
    pub fn load_csv(&self, path: impl AsRef<Path>) -> Result<Dataset> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| HarnessError::dataset(path, e))?;

        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(100))
            .into_reader_with_file_handle(file)
            .finish()
            .map_err(|e| HarnessError::dataset(path, e))?;

        if let Some(col) = df.get_columns().iter().find(|c| c.null_count() > 0) {
            return Err(HarnessError::dataset(
                path,
                format!("column '{}' contains missing values", col.name()),
            ));
        }

        let target = df
            .column(&self.target_column)
            .map_err(|e| HarnessError::dataset(path, e))?
            .as_materialized_series()
            .cast(&DataType::Float64)
            .map_err(|e| HarnessError::dataset(path, e))?;
        let y: Array1<f64> = target
            .f64()
            .map_err(|e| HarnessError::dataset(path, e))?
            .into_no_null_iter()
            .collect();

        let features = df
            .drop(&self.target_column)
            .map_err(|e| HarnessError::dataset(path, e))?;
        let x = features
            .to_ndarray::<Float64Type>(IndexOrder::C)
            .map_err(|e| HarnessError::dataset(path, e))?;

        Dataset::new(x, y, None).map_err(|e| HarnessError::dataset(path, e))
    }
}
