//! Result report rendering
//!
//! The report is a line-oriented text protocol read by the external
//! aggregation tool:
//!
//! ```text
//! # <method>[, cost = <value>]
//! % y_train_true y_train_pred
//! <float> <float>
//! % y_test_true y_test_pred
//! <float> <float>
//! % coef_true coef_pred
//! <float> <float>
//! % total_time
//! <float>
//! ```
//!
//! Floats are written in fixed notation with 16 digits after the decimal
//! point. The coefficient header is always present; its body is empty when
//! either side of the comparison does not exist.

mod format;

pub use format::{format_fixed, format_general};

use crate::error::{HarnessError, Result};
use ndarray::ArrayView1;
use std::fmt;
use std::io::Write;

/// Fully validated report, ready to be written in one piece
#[derive(Debug, Clone, PartialEq)]
pub struct ResultReport {
    method: String,
    cost: Option<f64>,
    train: Vec<(f64, f64)>,
    test: Vec<(f64, f64)>,
    coefficients: Vec<(f64, f64)>,
    total_time: f64,
}

impl ResultReport {
    pub fn builder(method: impl Into<String>) -> ResultReportBuilder {
        ResultReportBuilder {
            method: method.into(),
            cost: None,
            train: None,
            test: None,
            coefficients: Vec::new(),
            total_time: 0.0,
        }
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn total_time(&self) -> f64 {
        self.total_time
    }

    /// Render the whole report
    pub fn render(&self) -> String {
        self.to_string()
    }

    /// Write the rendered report with a single `write_all`
    pub fn write_to<W: Write>(&self, mut writer: W) -> std::io::Result<()> {
        writer.write_all(self.render().as_bytes())?;
        writer.flush()
    }
}

impl fmt::Display for ResultReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.cost {
            Some(cost) => writeln!(f, "# {}, cost = {}", self.method, format_general(cost))?,
            None => writeln!(f, "# {}", self.method)?,
        }

        let blocks = [
            ("% y_train_true y_train_pred", &self.train),
            ("% y_test_true y_test_pred", &self.test),
            ("% coef_true coef_pred", &self.coefficients),
        ];
        for (header, pairs) in blocks {
            writeln!(f, "{}", header)?;
            for &(truth, pred) in pairs.iter() {
                writeln!(f, "{} {}", format_fixed(truth), format_fixed(pred))?;
            }
        }

        writeln!(f, "% total_time")?;
        writeln!(f, "{}", format_fixed(self.total_time))
    }
}

/// Builder for [`ResultReport`]; `build` checks every block before anything
/// can be written.
#[derive(Debug, Clone)]
pub struct ResultReportBuilder {
    method: String,
    cost: Option<f64>,
    train: Option<Vec<(f64, f64)>>,
    test: Option<Vec<(f64, f64)>>,
    coefficients: Vec<(f64, f64)>,
    total_time: f64,
}

fn zip_checked(
    block: &str,
    truth: ArrayView1<'_, f64>,
    pred: ArrayView1<'_, f64>,
) -> Result<Vec<(f64, f64)>> {
    if truth.len() != pred.len() {
        return Err(HarnessError::DimensionMismatch {
            expected: format!("{} predicted values in {} block", truth.len(), block),
            actual: format!("{}", pred.len()),
        });
    }
    Ok(truth.iter().copied().zip(pred.iter().copied()).collect())
}

impl ResultReportBuilder {
    /// Hyperparameter value shown in the header
    pub fn cost(mut self, cost: Option<f64>) -> Self {
        self.cost = cost;
        self
    }

    pub fn train(self, y_true: ArrayView1<'_, f64>, y_pred: ArrayView1<'_, f64>) -> Result<Self> {
        let pairs = zip_checked("y_train", y_true, y_pred)?;
        Ok(Self {
            train: Some(pairs),
            ..self
        })
    }

    pub fn test(self, y_true: ArrayView1<'_, f64>, y_pred: ArrayView1<'_, f64>) -> Result<Self> {
        let pairs = zip_checked("y_test", y_true, y_pred)?;
        Ok(Self {
            test: Some(pairs),
            ..self
        })
    }

    /// Ground-truth and fitted coefficients. The block stays empty unless
    /// both are present.
    pub fn coefficients(
        self,
        coef_true: Option<ArrayView1<'_, f64>>,
        coef_pred: Option<ArrayView1<'_, f64>>,
    ) -> Result<Self> {
        let coefficients = match (coef_true, coef_pred) {
            (Some(truth), Some(pred)) => zip_checked("coef", truth, pred)?,
            _ => Vec::new(),
        };
        Ok(Self {
            coefficients,
            ..self
        })
    }

    pub fn total_time(mut self, seconds: f64) -> Self {
        self.total_time = seconds;
        self
    }

    pub fn build(self) -> Result<ResultReport> {
        let train = self
            .train
            .ok_or_else(|| HarnessError::Internal("report is missing the training block".to_string()))?;
        let test = self
            .test
            .ok_or_else(|| HarnessError::Internal("report is missing the test block".to_string()))?;
        if !(self.total_time >= 0.0) {
            return Err(HarnessError::Internal(format!(
                "total time must be non-negative, got {}",
                self.total_time
            )));
        }

        Ok(ResultReport {
            method: self.method,
            cost: self.cost,
            train,
            test,
            coefficients: self.coefficients,
            total_time: self.total_time,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_report_literal_layout() {
        let report = ResultReport::builder("ols")
            .train(array![1.0, 2.0].view(), array![1.1, 1.9].view())
            .unwrap()
            .test(array![3.0].view(), array![2.9].view())
            .unwrap()
            .coefficients(Some(array![0.5].view()), Some(array![0.6].view()))
            .unwrap()
            .total_time(0.0234)
            .build()
            .unwrap();

        let expected = "\
# ols
% y_train_true y_train_pred
1.0000000000000000 1.1000000000000001
2.0000000000000000 1.8999999999999999
% y_test_true y_test_pred
3.0000000000000000 2.8999999999999999
% coef_true coef_pred
0.5000000000000000 0.6000000000000000
% total_time
0.0234000000000000
";
        assert_eq!(report.render(), expected);
    }

    #[test]
    fn test_report_with_cost_header() {
        let report = ResultReport::builder("ridge")
            .cost(Some(0.00390625))
            .train(array![1.0].view(), array![1.0].view())
            .unwrap()
            .test(array![2.0].view(), array![2.0].view())
            .unwrap()
            .build()
            .unwrap();
        assert!(report.render().starts_with("# ridge, cost = 0.00390625\n"));

        let report = ResultReport::builder("lasso")
            .cost(Some(256.0))
            .train(array![1.0].view(), array![1.0].view())
            .unwrap()
            .test(array![2.0].view(), array![2.0].view())
            .unwrap()
            .build()
            .unwrap();
        assert!(report.render().starts_with("# lasso, cost = 256\n"));
    }

    #[test]
    fn test_report_missing_coefficients_keeps_header() {
        let report = ResultReport::builder("knn")
            .train(array![1.0].view(), array![1.5].view())
            .unwrap()
            .test(array![2.0].view(), array![2.5].view())
            .unwrap()
            .coefficients(Some(array![0.5].view()), None)
            .unwrap()
            .total_time(1.0)
            .build()
            .unwrap();

        let rendered = report.render();
        assert!(rendered.contains("% coef_true coef_pred\n% total_time\n1.0000000000000000\n"));
    }

    #[test]
    fn test_report_line_grammar() {
        let report = ResultReport::builder("ridge")
            .cost(Some(4.0))
            .train(array![1.0, -2.5, 3.25].view(), array![0.9, -2.4, 3.0].view())
            .unwrap()
            .test(array![7.0].view(), array![6.5].view())
            .unwrap()
            .coefficients(Some(array![1.0, 2.0].view()), Some(array![1.1, 1.9].view()))
            .unwrap()
            .total_time(0.5)
            .build()
            .unwrap();

        for line in report.render().lines() {
            if line.starts_with('#') || line.starts_with('%') {
                continue;
            }
            let fields: Vec<&str> = line.split(' ').collect();
            assert!(fields.len() == 1 || fields.len() == 2, "bad line {line:?}");
            for field in fields {
                let (_, decimals) = field.split_once('.').unwrap();
                assert_eq!(decimals.len(), 16, "bad float {field:?}");
                assert!(field.parse::<f64>().is_ok());
            }
        }
    }

    #[test]
    fn test_report_length_mismatch() {
        let err = ResultReport::builder("ols")
            .train(array![1.0, 2.0].view(), array![1.0].view())
            .unwrap_err();
        assert!(matches!(err, HarnessError::DimensionMismatch { .. }));

        let err = ResultReport::builder("ols")
            .coefficients(Some(array![1.0, 2.0].view()), Some(array![1.0].view()))
            .unwrap_err();
        assert!(matches!(err, HarnessError::DimensionMismatch { .. }));
    }

    #[test]
    fn test_report_requires_blocks() {
        let err = ResultReport::builder("ols").build().unwrap_err();
        assert!(matches!(err, HarnessError::Internal(_)));

        let err = ResultReport::builder("ols")
            .train(array![1.0].view(), array![1.0].view())
            .unwrap()
            .test(array![1.0].view(), array![1.0].view())
            .unwrap()
            .total_time(-1.0)
            .build()
            .unwrap_err();
        assert!(matches!(err, HarnessError::Internal(_)));
    }

    #[test]
    fn test_write_to() {
        let report = ResultReport::builder("ols")
            .train(array![1.0].view(), array![1.0].view())
            .unwrap()
            .test(array![2.0].view(), array![2.0].view())
            .unwrap()
            .build()
            .unwrap();
        let mut buffer = Vec::new();
        report.write_to(&mut buffer).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), report.render());
    }
}
