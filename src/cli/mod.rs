//! Command-line interface
//!
//! One subcommand per regression method, positional arguments in the order
//! the experiment scheduler passes them:
//!
//! ```text
//! cv-harness ols   <train> <test> [cv_seed]
//! cv-harness ridge <train> <test> <cv_seed> <alpha>
//! cv-harness lasso <train> <test> <cv_seed> <alpha>
//! ```

use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;

use crate::config::HarnessConfig;
use crate::error::Result;
use crate::experiment::{run_experiment, ExperimentPlan};
use crate::training::Method;

#[derive(Parser, Debug)]
#[command(name = "cv-harness")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Cross-validated regression experiments with machine-readable reports")]
#[command(long_about = None)]
pub struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Number of cross-validation folds (overrides the configuration)
    #[arg(long, global = true)]
    pub folds: Option<usize>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Ordinary least squares
    Ols {
        /// Training dataset (.json or .csv)
        train: PathBuf,

        /// Test dataset (.json or .csv)
        test: PathBuf,

        /// Seed for the cross-validation shuffle
        cv_seed: Option<u64>,
    },

    /// Ridge regression
    Ridge {
        train: PathBuf,
        test: PathBuf,
        cv_seed: u64,

        /// L2 regularization strength
        #[arg(allow_negative_numbers = true)]
        alpha: f64,
    },

    /// Lasso regression
    Lasso {
        train: PathBuf,
        test: PathBuf,
        cv_seed: u64,

        /// L1 regularization strength
        #[arg(allow_negative_numbers = true)]
        alpha: f64,
    },
}

impl Cli {
    /// Build the configuration: file (if any), then command-line overrides
    pub fn harness_config(&self) -> Result<HarnessConfig> {
        let mut config = match &self.config {
            Some(path) => HarnessConfig::from_file(path)?,
            None => HarnessConfig::default(),
        };
        if let Some(folds) = self.folds {
            config = config.with_n_folds(folds);
        }
        config.validate()?;
        Ok(config)
    }

    /// Translate the subcommand into an experiment description
    pub fn experiment(&self) -> Result<ExperimentPlan> {
        let plan = match &self.command {
            Commands::Ols { train, test, cv_seed } => {
                ExperimentPlan::new(Method::parse("ols", None)?, train, test).with_cv_seed(*cv_seed)
            }
            Commands::Ridge {
                train,
                test,
                cv_seed,
                alpha,
            } => ExperimentPlan::new(Method::parse("ridge", Some(*alpha))?, train, test)
                .with_cv_seed(Some(*cv_seed)),
            Commands::Lasso {
                train,
                test,
                cv_seed,
                alpha,
            } => ExperimentPlan::new(Method::parse("lasso", Some(*alpha))?, train, test)
                .with_cv_seed(Some(*cv_seed)),
        };
        Ok(plan)
    }
}

/// Run the experiment and print its report to `out`
pub fn cmd_run<W: Write>(cli: &Cli, out: W) -> Result<()> {
    let config = cli.harness_config()?;
    let plan = cli.experiment()?;
    let report = run_experiment(&config, &plan)?;
    report.write_to(out)?;
    Ok(())
}
