//! Score command implementation

use crate::output::{formatter_for, open_writer, write_entries, OutputFormat};
use anyhow::{Context, Result};
use clap::Args;
use mlbench_core::metrics::{keys, mean_squared_error};
use mlbench_core::{
    classification_report_numeric, regression_report, ConfusionMatrix, Label, Matrix,
    MetricsRecord,
};
use std::path::{Path, PathBuf};

/// Arguments for the score command
#[derive(Debug, Args)]
pub struct ScoreArgs {
    /// True labels (last column is used)
    #[arg(short, long, value_name = "FILE")]
    pub truth: PathBuf,

    /// Predicted labels (last column is used)
    #[arg(short, long, value_name = "FILE")]
    pub predictions: PathBuf,

    /// Class probabilities, one column per class; MSE becomes the quadratic loss
    #[arg(long, value_name = "FILE", conflicts_with = "regression")]
    pub probabilities: Option<PathBuf>,

    /// Score as regression (MSE only)
    #[arg(short, long)]
    pub regression: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

impl ScoreArgs {
    /// Execute the score command
    pub fn execute(&self) -> Result<()> {
        let record = self.compute()?;
        let writer = open_writer(self.output.as_deref())?;
        let mut formatter = formatter_for(self.format, writer);
        write_entries(formatter.as_mut(), &record)
    }

    /// Compute the metric record without printing it
    pub fn compute(&self) -> Result<MetricsRecord> {
        let truth = read_labels(&self.truth)?;
        let predicted = read_labels(&self.predictions)?;
        log::info!(
            "Scoring {} prediction(s) from {}",
            predicted.len(),
            self.predictions.display()
        );

        if self.regression {
            return Ok(regression_report(&truth, &predicted)?);
        }

        let mut record = classification_report_numeric(&truth, &predicted)?;
        if let Some(path) = &self.probabilities {
            let probabilities = Matrix::read(path)
                .with_context(|| format!("Failed to read probabilities: {}", path.display()))?;
            let (matrix, _) = ConfusionMatrix::from_truth_and_predictions(
                &Label::from_slice(&truth),
                &Label::from_slice(&predicted),
            )?;
            record.insert(keys::MSE, mean_squared_error(&truth, &probabilities, &matrix)?);
        }
        Ok(record)
    }
}

fn read_labels(path: &Path) -> Result<Vec<f64>> {
    let matrix =
        Matrix::read(path).with_context(|| format!("Failed to read labels: {}", path.display()))?;
    Ok(matrix.into_labels())
}
