//! Squared-error metrics

use super::confusion::ConfusionMatrix;
use crate::dataset::Matrix;
use crate::error::{HarnessError, Result};
use std::path::Path;

/// Mean of squared differences between true and predicted values.
///
/// An empty pair of vectors scores 0.
pub fn simple_mean_squared_error(truth: &[f64], predicted: &[f64]) -> Result<f64> {
    if truth.len() != predicted.len() {
        return Err(HarnessError::LengthMismatch {
            expected: truth.len(),
            found: predicted.len(),
        });
    }
    if truth.is_empty() {
        return Ok(0.0);
    }

    let sum: f64 = truth
        .iter()
        .zip(predicted)
        .map(|(t, p)| (t - p) * (t - p))
        .sum();
    Ok(sum / truth.len() as f64)
}

/// Quadratic loss of class-probability output.
///
/// Each true label `k` is one-hot encoded at column `k - 1` (labels are
/// 1-based class numbers); a label outside `1..=classes` encodes as all
/// zeros. Per instance, squared differences against the probability row
/// are summed and divided by the class count taken from `matrix`; the
/// result is averaged over instances. Missing probability columns read
/// as 0.
pub fn mean_squared_error(
    truth: &[f64],
    probabilities: &Matrix,
    matrix: &ConfusionMatrix,
) -> Result<f64> {
    if probabilities.rows() != truth.len() {
        return Err(HarnessError::LengthMismatch {
            expected: truth.len(),
            found: probabilities.rows(),
        });
    }
    let classes = matrix.size();
    if classes == 0 || truth.is_empty() {
        return Ok(0.0);
    }

    let mut total = 0.0;
    for (i, &label) in truth.iter().enumerate() {
        let hot = one_hot_index(label, classes);
        let squared: f64 = (0..classes)
            .map(|j| {
                let expected = if hot == Some(j) { 1.0 } else { 0.0 };
                let diff = expected - probabilities.get(i, j).unwrap_or(0.0);
                diff * diff
            })
            .sum();
        total += squared / classes as f64;
    }
    Ok(total / truth.len() as f64)
}

fn one_hot_index(label: f64, classes: usize) -> Option<usize> {
    if label.fract() != 0.0 || label < 1.0 || label > classes as f64 {
        return None;
    }
    Some(label as usize - 1)
}

/// [`mean_squared_error`] reading the true labels and probabilities from files
pub fn mean_squared_error_from_files(
    truth_path: &Path,
    probabilities_path: &Path,
    matrix: &ConfusionMatrix,
) -> Result<f64> {
    let truth = Matrix::read(truth_path)?.into_labels();
    let probabilities = Matrix::read(probabilities_path)?;
    mean_squared_error(&truth, &probabilities, matrix)
}
