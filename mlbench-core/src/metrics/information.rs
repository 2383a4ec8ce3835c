//! Mean predictive information
//!
//! A log-loss style score computed from hard predictions. Values are
//! clamped to 0.05 and 0.95 so no logarithm of 0 or 1 is ever taken.

use super::confusion::ClassOrder;
use crate::dataset::Matrix;
use crate::error::{HarnessError, Result};
use crate::labels::Label;
use std::hash::Hash;
use std::path::Path;

const CLAMP_LOW: f64 = 0.05;
const CLAMP_HIGH: f64 = 0.95;

fn check_lengths(truth: usize, predicted: usize) -> Result<()> {
    if truth != predicted {
        return Err(HarnessError::LengthMismatch {
            expected: truth,
            found: predicted,
        });
    }
    Ok(())
}

/// Mean predictive information of one class, one-vs-rest.
///
/// Averages over the instances whose true label is `class`; a class with
/// no such instance scores exactly 1.
pub fn mean_predictive_information_class<T: PartialEq>(
    class: &T,
    truth: &[T],
    predicted: &[T],
) -> Result<f64> {
    check_lengths(truth.len(), predicted.len())?;

    let mut sum = 0.0;
    let mut count = 0usize;
    for (t, p) in truth.iter().zip(predicted) {
        if t != class {
            continue;
        }
        count += 1;
        let predicted_val = if p == t { CLAMP_LOW } else { CLAMP_HIGH };
        sum += CLAMP_LOW * predicted_val.log2() + predicted_val * (1.0 - predicted_val).log2();
    }

    if count != 0 {
        sum /= count as f64;
    }
    Ok(sum + 1.0)
}

/// Unweighted mean of the per-class score over every class in `order`
pub fn avg_mean_predictive_information<T: Eq + Hash + Clone>(
    order: &ClassOrder<T>,
    truth: &[T],
    predicted: &[T],
) -> Result<f64> {
    check_lengths(truth.len(), predicted.len())?;
    if order.is_empty() {
        return Ok(0.0);
    }

    let mut total = 0.0;
    for class in order.classes() {
        total += mean_predictive_information_class(class, truth, predicted)?;
    }
    Ok(total / order.len() as f64)
}

/// [`avg_mean_predictive_information`] over label files
pub fn mean_predictive_information_from_files(
    truth_path: &Path,
    predicted_path: &Path,
) -> Result<f64> {
    let truth = Label::from_slice(&Matrix::read(truth_path)?.into_labels());
    let predicted = Label::from_slice(&Matrix::read(predicted_path)?.into_labels());
    let order = ClassOrder::from_truth(&truth);
    avg_mean_predictive_information(&order, &truth, &predicted)
}
