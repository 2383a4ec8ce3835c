//! Standard metric suites assembled into a [`MetricsRecord`]

use super::confusion::ConfusionMatrix;
use super::information::avg_mean_predictive_information;
use super::record::{keys, MetricsRecord};
use super::regression::simple_mean_squared_error;
use crate::error::Result;
use crate::labels::Label;
use std::hash::Hash;

/// Confusion-matrix suite for any classifier.
///
/// Fills accuracy, MCC, precision, recall, F-measure, lift and mean
/// predictive information. The matrix is built once and every metric
/// reads the same one-vs-rest decomposition.
pub fn classification_report<T: Eq + Hash + Clone>(
    truth: &[T],
    predicted: &[T],
) -> Result<MetricsRecord> {
    let (matrix, order) = ConfusionMatrix::from_truth_and_predictions(truth, predicted)?;

    let mut record = MetricsRecord::new();
    record
        .insert(keys::ACCURACY, matrix.average_accuracy())
        .insert(keys::MCC, matrix.mcc_multiclass())
        .insert(keys::PRECISION, matrix.avg_precision())
        .insert(keys::RECALL, matrix.avg_recall())
        .insert(keys::F_MEASURE, matrix.avg_f_measure())
        .insert(keys::LIFT, matrix.lift_multiclass())
        .insert(
            keys::INFORMATION,
            avg_mean_predictive_information(&order, truth, predicted)?,
        );
    Ok(record)
}

/// [`classification_report`] for numeric labels, plus mean squared error
pub fn classification_report_numeric(truth: &[f64], predicted: &[f64]) -> Result<MetricsRecord> {
    let mut record =
        classification_report(&Label::from_slice(truth), &Label::from_slice(predicted))?;
    record.insert(keys::MSE, simple_mean_squared_error(truth, predicted)?);
    Ok(record)
}

/// Suite for regressors: mean squared error only
pub fn regression_report(truth: &[f64], predicted: &[f64]) -> Result<MetricsRecord> {
    let mut record = MetricsRecord::new();
    record.insert(keys::MSE, simple_mean_squared_error(truth, predicted)?);
    Ok(record)
}
