//! Confusion matrices and the per-class metrics derived from them
//!
//! Class indices refer to rows of the matrix. When the matrix is built
//! from label vectors, the row order is the order in which classes first
//! appear in the ground truth, and that order travels with the matrix as
//! a [`ClassOrder`].

use crate::error::{HarnessError, Result};
use std::collections::HashMap;
use std::hash::Hash;

/// Classes in order of first appearance in the ground truth
#[derive(Debug, Clone)]
pub struct ClassOrder<T> {
    classes: Vec<T>,
    index: HashMap<T, usize>,
}

impl<T: PartialEq> PartialEq for ClassOrder<T> {
    fn eq(&self, other: &Self) -> bool {
        self.classes == other.classes
    }
}

impl<T: Eq> Eq for ClassOrder<T> {}

impl<T: Eq + Hash + Clone> ClassOrder<T> {
    /// Derive the order from a true-label vector
    pub fn from_truth(truth: &[T]) -> Self {
        let mut classes = Vec::new();
        let mut index = HashMap::new();
        for label in truth {
            if !index.contains_key(label) {
                index.insert(label.clone(), classes.len());
                classes.push(label.clone());
            }
        }
        Self { classes, index }
    }

    /// Row index of a class
    pub fn index_of(&self, label: &T) -> Option<usize> {
        self.index.get(label).copied()
    }

    /// Class at a row index
    pub fn class_at(&self, index: usize) -> Option<&T> {
        self.classes.get(index)
    }

    /// All classes in row order
    pub fn classes(&self) -> &[T] {
        &self.classes
    }

    /// Number of classes
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// True if no classes were observed
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// One-vs-rest counts for a single class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OneVsRest {
    /// Instances of the class predicted as the class
    pub true_positives: u64,
    /// Instances of other classes predicted as the class
    pub false_positives: u64,
    /// Instances of the class predicted as something else
    pub false_negatives: u64,
    /// Instances of other classes predicted as something other than the class
    pub true_negatives: u64,
}

impl OneVsRest {
    /// Matthews correlation coefficient, 0 when undefined
    pub fn mcc(&self) -> f64 {
        let tp = self.true_positives as f64;
        let fp = self.false_positives as f64;
        let fn_ = self.false_negatives as f64;
        let tn = self.true_negatives as f64;

        let numerator = tp * tn - fp * fn_;
        let radicand = (tp + fp) * (tp + fn_) * (tn + fp) * (tn + fn_);
        if radicand == 0.0 {
            0.0
        } else {
            numerator / radicand.sqrt()
        }
    }

    /// Dice form of the F-measure, `2TP / (2TP + FP + FN)`, 0 when undefined
    pub fn dice(&self) -> f64 {
        let tp2 = 2.0 * self.true_positives as f64;
        let denominator = tp2 + self.false_positives as f64 + self.false_negatives as f64;
        if denominator == 0.0 {
            0.0
        } else {
            tp2 / denominator
        }
    }
}

/// Square count matrix, rows are true classes, columns predicted classes.
///
/// Predictions naming a class outside the ground truth have no column but
/// still belong to their true class's row: they count toward
/// [`ConfusionMatrix::row_sum`] and [`ConfusionMatrix::total`], and they are
/// false negatives for that class.
///
/// Every per-class accessor takes a class index in `0..size()`.
///
/// # Panics
///
/// The indexed accessors (`get`, `row_sum`, `column_sum`, `one_vs_rest`,
/// `precision`, `recall`, `f_measure`, `lift`, `mcc`) panic on an index
/// outside `0..size()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfusionMatrix {
    size: usize,
    counts: Vec<u64>,
    unmatched: Vec<u64>,
}

impl ConfusionMatrix {
    /// Build from explicit rows; the matrix must be square
    pub fn from_rows(rows: Vec<Vec<u64>>) -> Result<Self> {
        let size = rows.len();
        let mut counts = Vec::with_capacity(size * size);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != size {
                return Err(HarnessError::InvalidInput(format!(
                    "confusion matrix row {i} has {} entries, expected {size}",
                    row.len()
                )));
            }
            counts.extend(row);
        }
        Ok(Self {
            size,
            counts,
            unmatched: vec![0; size],
        })
    }

    /// Count co-occurrences of true and predicted labels.
    ///
    /// Rows follow `order`. A prediction naming a class that never occurs
    /// in the ground truth has no column; it is kept against its true row
    /// and reported by [`ConfusionMatrix::unmatched`].
    pub fn from_labels<T: Eq + Hash + Clone>(
        truth: &[T],
        predicted: &[T],
        order: &ClassOrder<T>,
    ) -> Result<Self> {
        if truth.len() != predicted.len() {
            return Err(HarnessError::LengthMismatch {
                expected: truth.len(),
                found: predicted.len(),
            });
        }

        let size = order.len();
        let mut counts = vec![0; size * size];
        let mut unmatched = vec![0; size];
        for (t, p) in truth.iter().zip(predicted) {
            let row = order.index_of(t).ok_or_else(|| {
                HarnessError::InvalidInput("true label missing from class order".to_string())
            })?;
            match order.index_of(p) {
                Some(col) => counts[row * size + col] += 1,
                None => unmatched[row] += 1,
            }
        }

        let dropped: u64 = unmatched.iter().sum();
        if dropped > 0 {
            log::warn!("{dropped} prediction(s) name classes absent from the ground truth");
        }

        Ok(Self {
            size,
            counts,
            unmatched,
        })
    }

    /// Derive the class order from `truth` and build the matrix
    pub fn from_truth_and_predictions<T: Eq + Hash + Clone>(
        truth: &[T],
        predicted: &[T],
    ) -> Result<(Self, ClassOrder<T>)> {
        let order = ClassOrder::from_truth(truth);
        let matrix = Self::from_labels(truth, predicted, &order)?;
        Ok((matrix, order))
    }

    /// Number of classes
    pub fn size(&self) -> usize {
        self.size
    }

    /// Count at (`true_class`, `predicted_class`)
    ///
    /// # Panics
    ///
    /// If either index is not below [`ConfusionMatrix::size`].
    pub fn get(&self, true_class: usize, predicted_class: usize) -> u64 {
        self.counts[true_class * self.size + predicted_class]
    }

    /// Predictions whose class has no column, over all rows
    pub fn unmatched(&self) -> usize {
        self.unmatched.iter().sum::<u64>() as usize
    }

    /// Predictions of true class `i` whose class has no column
    pub fn unmatched_in_row(&self, i: usize) -> u64 {
        self.unmatched[i]
    }

    /// Sum of row `i`: instances whose true class is `i`, including those
    /// predicted as an unknown class
    pub fn row_sum(&self, i: usize) -> u64 {
        (0..self.size).map(|j| self.get(i, j)).sum::<u64>() + self.unmatched[i]
    }

    /// Sum of column `j`: instances predicted as `j`
    pub fn column_sum(&self, j: usize) -> u64 {
        (0..self.size).map(|i| self.get(i, j)).sum()
    }

    /// All counted instances
    pub fn total(&self) -> u64 {
        self.counts.iter().sum::<u64>() + self.unmatched.iter().sum::<u64>()
    }

    /// One-vs-rest counts for class `i`
    pub fn one_vs_rest(&self, i: usize) -> OneVsRest {
        let tp = self.get(i, i);
        let fp = self.column_sum(i) - tp;
        let fn_ = self.row_sum(i) - tp;
        OneVsRest {
            true_positives: tp,
            false_positives: fp,
            false_negatives: fn_,
            true_negatives: self.total() - tp - fp - fn_,
        }
    }

    /// One-vs-rest counts for every class, in row order
    pub fn decompose(&self) -> Vec<OneVsRest> {
        (0..self.size).map(|i| self.one_vs_rest(i)).collect()
    }

    fn mean(&self, per_class: impl Fn(usize) -> f64) -> f64 {
        if self.size == 0 {
            return 0.0;
        }
        (0..self.size).map(per_class).sum::<f64>() / self.size as f64
    }

    /// Mean over classes of the fraction of each class predicted correctly.
    ///
    /// A class row without instances contributes 0.
    pub fn average_accuracy(&self) -> f64 {
        self.mean(|i| ratio(self.get(i, i), self.row_sum(i)))
    }

    /// `TP / (TP + FP)` for class `i`; 1 when nothing was predicted as `i`
    pub fn precision(&self, i: usize) -> f64 {
        let counts = self.one_vs_rest(i);
        let predicted = counts.true_positives + counts.false_positives;
        if predicted == 0 {
            1.0
        } else {
            counts.true_positives as f64 / predicted as f64
        }
    }

    /// `TP / row sum` for class `i`; 0 for a row without instances
    pub fn recall(&self, i: usize) -> f64 {
        ratio(self.get(i, i), self.row_sum(i))
    }

    /// Unweighted mean of per-class precision
    pub fn avg_precision(&self) -> f64 {
        self.mean(|i| self.precision(i))
    }

    /// Unweighted mean of per-class recall
    pub fn avg_recall(&self) -> f64 {
        self.mean(|i| self.recall(i))
    }

    /// Harmonic mean of precision and recall for class `i`.
    ///
    /// When both are zero this falls back to `2TP / (2TP + FP + FN)`.
    pub fn f_measure(&self, i: usize) -> f64 {
        let precision = self.precision(i);
        let recall = self.recall(i);
        if precision + recall != 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            self.one_vs_rest(i).dice()
        }
    }

    /// Unweighted mean of per-class F-measure
    pub fn avg_f_measure(&self) -> f64 {
        self.mean(|i| self.f_measure(i))
    }

    /// Lift of class `i`.
    ///
    /// The share of row `i` on the diagonal divided by the share of all
    /// instances predicted as column 0. The reference column is always 0,
    /// not `i`. 0 when either share is undefined.
    pub fn lift(&self, i: usize) -> f64 {
        let total = self.total();
        let row = self.row_sum(i);
        if total == 0 || row == 0 || self.size == 0 {
            return 0.0;
        }
        let hit_share = self.get(i, i) as f64 / row as f64;
        let reference_share = self.column_sum(0) as f64 / total as f64;
        if reference_share == 0.0 {
            0.0
        } else {
            hit_share / reference_share
        }
    }

    /// Unweighted mean of per-class lift
    pub fn lift_multiclass(&self) -> f64 {
        self.mean(|i| self.lift(i))
    }

    /// One-vs-rest Matthews correlation coefficient for class `i`
    pub fn mcc(&self, i: usize) -> f64 {
        self.one_vs_rest(i).mcc()
    }

    /// Unweighted mean of per-class MCC
    pub fn mcc_multiclass(&self) -> f64 {
        let decomposed = self.decompose();
        self.mean(|i| decomposed[i].mcc())
    }
}

fn ratio(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}
