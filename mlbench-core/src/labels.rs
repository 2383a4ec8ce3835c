//! Label encoding for tools that dictate their own label space
//!
//! Some tools only train on contiguous class indices `0..n`, others only on
//! `{-1, +1}`. The codec maps original labels into that space and back, so
//! metrics are always computed against the original label identities.

use crate::error::{HarnessError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A numeric class label with total equality.
///
/// Wraps the `f64` values read from dataset and prediction files so they
/// can be used as map keys. `-0.0` and `0.0` compare equal; all NaNs are
/// one label.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Label(f64);

impl Label {
    /// Wrap a raw value
    pub fn new(value: f64) -> Self {
        Self(value)
    }

    /// The raw value
    pub fn value(self) -> f64 {
        self.0
    }

    /// Wrap a whole vector
    pub fn from_slice(values: &[f64]) -> Vec<Label> {
        values.iter().copied().map(Label).collect()
    }

    fn key(self) -> u64 {
        if self.0 == 0.0 {
            0
        } else if self.0.is_nan() {
            f64::NAN.to_bits()
        } else {
            self.0.to_bits()
        }
    }
}

impl PartialEq for Label {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Label {}

impl Hash for Label {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl From<f64> for Label {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Forward mapping from original labels to encoded integers
#[derive(Debug, Clone)]
pub struct LabelMap<T> {
    forward: HashMap<T, i64>,
    inverse: HashMap<i64, T>,
}

impl<T: Eq + Hash + Clone> LabelMap<T> {
    fn from_pairs(pairs: impl IntoIterator<Item = (T, i64)>) -> Self {
        let mut forward = HashMap::new();
        let mut inverse = HashMap::new();
        for (label, code) in pairs {
            inverse.insert(code, label.clone());
            forward.insert(label, code);
        }
        Self { forward, inverse }
    }

    /// Encoded value for an original label
    pub fn encode(&self, label: &T) -> Option<i64> {
        self.forward.get(label).copied()
    }

    /// Original label for an encoded value
    pub fn original(&self, code: i64) -> Option<&T> {
        self.inverse.get(&code)
    }

    /// Number of classes in the map
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    /// True for a map built from an empty vector
    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }
}

/// Distinct labels in order of first appearance
fn distinct<T: Eq + Hash + Clone>(labels: &[T]) -> Vec<T> {
    let mut seen = std::collections::HashSet::new();
    labels
        .iter()
        .filter(|label| seen.insert(*label))
        .cloned()
        .collect()
}

fn substitute<T: Eq + Hash + Clone>(labels: &[T], map: &LabelMap<T>) -> Vec<i64> {
    // Every label is in the map because the map was built from `labels`
    labels.iter().filter_map(|label| map.encode(label)).collect()
}

/// Encode labels as contiguous integers in `0..num_classes`.
///
/// Classes are numbered in order of first appearance.
pub fn encode_multiclass<T: Eq + Hash + Clone>(labels: &[T]) -> (Vec<i64>, LabelMap<T>) {
    let map = LabelMap::from_pairs(distinct(labels).into_iter().zip(0_i64..));
    (substitute(labels, &map), map)
}

/// Encode a two-class vector as `{-1, +1}`.
///
/// The first label to appear becomes `-1`.
pub fn encode_binary<T: Eq + Hash + Clone>(labels: &[T]) -> Result<(Vec<i64>, LabelMap<T>)> {
    let classes = distinct(labels);
    if classes.len() != 2 {
        return Err(HarnessError::NotBinaryLabels {
            distinct: classes.len(),
        });
    }
    let map = LabelMap::from_pairs(classes.into_iter().zip([-1_i64, 1]));
    Ok((substitute(labels, &map), map))
}

/// Map encoded values back to the original labels
pub fn decode<T: Eq + Hash + Clone>(values: &[i64], map: &LabelMap<T>) -> Result<Vec<T>> {
    values
        .iter()
        .map(|&code| {
            map.original(code)
                .cloned()
                .ok_or_else(|| HarnessError::UnknownEncodedValue {
                    value: code.to_string(),
                })
        })
        .collect()
}

/// Decode predictions printed as floats (`1.0`, `-1.0`).
///
/// Values that are not whole numbers have no inverse.
pub fn decode_numeric<T: Eq + Hash + Clone>(values: &[f64], map: &LabelMap<T>) -> Result<Vec<T>> {
    values
        .iter()
        .map(|&value| {
            let code = value as i64;
            if value.fract() != 0.0 || !value.is_finite() || code as f64 != value {
                return Err(HarnessError::UnknownEncodedValue {
                    value: value.to_string(),
                });
            }
            map.original(code)
                .cloned()
                .ok_or_else(|| HarnessError::UnknownEncodedValue {
                    value: value.to_string(),
                })
        })
        .collect()
}
