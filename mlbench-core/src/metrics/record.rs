//! Per-run metrics record

use crate::timer::TimerReport;
use serde::{Deserialize, Serialize};
use std::collections::btree_map;
use std::collections::BTreeMap;

/// Metric names used by the standard reports
pub mod keys {
    /// Mean per-class accuracy
    pub const ACCURACY: &str = "ACC";
    /// Mean one-vs-rest Matthews correlation
    pub const MCC: &str = "MCC";
    /// Mean per-class precision
    pub const PRECISION: &str = "Precision";
    /// Mean per-class recall
    pub const RECALL: &str = "Recall";
    /// Mean per-class F-measure
    pub const F_MEASURE: &str = "FMeasure";
    /// Mean per-class lift
    pub const LIFT: &str = "Lift";
    /// Mean predictive information
    pub const INFORMATION: &str = "Information";
    /// Mean squared error
    pub const MSE: &str = "MSE";
    /// Tool-reported or measured runtime in seconds
    pub const RUNTIME: &str = "runtime";
}

/// Metric name to value.
///
/// A missing key means the metric was not computed for this run; there is
/// no implicit zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricsRecord {
    values: BTreeMap<String, f64>,
}

impl MetricsRecord {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a metric, replacing any earlier value
    pub fn insert(&mut self, name: impl Into<String>, value: f64) -> &mut Self {
        self.values.insert(name.into(), value);
        self
    }

    /// Value of a metric
    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    /// True if the metric was computed
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Copy every entry of `other` into this record; `other` wins on clashes
    pub fn merge(&mut self, other: MetricsRecord) -> &mut Self {
        self.values.extend(other.values);
        self
    }

    /// Copy the named timer phases that were reported
    pub fn add_timers(&mut self, report: &TimerReport, phases: &[String]) -> &mut Self {
        for phase in phases {
            if let Some(seconds) = report.get(phase) {
                self.insert(phase.clone(), seconds);
            }
        }
        self
    }

    /// Entries in name order
    pub fn iter(&self) -> btree_map::Iter<'_, String, f64> {
        self.values.iter()
    }

    /// Number of metrics
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if nothing was computed
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<'a> IntoIterator for &'a MetricsRecord {
    type Item = (&'a String, &'a f64);
    type IntoIter = btree_map::Iter<'a, String, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for MetricsRecord {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}
