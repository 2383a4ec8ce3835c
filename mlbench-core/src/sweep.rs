//! Parameter sweeps
//!
//! A parameter value written as `sweep(start, stop, step)` stands for the
//! half-open range `start, start + step, ...` below `stop`. Expanding a
//! parameter set replaces it with one concrete set per value.

use serde_json::{Number, Value};
use std::collections::BTreeMap;

/// One method's options: name to value
pub type ParamSet = BTreeMap<String, Value>;

const DIRECTIVE_PREFIX: &str = "sweep(";

/// Largest number of values one directive may expand to
pub const MAX_SWEEP_VALUES: u64 = 10_000;

/// A parsed `sweep(start, stop, step)` directive
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepDirective {
    /// First value, inclusive
    pub start: f64,
    /// Upper bound, exclusive
    pub stop: f64,
    /// Increment, must be positive
    pub step: f64,
}

impl SweepDirective {
    /// Parse a directive from a parameter value.
    ///
    /// `None` for anything that is not a well-formed directive with a
    /// positive step, including plain numbers and strings.
    pub fn parse(value: &Value) -> Option<Self> {
        let text = value.as_str()?.trim();
        let inner = text.strip_prefix(DIRECTIVE_PREFIX)?.strip_suffix(')')?;

        let parts: Vec<f64> = inner
            .split(',')
            .map(|part| part.trim().parse::<f64>())
            .collect::<Result<_, _>>()
            .ok()?;
        let [start, stop, step] = parts[..] else {
            return None;
        };
        if !(start.is_finite() && stop.is_finite() && step.is_finite()) || step <= 0.0 {
            return None;
        }
        Some(Self { start, stop, step })
    }

    /// The values of the half-open range, produced lazily
    pub fn values(&self) -> impl Iterator<Item = f64> {
        let Self { start, stop, step } = *self;
        (0_u64..)
            .map(move |i| start + i as f64 * step)
            .take_while(move |&v| v < stop)
    }

    /// Upper bound on the number of values; exact up to float rounding
    pub fn len_hint(&self) -> u64 {
        if self.stop <= self.start {
            return 0;
        }
        let count = ((self.stop - self.start) / self.step).ceil();
        if count >= u64::MAX as f64 {
            u64::MAX
        } else {
            count as u64
        }
    }
}

fn looks_like_directive(value: &Value) -> bool {
    value
        .as_str()
        .is_some_and(|s| s.trim_start().starts_with(DIRECTIVE_PREFIX))
}

/// Expand every parameter set that carries a sweep directive.
///
/// Only the first swept key of a set (in key order) is expanded; any later
/// directive in the same set is copied through as its literal string. Sets
/// without a directive, and sets whose directive is malformed or would
/// expand to more than [`MAX_SWEEP_VALUES`] values, pass through unchanged.
pub fn expand(param_sets: &[ParamSet]) -> Vec<ParamSet> {
    let mut expanded = Vec::with_capacity(param_sets.len());

    for set in param_sets {
        let swept = set.iter().find_map(|(key, value)| {
            if !looks_like_directive(value) {
                return None;
            }
            match SweepDirective::parse(value) {
                Some(directive) if directive.len_hint() > MAX_SWEEP_VALUES => {
                    log::warn!(
                        "ignoring sweep directive for '{key}': {value} expands to more than \
                         {MAX_SWEEP_VALUES} values"
                    );
                    None
                }
                Some(directive) => Some((key, directive)),
                None => {
                    log::warn!("ignoring malformed sweep directive for '{key}': {value}");
                    None
                }
            }
        });

        match swept {
            Some((key, directive)) => {
                for v in directive.values() {
                    let mut concrete = set.clone();
                    let number = Number::from_f64(v).map_or(Value::Null, Value::Number);
                    concrete.insert(key.clone(), number);
                    expanded.push(concrete);
                }
            }
            None => expanded.push(set.clone()),
        }
    }

    expanded
}
