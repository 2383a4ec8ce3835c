//! Adapter contract
//!
//! An adapter wraps one tool's method. It is built from method parameters
//! (the tool's options plus the datasets) and run parameters (timeout and
//! install paths), reports metrics through [`Method::metric`] and names
//! itself through `Display`.

use crate::config::RunConfig;
use crate::dataset::{DatasetRef, Matrix};
use crate::error::{HarnessError, Result};
use crate::exec::{self, ToolCommand};
use crate::metrics::{classification_report_numeric, keys, regression_report, MetricsRecord};
use crate::timer::TimerReport;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// A benchmarkable method
pub trait Method: fmt::Display {
    /// Run the method once and report its metrics
    fn metric(&mut self) -> Result<MetricsRecord>;
}

/// Method options, keyed by option name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MethodParams(BTreeMap<String, Value>);

impl MethodParams {
    /// Key holding the dataset path or list of paths
    pub const DATASETS: &'static str = "datasets";

    /// Create an empty parameter set
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an option
    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Raw value of an option
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// String option
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key)?.as_str()
    }

    /// Numeric option; numeric strings are accepted
    pub fn get_f64(&self, key: &str) -> Option<f64> {
        match self.get(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Non-negative integer option; numeric strings are accepted
    pub fn get_u64(&self, key: &str) -> Option<u64> {
        match self.get(key)? {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// The dataset reference: a single path or a list of one to three
    pub fn datasets(&self) -> Result<DatasetRef> {
        match self.get(Self::DATASETS) {
            Some(Value::String(path)) => DatasetRef::new([path.as_str()]),
            Some(Value::Array(items)) => {
                let paths = items
                    .iter()
                    .map(|item| {
                        item.as_str().ok_or_else(|| {
                            HarnessError::Config(format!("dataset entry {item} is not a path"))
                        })
                    })
                    .collect::<Result<Vec<&str>>>()?;
                DatasetRef::new(paths)
            }
            Some(other) => Err(HarnessError::Config(format!(
                "'{}' must be a path or list of paths, got {other}",
                Self::DATASETS
            ))),
            None => Err(HarnessError::Config(format!(
                "missing '{}' parameter",
                Self::DATASETS
            ))),
        }
    }
}

impl From<BTreeMap<String, Value>> for MethodParams {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Self(map)
    }
}

/// Wall-clock timer for methods that run in-process
#[derive(Debug, Clone, Copy)]
pub struct Stopwatch {
    started: Instant,
}

impl Stopwatch {
    /// Start timing now
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    /// Time since start
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Seconds since start
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed().as_secs_f64()
    }

    /// Run `f` and return its result with the seconds it took
    pub fn time<R>(f: impl FnOnce() -> R) -> (R, f64) {
        let watch = Self::start();
        let result = f();
        (result, watch.elapsed_secs())
    }
}

/// What the predictions of a method are scored as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Task {
    /// Class labels, scored with the confusion-matrix suite
    #[default]
    Classification,
    /// Continuous values, scored with mean squared error
    Regression,
}

/// Timer phase holding a tool's total time
pub const DEFAULT_TOTAL_PHASE: &str = "total_time";

/// Phases subtracted from the total to get the runtime
pub const DEFAULT_IO_PHASES: &[&str] = &["loading_data", "saving_data"];

/// Adapter for a tool whose command line is already assembled.
///
/// Drives the whole pipeline: datasets are resolved on construction, then
/// each [`Method::metric`] call runs the command, scrapes its timers and
/// scores the prediction file against the true test labels when both are
/// available.
#[derive(Debug, Clone)]
pub struct ExternalMethod {
    name: String,
    command: ToolCommand,
    timeout: Duration,
    datasets: DatasetRef,
    predictions: Option<PathBuf>,
    task: Task,
    total_phase: String,
    subtract_phases: Vec<String>,
    report_phases: Vec<String>,
}

impl ExternalMethod {
    /// Resolve `datasets` against the formats the tool accepts and wrap
    /// `command`.
    ///
    /// The run configuration supplies the timeout and, when the command
    /// has none, the working directory.
    pub fn new(
        name: impl Into<String>,
        command: ToolCommand,
        datasets: &DatasetRef,
        accepted: &[&str],
        run: &RunConfig,
    ) -> Result<Self> {
        let datasets = datasets.resolve(accepted)?;
        let command = match &run.working_dir {
            Some(dir) if command.working_dir().is_none() => command.current_dir(dir),
            _ => command,
        };

        Ok(Self {
            name: name.into(),
            command,
            timeout: run.timeout,
            datasets,
            predictions: None,
            task: Task::default(),
            total_phase: DEFAULT_TOTAL_PHASE.to_string(),
            subtract_phases: DEFAULT_IO_PHASES.iter().map(|s| s.to_string()).collect(),
            report_phases: Vec::new(),
        })
    }

    /// File the tool writes its predictions to
    pub fn predictions(mut self, path: impl Into<PathBuf>) -> Self {
        self.predictions = Some(path.into());
        self
    }

    /// How predictions are scored
    pub fn task(mut self, task: Task) -> Self {
        self.task = task;
        self
    }

    /// Phase holding the total and phases deducted from it for `runtime`
    pub fn runtime_phases(mut self, total: impl Into<String>, subtract: &[&str]) -> Self {
        self.total_phase = total.into();
        self.subtract_phases = subtract.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Timer phases copied into the record under their own names
    pub fn report_phases(mut self, phases: &[&str]) -> Self {
        self.report_phases = phases.iter().map(|s| s.to_string()).collect();
        self
    }

    /// The resolved datasets
    pub fn datasets(&self) -> &DatasetRef {
        &self.datasets
    }

    /// The command that will be run
    pub fn command(&self) -> &ToolCommand {
        &self.command
    }

    fn prediction_path(&self) -> Option<PathBuf> {
        let path = self.predictions.as_deref()?;
        match self.command.working_dir() {
            Some(dir) if path.is_relative() => Some(dir.join(path)),
            _ => Some(path.to_path_buf()),
        }
    }

    fn score(&self, truth_path: &Path, predictions_path: &Path) -> Result<MetricsRecord> {
        let truth = Matrix::read(truth_path)?.into_labels();
        let predicted = Matrix::read(predictions_path)?.into_labels();
        match self.task {
            Task::Classification => classification_report_numeric(&truth, &predicted),
            Task::Regression => regression_report(&truth, &predicted),
        }
    }
}

impl Method for ExternalMethod {
    fn metric(&mut self) -> Result<MetricsRecord> {
        let output = exec::run(&self.command, self.timeout)?;
        let timers = TimerReport::parse(&output.bytes);

        let mut record = MetricsRecord::new();
        let subtract: Vec<&str> = self.subtract_phases.iter().map(String::as_str).collect();
        match timers.runtime(&self.total_phase, &subtract) {
            Some(runtime) => {
                record.insert(keys::RUNTIME, runtime);
            }
            None => {
                log::debug!(
                    "{}: no '{}' timer ({:?} dialect), using wall-clock time",
                    self.name,
                    self.total_phase,
                    timers.dialect
                );
                record.insert(keys::RUNTIME, output.elapsed.as_secs_f64());
            }
        }
        record.add_timers(&timers, &self.report_phases);

        if let (Some(truth_path), Some(predictions_path)) =
            (self.datasets.test_labels(), self.prediction_path())
        {
            record.merge(self.score(truth_path, &predictions_path)?);
        }

        log::info!("{}: {} metric(s) recorded", self.name, record.len());
        Ok(record)
    }
}

impl fmt::Display for ExternalMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_datasets_single_or_list() {
        let single = MethodParams::new().set("datasets", "iris.csv");
        assert_eq!(single.datasets().unwrap().len(), 1);

        let list = MethodParams::new().set("datasets", json!(["a.csv", "b.csv", "c.csv"]));
        let refs = list.datasets().unwrap();
        assert_eq!(refs.test_labels(), Some(Path::new("c.csv")));

        assert!(MethodParams::new().datasets().is_err());
        assert!(MethodParams::new().set("datasets", 3).datasets().is_err());
    }

    #[test]
    fn test_typed_accessors() {
        let params = MethodParams::new()
            .set("k", 5)
            .set("tolerance", "1e-4")
            .set("solver", "auto");
        assert_eq!(params.get_u64("k"), Some(5));
        assert_eq!(params.get_f64("tolerance"), Some(1e-4));
        assert_eq!(params.get_str("solver"), Some("auto"));
        assert_eq!(params.get_u64("missing"), None);
    }

    #[test]
    fn test_stopwatch() {
        let (value, secs) = Stopwatch::time(|| 2 + 2);
        assert_eq!(value, 4);
        assert!(secs >= 0.0);
    }
}
