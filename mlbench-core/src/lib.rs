//! Harness plumbing for benchmarking external machine-learning tools
//!
//! This crate prepares dataset files in the formats a tool demands,
//! supervises the tool as an external process, scrapes timing data from
//! whatever it prints and scores its predictions with a confusion-matrix
//! based metrics engine.

#![warn(missing_docs)]

pub mod config;
pub mod dataset;
pub mod error;
pub mod exec;
pub mod labels;
pub mod method;
pub mod metrics;
pub mod sweep;
pub mod timer;

// Re-export key types
pub use config::RunConfig;
pub use dataset::{load, resolve, split, DatasetRef, LoadedDatasets, Matrix};
pub use error::{HarnessError, Result};
pub use exec::{run, CapturedOutput, ToolCommand};
pub use labels::{Label, LabelMap};
pub use method::{ExternalMethod, Method, MethodParams, Stopwatch, Task};
pub use metrics::{
    classification_report, classification_report_numeric, regression_report, ClassOrder,
    ConfusionMatrix, MetricsRecord, OneVsRest,
};
pub use sweep::{expand, ParamSet, SweepDirective};
pub use timer::{Dialect, TimerReport};
