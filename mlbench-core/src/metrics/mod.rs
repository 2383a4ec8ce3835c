//! Metrics engine
//!
//! Everything here works on a [`ConfusionMatrix`] or on paired true and
//! predicted label vectors, whichever tool produced them. Degenerate
//! inputs score a documented sentinel (0 or 1) instead of failing, so one
//! pathological run does not abort a sweep.

pub mod confusion;
pub mod information;
pub mod record;
pub mod regression;
pub mod report;

pub use confusion::{ClassOrder, ConfusionMatrix, OneVsRest};
pub use information::{
    avg_mean_predictive_information, mean_predictive_information_class,
    mean_predictive_information_from_files,
};
pub use record::{keys, MetricsRecord};
pub use regression::{
    mean_squared_error, mean_squared_error_from_files, simple_mean_squared_error,
};
pub use report::{classification_report, classification_report_numeric, regression_report};
