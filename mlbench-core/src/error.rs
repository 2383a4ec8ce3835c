//! Error types shared by every harness component

use std::io;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errors raised to the adapter boundary.
///
/// None of these are retried inside the harness; each one ends the
/// metrics computation of a single benchmark run.
#[derive(Error, Debug)]
pub enum HarnessError {
    /// A referenced dataset file does not exist
    #[error("dataset file '{}' not found", .path.display())]
    DatasetNotFound {
        /// The missing path
        path: PathBuf,
    },

    /// No known lossless path from the source format to an accepted one
    #[error(
        "no conversion possible from '{}' to any of [{}]",
        .path.display(),
        .accepted.join(", ")
    )]
    ConversionUnsupported {
        /// The dataset that could not be converted
        path: PathBuf,
        /// Formats the caller declared acceptable
        accepted: Vec<String>,
    },

    /// The external process exceeded its wall-clock budget
    #[error("method timeout after {}s", .budget.as_secs_f64())]
    MethodTimeout {
        /// The budget that was exceeded
        budget: Duration,
    },

    /// Non-zero exit status or launch failure
    #[error("{}", render_failure(.reason, .output))]
    ExecutionFailed {
        /// What went wrong
        reason: String,
        /// Interleaved stdout/stderr captured before the failure
        output: String,
    },

    /// Binary encoding requested for a vector without exactly two classes
    #[error("expected exactly 2 distinct labels for binary encoding, found {distinct}")]
    NotBinaryLabels {
        /// Number of distinct values observed
        distinct: usize,
    },

    /// A value to decode has no entry in the label map
    #[error("encoded value {value} has no original label")]
    UnknownEncodedValue {
        /// The offending value, as printed
        value: String,
    },

    /// I/O failure on a specific file
    #[error("I/O error for path '{}': {source}", .path.display())]
    Io {
        /// The file being accessed
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// A delimited numeric file could not be parsed
    #[error("invalid data in '{}' at line {line}: {reason}", .path.display())]
    InvalidFormat {
        /// The file being parsed
        path: PathBuf,
        /// 1-based line number
        line: usize,
        /// What was wrong with the line
        reason: String,
    },

    /// Paired vectors differ in length
    #[error("length mismatch: expected {expected} values, found {found}")]
    LengthMismatch {
        /// Length of the reference vector
        expected: usize,
        /// Length of the other vector
        found: usize,
    },

    /// Structurally invalid input
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Missing or malformed run configuration
    #[error("configuration error: {0}")]
    Config(String),
}

fn render_failure(reason: &str, output: &str) -> String {
    if output.is_empty() {
        reason.to_string()
    } else {
        format!("{reason} -- {output}")
    }
}

impl HarnessError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for harness operations
pub type Result<T> = std::result::Result<T, HarnessError>;
