//! Run parameters shared by every adapter
//!
//! Centralizes the timeout budget and tool install locations so adapters
//! do not each invent their own defaults.

use crate::error::{HarnessError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default wall-clock budget for one external run, in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 9000;

/// Environment variable overriding [`DEFAULT_TIMEOUT_SECS`]
pub const TIMEOUT_ENV_VAR: &str = "MLBENCH_TIMEOUT_SECS";

/// Get the run timeout from the environment or use the default
pub fn get_timeout_secs() -> u64 {
    env::var(TIMEOUT_ENV_VAR)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(DEFAULT_TIMEOUT_SECS)
}

/// Run parameters handed to an adapter next to its method parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Wall-clock budget for the external process
    #[serde(with = "duration_secs", default = "default_timeout")]
    pub timeout: Duration,

    /// Install location per tool name (e.g. `weka` -> `/opt/weka`)
    #[serde(default)]
    pub tool_paths: BTreeMap<String, PathBuf>,

    /// Directory the external process runs in (default: inherited)
    #[serde(default)]
    pub working_dir: Option<PathBuf>,
}

fn default_timeout() -> Duration {
    Duration::from_secs(get_timeout_secs())
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            tool_paths: BTreeMap::new(),
            working_dir: None,
        }
    }
}

impl RunConfig {
    /// Create a configuration with an explicit timeout
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            ..Self::default()
        }
    }

    /// Register the install path of a tool
    pub fn tool(mut self, name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.tool_paths.insert(name.into(), path.into());
        self
    }

    /// Install path of a tool; a missing entry is a configuration error
    pub fn tool_path(&self, name: &str) -> Result<&Path> {
        self.tool_paths
            .get(name)
            .map(PathBuf::as_path)
            .ok_or_else(|| HarnessError::Config(format!("no install path configured for '{name}'")))
    }
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}
