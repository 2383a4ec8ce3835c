//! Sweep command implementation

use crate::error::CliError;
use crate::output::open_writer;
use anyhow::{Context, Result};
use clap::Args;
use mlbench_core::{expand, ParamSet};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Arguments for the sweep command
#[derive(Debug, Args)]
pub struct SweepArgs {
    /// JSON array of parameter objects
    #[arg(short, long, value_name = "FILE")]
    pub params: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

impl SweepArgs {
    /// Execute the sweep command; prints the expanded sets as pretty JSON
    pub fn execute(&self) -> Result<()> {
        let sets = read_param_sets(&self.params)?;
        let expanded = expand(&sets);
        log::info!(
            "Expanded {} parameter set(s) into {}",
            sets.len(),
            expanded.len()
        );

        let mut writer = open_writer(self.output.as_deref())?;
        serde_json::to_writer_pretty(&mut writer, &expanded)?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }
}

/// Read a JSON array of parameter objects
pub fn read_param_sets(path: &Path) -> Result<Vec<ParamSet>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read parameter sets: {}", path.display()))?;
    serde_json::from_str(&content)
        .map_err(|e| CliError::InvalidParams(format!("{}: {e}", path.display())).into())
}
