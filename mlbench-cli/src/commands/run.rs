//! Run command implementation

use crate::config::MethodDefinition;
use crate::output::{formatter_for, open_writer, write_entries, OutputFormat};
use anyhow::Result;
use clap::Args;
use mlbench_core::Method;
use std::path::PathBuf;
use std::time::Duration;

/// Arguments for the run command
#[derive(Debug, Args)]
pub struct RunArgs {
    /// Method definition (TOML)
    #[arg(short, long, value_name = "FILE")]
    pub config: PathBuf,

    /// Override the timeout in seconds
    #[arg(short, long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

impl RunArgs {
    /// Execute the run command
    pub fn execute(&self) -> Result<()> {
        let mut definition = MethodDefinition::load(&self.config)?;
        if let Some(secs) = self.timeout {
            definition.run.timeout = Duration::from_secs(secs);
        }

        let mut method = definition.build()?;
        log::info!("Running {method}");
        let record = method.metric()?;

        let writer = open_writer(self.output.as_deref())?;
        let mut formatter = formatter_for(self.format, writer);
        write_entries(formatter.as_mut(), &record)
    }
}
