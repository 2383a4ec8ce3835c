//! Timers command implementation

use crate::output::{formatter_for, open_writer, write_entries, OutputFormat};
use anyhow::{Context, Result};
use clap::Args;
use mlbench_core::TimerReport;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

/// Arguments for the timers command
#[derive(Debug, Args)]
pub struct TimersArgs {
    /// Captured tool output (default: stdin)
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

impl TimersArgs {
    /// Execute the timers command
    pub fn execute(&self) -> Result<()> {
        let bytes = match &self.input {
            Some(path) => fs::read(path)
                .with_context(|| format!("Failed to read tool output: {}", path.display()))?,
            None => {
                let mut buffer = Vec::new();
                io::stdin()
                    .read_to_end(&mut buffer)
                    .context("Failed to read tool output from stdin")?;
                buffer
            }
        };

        let report = TimerReport::parse(&bytes);
        log::info!(
            "Found {} timer(s) in {:?} output",
            report.timers.len(),
            report.dialect
        );
        if report.skipped_lines > 0 {
            log::debug!("Skipped {} unparseable line(s)", report.skipped_lines);
        }

        let writer = open_writer(self.output.as_deref())?;
        let mut formatter = formatter_for(self.format, writer);
        write_entries(formatter.as_mut(), &report.timers)
    }
}
