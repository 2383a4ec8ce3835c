//! Resolve command implementation

use anyhow::Result;
use clap::Args;
use mlbench_core::resolve;
use std::path::PathBuf;

/// Arguments for the resolve command
#[derive(Debug, Args)]
pub struct ResolveArgs {
    /// Dataset files to resolve
    #[arg(short, long, value_name = "FILE", required = true, num_args = 1..)]
    pub dataset: Vec<PathBuf>,

    /// Accepted extensions, in order of preference
    #[arg(short, long, value_name = "EXT", value_delimiter = ',', default_value = "arff")]
    pub accept: Vec<String>,
}

impl ResolveArgs {
    /// Execute the resolve command; prints one resolved path per line
    pub fn execute(&self) -> Result<()> {
        let accepted: Vec<&str> = self.accept.iter().map(String::as_str).collect();
        let resolved = resolve(&self.dataset, &accepted)?;
        for path in resolved {
            println!("{}", path.display());
        }
        Ok(())
    }
}
