//! CLI command implementations

use anyhow::Result;
use clap::Subcommand;

pub mod resolve;
pub mod run;
pub mod score;
pub mod sweep;
pub mod timers;

/// Available CLI commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Score a prediction file against true labels
    Score(score::ScoreArgs),

    /// Extract timer phases from captured tool output
    Timers(timers::TimersArgs),

    /// Resolve dataset files into formats a tool accepts
    Resolve(resolve::ResolveArgs),

    /// Expand sweep directives in a list of parameter sets
    Sweep(sweep::SweepArgs),

    /// Run a method definition end to end
    Run(run::RunArgs),
}

impl Commands {
    /// Execute the selected command
    pub fn execute(&self) -> Result<()> {
        match self {
            Commands::Score(args) => args.execute(),
            Commands::Timers(args) => args.execute(),
            Commands::Resolve(args) => args.execute(),
            Commands::Sweep(args) => args.execute(),
            Commands::Run(args) => args.execute(),
        }
    }
}
