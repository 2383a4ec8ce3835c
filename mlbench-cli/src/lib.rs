//! mlbench CLI library
//!
//! This library provides the command-line interface for the mlbench
//! benchmarking harness.

pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use error::{CliError, CliResult};
