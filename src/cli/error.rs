//! Error types for CLI commands

use std::path::PathBuf;
use thiserror::Error;

use crate::chart::ChartError;
use crate::import::ScriptError;

/// Errors that can occur while running a CLI command
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command-line argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Failed to read an input file
    #[error("Failed to read {0}: {1}")]
    FileReadError(PathBuf, String),

    /// Chart reconstruction or serialization failed
    #[error("Chart error: {0}")]
    Chart(#[from] ChartError),

    /// Builder-script evaluation failed
    #[error("Script error: {0}")]
    Script(#[from] ScriptError),
}
