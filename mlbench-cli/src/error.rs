//! Error handling for the CLI application

use std::fmt;

/// Custom error type for CLI-specific errors
#[derive(Debug)]
pub enum CliError {
    /// Method definition is incomplete or inconsistent
    ConfigError(String),
    /// A command template names a placeholder that cannot be filled
    UnknownPlaceholder(String),
    /// Parameter sets file is not a list of objects
    InvalidParams(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::ConfigError(msg) => write!(f, "Configuration error: {msg}"),
            CliError::UnknownPlaceholder(name) => write!(f, "Unknown placeholder: {{{name}}}"),
            CliError::InvalidParams(msg) => write!(f, "Invalid parameter sets: {msg}"),
        }
    }
}

impl std::error::Error for CliError {}

/// Result type alias for CLI operations
pub type CliResult<T> = Result<T, anyhow::Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let error = CliError::ConfigError("missing command".to_string());
        assert_eq!(error.to_string(), "Configuration error: missing command");
    }

    #[test]
    fn test_unknown_placeholder_display() {
        let error = CliError::UnknownPlaceholder("tool:weka".to_string());
        assert_eq!(error.to_string(), "Unknown placeholder: {tool:weka}");
    }

    #[test]
    fn test_invalid_params_display() {
        let error = CliError::InvalidParams("expected array".to_string());
        assert_eq!(error.to_string(), "Invalid parameter sets: expected array");
    }

    #[test]
    fn test_wraps_into_anyhow() {
        let failure: CliResult<()> = Err(CliError::ConfigError("x".to_string()).into());
        let err = failure.unwrap_err();
        assert!(err.downcast_ref::<CliError>().is_some());
    }
}
