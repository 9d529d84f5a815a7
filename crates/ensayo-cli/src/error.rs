//! Error types for the CLI

use thiserror::Error;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Errors that can occur in the CLI
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// Test execution error
    #[error("Test execution failed: {message}")]
    TestExecution {
        /// Error message
        message: String,
    },

    /// IO error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Ensayo library error
    #[error("Ensayo error: {0}")]
    Ensayo(#[from] ensayo::EnsayoError),
}

impl CliError {
    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a test execution error
    #[must_use]
    pub fn test_execution(message: impl Into<String>) -> Self {
        Self::TestExecution {
            message: message.into(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error() {
        let err = CliError::config("firefox is not supported");
        assert!(err.to_string().contains("Configuration"));
        assert!(err.to_string().contains("firefox"));
    }

    #[test]
    fn test_test_execution_error() {
        let err = CliError::test_execution("2 test(s) failed");
        assert!(err.to_string().contains("Test execution"));
    }

    #[test]
    fn test_library_error_conversion() {
        let err: CliError = ensayo::EnsayoError::MissingConfig {
            name: "BASE_URL".to_string(),
        }
        .into();
        assert!(err.to_string().contains("BASE_URL"));
    }
}
