//! Result and error types for Ensayo.

use thiserror::Error;

/// Result type for Ensayo operations
pub type EnsayoResult<T> = Result<T, EnsayoError>;

/// Errors that can occur in Ensayo
#[derive(Debug, Error)]
pub enum EnsayoError {
    /// Browser executable not found
    #[error("Browser not found. Install Chromium or set CHROMIUM_PATH")]
    BrowserNotFound,

    /// Browser launch error
    #[error("Failed to launch browser: {message}")]
    BrowserLaunchError {
        /// Error message
        message: String,
    },

    /// Page error
    #[error("Page error: {message}")]
    PageError {
        /// Error message
        message: String,
    },

    /// Navigation error
    #[error("Navigation to {url} failed: {message}")]
    NavigationError {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// Element lookup or interaction error
    #[error("Element '{selector}' failed: {message}")]
    ElementError {
        /// Selector that failed
        selector: String,
        /// Error message
        message: String,
    },

    /// Screenshot error
    #[error("Screenshot failed: {message}")]
    ScreenshotError {
        /// Error message
        message: String,
    },

    /// Assertion failed inside a scenario
    #[error("Assertion failed: {message}")]
    AssertionFailed {
        /// Error message
        message: String,
    },

    /// Required configuration missing
    #[error("Required configuration missing: {name}")]
    MissingConfig {
        /// Name of the missing setting
        name: String,
    },

    /// Report store error
    #[error("Report store error: {message}")]
    ReportError {
        /// Error message
        message: String,
    },

    /// Tracker client error
    #[error("Tracker error: {0}")]
    Tracker(#[from] crate::tracker::TrackerError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl EnsayoError {
    /// Create an assertion failure
    #[must_use]
    pub fn assertion(message: impl Into<String>) -> Self {
        Self::AssertionFailed {
            message: message.into(),
        }
    }

    /// Create an element error
    #[must_use]
    pub fn element(selector: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ElementError {
            selector: selector.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_assertion_error_display() {
        let err = EnsayoError::assertion("title mismatch");
        assert!(err.to_string().contains("Assertion failed"));
        assert!(err.to_string().contains("title mismatch"));
    }

    #[test]
    fn test_element_error_display() {
        let err = EnsayoError::element("#login-button", "not visible");
        assert!(err.to_string().contains("#login-button"));
        assert!(err.to_string().contains("not visible"));
    }

    #[test]
    fn test_missing_config_display() {
        let err = EnsayoError::MissingConfig {
            name: "BASE_URL".to_string(),
        };
        assert!(err.to_string().contains("BASE_URL"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: EnsayoError = io.into();
        assert!(matches!(err, EnsayoError::Io(_)));
    }
}
