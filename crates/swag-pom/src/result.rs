//! Result and error types for the page-object layer.

use thiserror::Error;

/// Result type for page-object operations
pub type SwagResult<T> = Result<T, SwagError>;

/// Errors that can occur while driving the storefront
#[derive(Debug, Error)]
pub enum SwagError {
    /// A semantic element name has no entry in the screen's selector registry
    #[error("Unknown selector '{name}' on {screen} screen")]
    UnknownSelector {
        /// Screen the registry belongs to
        screen: String,
        /// Semantic element name
        name: String,
    },

    /// A required configuration key is absent or empty
    #[error("Missing configuration: {key} is not set")]
    MissingConfiguration {
        /// Configuration key
        key: String,
    },

    /// A user category tag outside the defined set
    #[error("User category \"{category}\" is not defined")]
    UnsupportedCategory {
        /// The rejected tag
        category: String,
    },

    /// Element did not materialize within the driver's wait timeout
    #[error("Element {selector} not found after {timeout_ms}ms")]
    ElementNotFound {
        /// CSS query of the element
        selector: String,
        /// Timeout in milliseconds
        timeout_ms: u64,
    },

    /// Observed UI state differs from the expected state
    #[error("Assertion failed: {message}")]
    AssertionFailed {
        /// Error message
        message: String,
    },

    /// Navigation error
    #[error("Navigation to {url} failed: {message}")]
    Navigation {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// Browser launch error
    #[error("Failed to launch browser: {message}")]
    BrowserLaunch {
        /// Error message
        message: String,
    },

    /// Error reported by the browser driver
    #[error("Browser error: {message}")]
    Browser {
        /// Error message
        message: String,
    },

    /// Invalid configuration file or value
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SwagError {
    /// Create an assertion failure
    #[must_use]
    pub fn assertion(message: impl Into<String>) -> Self {
        Self::AssertionFailed {
            message: message.into(),
        }
    }

    /// Create a browser error
    #[must_use]
    pub fn browser(message: impl Into<String>) -> Self {
        Self::Browser {
            message: message.into(),
        }
    }

    /// Whether this error is a setup problem rather than a UI failure.
    ///
    /// Setup errors abort before any interaction with the storefront.
    #[must_use]
    pub const fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownSelector { .. }
                | Self::MissingConfiguration { .. }
                | Self::UnsupportedCategory { .. }
                | Self::Config { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_configuration_message_names_key() {
        let err = SwagError::MissingConfiguration {
            key: "VALID_USER_PASSWORD".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Missing configuration: VALID_USER_PASSWORD is not set"
        );
    }

    #[test]
    fn test_configuration_errors_are_classified() {
        assert!(SwagError::UnsupportedCategory {
            category: "admin".into()
        }
        .is_configuration_error());
        assert!(!SwagError::assertion("badge hidden").is_configuration_error());
        assert!(!SwagError::ElementNotFound {
            selector: ".title".into(),
            timeout_ms: 10
        }
        .is_configuration_error());
    }
}
