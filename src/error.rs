//! Error types for Hoos Who
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Message shown when the Anthropic credential is not configured
pub const MISSING_CREDENTIALS_MESSAGE: &str =
    "API key not configured. Please contact administrator.";

/// Main error type for Hoos Who operations
///
/// Covers configuration loading, directory loading, the upstream model call,
/// and the per-session checks (input validation, rate limiting) that reject an
/// attempt before any upstream call is made.
#[derive(Error, Debug)]
pub enum HoosWhoError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Required credential absent from the environment
    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    /// Question empty or too short after sanitization
    #[error("Invalid input: question must be at least {min_chars} characters after sanitization")]
    InvalidInput {
        /// Minimum accepted length in characters
        min_chars: usize,
    },

    /// Session exceeded its rolling request window
    #[error("Rate limit exceeded: limit={limit}, {message}")]
    RateLimitExceeded {
        /// The configured limit that was exceeded
        limit: usize,
        /// Additional message explaining the failure
        message: String,
    },

    /// Unknown session id
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    /// Another query is already in flight for this session
    #[error("Session busy: {0}")]
    SessionBusy(String),

    /// Student directory loading errors
    #[error("Directory error: {0}")]
    Directory(String),

    /// Provider-related errors (API calls, decoding, empty responses)
    #[error("Provider error: {0}")]
    Provider(String),

    /// Upstream call did not complete in time
    #[error("Provider timed out after {0} seconds")]
    Timeout(u64),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// CSV parsing errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl HoosWhoError {
    /// Message suitable for showing to an end user
    ///
    /// Rejections (invalid input, rate limit, busy session) get their fixed
    /// wording; everything else collapses to a generic message so no
    /// internal detail reaches the user.
    ///
    /// # Examples
    ///
    /// ```
    /// use hooswho::error::HoosWhoError;
    ///
    /// let err = HoosWhoError::InvalidInput { min_chars: 3 };
    /// assert!(err.user_message().contains("at least 3 characters"));
    /// ```
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidInput { min_chars } => format!(
                "Invalid input. Please enter a valid question (at least {} characters).",
                min_chars
            ),
            Self::RateLimitExceeded { limit, .. } => format!(
                "You've reached the hourly query limit ({} queries/hour). Please try again later.",
                limit
            ),
            Self::SessionBusy(_) => {
                "Your previous question is still being answered. Please wait.".to_string()
            }
            Self::SessionNotFound(_) => "Session not found. Please start a new chat.".to_string(),
            Self::MissingCredentials(_) => MISSING_CREDENTIALS_MESSAGE.to_string(),
            _ => "Something went wrong. Please try again later.".to_string(),
        }
    }
}

/// Result type alias for Hoos Who operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let error = HoosWhoError::Config("invalid format".to_string());
        assert_eq!(error.to_string(), "Configuration error: invalid format");
    }

    #[test]
    fn test_provider_error_display() {
        let error = HoosWhoError::Provider("API timeout".to_string());
        assert_eq!(error.to_string(), "Provider error: API timeout");
    }

    #[test]
    fn test_rate_limit_exceeded_display() {
        let error = HoosWhoError::RateLimitExceeded {
            limit: 20,
            message: "20 queries in the last hour".to_string(),
        };
        let s = error.to_string();
        assert!(s.contains("limit=20"));
        assert!(s.contains("last hour"));
    }

    #[test]
    fn test_rate_limit_user_message() {
        let error = HoosWhoError::RateLimitExceeded {
            limit: 20,
            message: String::new(),
        };
        assert_eq!(
            error.user_message(),
            "You've reached the hourly query limit (20 queries/hour). Please try again later."
        );
    }

    #[test]
    fn test_invalid_input_user_message() {
        let error = HoosWhoError::InvalidInput { min_chars: 3 };
        assert_eq!(
            error.user_message(),
            "Invalid input. Please enter a valid question (at least 3 characters)."
        );
    }

    #[test]
    fn test_internal_errors_do_not_leak_detail() {
        let error = HoosWhoError::Provider("401 invalid x-api-key sk-ant-123".to_string());
        assert!(!error.user_message().contains("sk-ant"));
    }

    #[test]
    fn test_missing_credentials_user_message() {
        let error = HoosWhoError::MissingCredentials("ANTHROPIC_API_KEY".to_string());
        assert_eq!(error.user_message(), MISSING_CREDENTIALS_MESSAGE);
    }

    #[test]
    fn test_timeout_display() {
        let error = HoosWhoError::Timeout(60);
        assert_eq!(error.to_string(), "Provider timed out after 60 seconds");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error: HoosWhoError = io_error.into();
        assert!(matches!(error, HoosWhoError::Io(_)));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_error = serde_json::from_str::<serde_json::Value>("{invalid json}").unwrap_err();
        let error: HoosWhoError = json_error.into();
        assert!(matches!(error, HoosWhoError::Serialization(_)));
    }

    #[test]
    fn test_yaml_error_conversion() {
        let yaml_error = serde_yaml::from_str::<serde_yaml::Value>("invalid: : yaml").unwrap_err();
        let error: HoosWhoError = yaml_error.into();
        assert!(matches!(error, HoosWhoError::Yaml(_)));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<HoosWhoError>();
    }
}
