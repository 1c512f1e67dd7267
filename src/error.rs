// src/error.rs

//! Unified error handling for the monitor.

use std::fmt;

use thiserror::Error;

/// Result type alias for monitor operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Source document could not be retrieved
    #[error("Fetch failed for {url}: {message}")]
    Fetch { url: String, message: String },

    /// Table start or end marker missing from the document
    #[error("Table boundary not found: missing {marker:?}")]
    TableNotFound { marker: String },

    /// Notification could not be built or delivered
    #[error("Notification error: {0}")]
    Notify(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    /// Create a fetch error for the given URL.
    pub fn fetch(url: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Fetch {
            url: url.into(),
            message: message.to_string(),
        }
    }

    /// Create a table-boundary error naming the missing marker.
    pub fn table_not_found(marker: impl Into<String>) -> Self {
        Self::TableNotFound {
            marker: marker.into(),
        }
    }

    /// Create a notification error.
    pub fn notify(message: impl fmt::Display) -> Self {
        Self::Notify(message.to_string())
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Whether this error stops a run before any side effect.
    pub fn is_fatal_to_run(&self) -> bool {
        matches!(self, Self::Fetch { .. } | Self::Http(_) | Self::TableNotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_not_found_message() {
        let err = AppError::table_not_found("TABLE_END");
        assert_eq!(
            err.to_string(),
            "Table boundary not found: missing \"TABLE_END\""
        );
        assert!(err.is_fatal_to_run());
    }

    #[test]
    fn test_notify_is_not_fatal() {
        assert!(!AppError::notify("smtp down").is_fatal_to_run());
        assert!(!AppError::config("bad").is_fatal_to_run());
    }
}
