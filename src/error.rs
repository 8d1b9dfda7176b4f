// src/error.rs

//! Unified error handling for the harvester and the snapshot stores.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use thiserror::Error;

/// Result type alias for catalog operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP transport failed before a response arrived
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

    /// The catalog answered with a non-2xx status
    #[error("HTTP {status} for {url}: {body}")]
    HttpStatus {
        url: String,
        status: u16,
        body: String,
    },

    /// The catalog body did not match the expected shape
    #[error("JSON decode failed for {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// A scoped deadline expired before the unit finished
    #[error("{scope} timed out after {limit:?}")]
    Timeout { scope: String, limit: Duration },

    /// Snapshot file could not be read or written
    #[error("Snapshot error at {path}: {message}")]
    Persistence { path: String, message: String },

    /// Lookup matched nothing
    #[error("Not found: {0}")]
    NotFound(String),

    /// Term code could not be parsed
    #[error("Invalid term '{0}', expected YYYY-season (e.g. 2025-spring)")]
    InvalidTerm(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    /// Create a not-found error.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    /// Create a timeout error for a named scope.
    pub fn timeout(scope: impl Into<String>, limit: Duration) -> Self {
        Self::Timeout {
            scope: scope.into(),
            limit,
        }
    }

    /// Create a snapshot persistence error.
    pub fn persistence(path: impl AsRef<Path>, message: impl fmt::Display) -> Self {
        Self::Persistence {
            path: path.as_ref().display().to_string(),
            message: message.to_string(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Single-request failures that only cost the unit they belong to.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Http(_) | Self::HttpStatus { .. } | Self::Decode { .. } | Self::Timeout { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classifiers() {
        assert!(AppError::not_found("CMPT 999").is_not_found());
        assert!(AppError::timeout("course CMPT 225", Duration::from_secs(120)).is_transient());
        assert!(
            AppError::HttpStatus {
                url: "http://x".into(),
                status: 500,
                body: String::new(),
            }
            .is_transient()
        );
        assert!(!AppError::config("bad").is_transient());
    }

    #[test]
    fn test_timeout_message_names_scope() {
        let err = AppError::timeout("department cmpt", Duration::from_secs(300));
        assert_eq!(err.to_string(), "department cmpt timed out after 300s");
    }
}
