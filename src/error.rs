// src/error.rs

//! Unified error handling for the portal application.

use std::fmt;

use thiserror::Error;

/// Result type alias for portal operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP client failure (build, connect)
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

    /// Fetching a remote IIIF resource failed (status, timeout, transport)
    #[error("Fetch error for {uri}: {message}")]
    Fetch { uri: String, message: String },

    /// Remote document was not valid JSON
    #[error("Parse error for {uri}: {message}")]
    Parse { uri: String, message: String },

    /// Manifest could not be normalized into a record
    #[error("Normalization error for {uri}: {message}")]
    Normalization { uri: String, message: String },

    /// Record set was unusable for index building
    #[error("Index build error: {0}")]
    IndexBuild(String),

    /// Malformed query parameter
    #[error("Query error: {0}")]
    Query(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    /// Create a fetch error with the offending URI.
    pub fn fetch(uri: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Fetch {
            uri: uri.into(),
            message: message.to_string(),
        }
    }

    /// Create a parse error with the offending URI.
    pub fn parse(uri: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Parse {
            uri: uri.into(),
            message: message.to_string(),
        }
    }

    /// Create a normalization error with the offending URI.
    pub fn normalization(uri: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Normalization {
            uri: uri.into(),
            message: message.to_string(),
        }
    }

    /// Create an index build error.
    pub fn index_build(message: impl Into<String>) -> Self {
        Self::IndexBuild(message.into())
    }

    /// Create a query error.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query(message.into())
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}
