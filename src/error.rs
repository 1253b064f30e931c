//! Error types for pagekit
//!
//! This module defines the error hierarchy for the entire crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use std::fmt;
use thiserror::Error;

/// Boxed error type carried by data source failures
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A single violated field in a set of pagination options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    /// Name of the offending field (e.g. "limit")
    pub field: String,
    /// Why the value was rejected
    pub message: String,
}

impl FieldViolation {
    /// Create a new field violation
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "at '{}': {}", self.field, self.message)
    }
}

/// The main error type for pagekit
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Validation Errors
    // ============================================================================
    #[error("Validation failed: {}", join_violations(.violations))]
    Validation { violations: Vec<FieldViolation> },

    // ============================================================================
    // Data Source Errors
    // ============================================================================
    #[error("Data source error: {message}")]
    DataSource {
        message: String,
        #[source]
        source: BoxError,
    },

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

fn join_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl Error {
    /// Create a validation error from a list of violations
    pub fn validation(violations: Vec<FieldViolation>) -> Self {
        Self::Validation { violations }
    }

    /// Wrap a failure raised by a data source, keeping it as the error source
    pub fn data_source(source: impl Into<BoxError>) -> Self {
        let source = source.into();
        Self::DataSource {
            message: source.to_string(),
            source,
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Check if this is a data source error
    pub fn is_data_source(&self) -> bool {
        matches!(self, Self::DataSource { .. })
    }

    /// Violated fields, empty for every other kind of error
    pub fn violations(&self) -> &[FieldViolation] {
        match self {
            Self::Validation { violations } => violations,
            _ => &[],
        }
    }
}

/// Result type alias for pagekit
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}
