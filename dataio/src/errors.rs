//! Error types for metadata derivation and export.
//!
//! Two fatal families surface to callers: [`ConfigurationError`] when the
//! static project configuration lacks a required section, and
//! [`ValidationError`] when user input or the assembled document does not
//! satisfy the metadata contract. Everything non-fatal travels through the
//! diagnostics channel instead.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Convenience result alias used across the crate.
pub type Result<T> = std::result::Result<T, DataioError>;

/// The main error type for dataio operations.
#[derive(Debug, Error)]
pub enum DataioError {
    /// The static project configuration is incomplete.
    #[error("{0}")]
    Configuration(#[from] ConfigurationError),

    /// Input or document validation failed.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// The external encoder failed to write the data file.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML (de)serialization error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DataioError {
    /// Returns true for validation failures.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns true for configuration failures.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}

/// Structured diagnostics attached to an error.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ErrorInfo {
    /// Error code (e.g., "DATAIO-CONTENT-PAYLOAD").
    pub code: String,
    /// Short summary of the error.
    pub summary: String,
    /// Hint for fixing the error.
    pub fix_hint: Option<String>,
    /// Additional context key-value pairs.
    #[serde(default)]
    pub context: HashMap<String, String>,
}

impl ErrorInfo {
    /// Creates a new error info.
    #[must_use]
    pub fn new(code: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            summary: summary.into(),
            fix_hint: None,
            context: HashMap::new(),
        }
    }

    /// Sets the fix hint.
    #[must_use]
    pub fn with_fix_hint(mut self, hint: impl Into<String>) -> Self {
        self.fix_hint = Some(hint.into());
        self
    }

    /// Adds a single context entry.
    #[must_use]
    pub fn with_context_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }
}

/// Error raised when the static project configuration lacks a required section.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct ConfigurationError {
    /// The error message.
    pub message: String,
    /// The configuration section involved, if known.
    pub section: Option<String>,
}

impl ConfigurationError {
    /// Creates a new configuration error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            section: None,
        }
    }

    /// Sets the configuration section.
    #[must_use]
    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.section = Some(section.into());
        self
    }
}

/// Error raised when input or metadata fails validation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct ValidationError {
    /// The error message.
    pub message: String,
    /// The offending field, if known.
    pub field: Option<String>,
    /// Optional structured error info.
    pub error_info: Option<ErrorInfo>,
}

impl ValidationError {
    /// Creates a new validation error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            field: None,
            error_info: None,
        }
    }

    /// Sets the offending field.
    #[must_use]
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Sets the error info.
    #[must_use]
    pub fn with_error_info(mut self, info: ErrorInfo) -> Self {
        self.error_info = Some(info);
        self
    }
}

/// Shorthand for a validation failure on a named field.
pub(crate) fn invalid(field: &str, message: impl Into<String>) -> DataioError {
    DataioError::Validation(ValidationError::new(message).with_field(field))
}
