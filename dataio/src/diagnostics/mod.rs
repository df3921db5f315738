//! Non-blocking diagnostics channel.
//!
//! Deprecations, compatibility notes and context mismatches are reported as
//! [`Diagnostic`] values through a [`DiagnosticSink`]. They never interrupt
//! the export pipeline.

mod sink;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use sink::{CollectingDiagnosticSink, DiagnosticSink, LoggingDiagnosticSink, NoOpDiagnosticSink};

/// Category of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Legacy input that still works but will be removed.
    Deprecation,
    /// Two inputs disagree; one was chosen.
    Compatibility,
    /// The requested run context does not match the environment.
    ContextMismatch,
    /// No case metadata could be located.
    MissingCaseMetadata,
    /// Any other user-facing warning.
    UserWarning,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Deprecation => "deprecation",
            Self::Compatibility => "compatibility",
            Self::ContextMismatch => "context_mismatch",
            Self::MissingCaseMetadata => "missing_case_metadata",
            Self::UserWarning => "user_warning",
        };
        write!(f, "{s}")
    }
}

/// A single non-fatal message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Category.
    pub kind: DiagnosticKind,
    /// Human readable message.
    pub message: String,
    /// Release in which deprecated input stops being accepted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub removal_horizon: Option<String>,
}

impl Diagnostic {
    /// Creates a new diagnostic.
    #[must_use]
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            removal_horizon: None,
        }
    }

    /// Deprecation shorthand.
    #[must_use]
    pub fn deprecation(message: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Deprecation, message).with_removal_horizon(DEFAULT_REMOVAL_HORIZON)
    }

    /// Compatibility shorthand.
    #[must_use]
    pub fn compatibility(message: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Compatibility, message)
    }

    /// Context mismatch shorthand.
    #[must_use]
    pub fn context_mismatch(message: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::ContextMismatch, message)
    }

    /// User warning shorthand.
    #[must_use]
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::UserWarning, message)
    }

    /// Sets the removal horizon.
    #[must_use]
    pub fn with_removal_horizon(mut self, horizon: impl Into<String>) -> Self {
        self.removal_horizon = Some(horizon.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.removal_horizon {
            Some(h) => write!(f, "[{}] {} (removal: {h})", self.kind, self.message),
            None => write!(f, "[{}] {}", self.kind, self.message),
        }
    }
}

/// Release horizon quoted in deprecation diagnostics.
pub const DEFAULT_REMOVAL_HORIZON: &str = "next major release";
