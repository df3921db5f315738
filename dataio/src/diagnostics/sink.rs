//! Diagnostic sink trait and implementations.

use parking_lot::RwLock;
use tracing::{debug, warn, Level};

use super::{Diagnostic, DiagnosticKind};

/// Receiver of non-fatal diagnostics.
///
/// Emitting must never fail or panic.
pub trait DiagnosticSink: Send + Sync {
    /// Records one diagnostic.
    fn emit(&self, diagnostic: Diagnostic);
}

/// A sink that discards all diagnostics.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpDiagnosticSink;

impl DiagnosticSink for NoOpDiagnosticSink {
    fn emit(&self, _diagnostic: Diagnostic) {}
}

/// A sink that forwards diagnostics to the tracing framework.
#[derive(Debug, Clone)]
pub struct LoggingDiagnosticSink {
    level: Level,
}

impl Default for LoggingDiagnosticSink {
    fn default() -> Self {
        Self { level: Level::WARN }
    }
}

impl LoggingDiagnosticSink {
    /// Creates a new logging sink with the specified level.
    #[must_use]
    pub const fn new(level: Level) -> Self {
        Self { level }
    }

    /// Creates a debug-level logging sink.
    #[must_use]
    pub const fn debug() -> Self {
        Self::new(Level::DEBUG)
    }
}

impl DiagnosticSink for LoggingDiagnosticSink {
    fn emit(&self, diagnostic: Diagnostic) {
        if self.level == Level::DEBUG {
            debug!(
                kind = %diagnostic.kind,
                removal = ?diagnostic.removal_horizon,
                "{}", diagnostic.message
            );
        } else {
            warn!(
                kind = %diagnostic.kind,
                removal = ?diagnostic.removal_horizon,
                "{}", diagnostic.message
            );
        }
    }
}

/// A collecting sink for tests and for callers that surface warnings themselves.
#[derive(Debug, Default)]
pub struct CollectingDiagnosticSink {
    diagnostics: RwLock<Vec<Diagnostic>>,
}

impl CollectingDiagnosticSink {
    /// Creates a new collecting sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all collected diagnostics.
    #[must_use]
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.read().clone()
    }

    /// Returns the number of collected diagnostics.
    #[must_use]
    pub fn len(&self) -> usize {
        self.diagnostics.read().len()
    }

    /// Returns true if nothing has been collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.diagnostics.read().is_empty()
    }

    /// Clears all collected diagnostics.
    pub fn clear(&self) {
        self.diagnostics.write().clear();
    }

    /// Returns diagnostics of one kind.
    #[must_use]
    pub fn of_kind(&self, kind: DiagnosticKind) -> Vec<Diagnostic> {
        self.diagnostics
            .read()
            .iter()
            .filter(|d| d.kind == kind)
            .cloned()
            .collect()
    }

    /// Returns true if any diagnostic message contains `needle`.
    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        self.diagnostics.read().iter().any(|d| d.message.contains(needle))
    }
}

impl DiagnosticSink for CollectingDiagnosticSink {
    fn emit(&self, diagnostic: Diagnostic) {
        self.diagnostics.write().push(diagnostic);
    }
}
