use core::fmt;

use kestrel_source::Span;
use parking_lot::Mutex;

/// Severity level for a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

/// Identity code for a diagnostic, composed of a namespace and a number.
///
/// Namespace strings use dotted hierarchy (e.g. `"kestrel.semantic"`).
/// Numbers are unique within a namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DiagnosticCode {
    pub namespace: &'static str,
    pub number: u32,
}

impl DiagnosticCode {
    pub const RESERVED_ALIAS: Self = Self {
        namespace: "kestrel.semantic",
        number: 1,
    };
    pub const CONFLICTING_IMPORT: Self = Self {
        namespace: "kestrel.semantic",
        number: 2,
    };
    pub const PLATFORM_MAPPED_IMPORT: Self = Self {
        namespace: "kestrel.semantic",
        number: 3,
    };
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.namespace, self.number)
    }
}

/// A plain-data diagnostic message tied to a source span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: DiagnosticCode,
    pub span: Span,
    pub message: String,
}

impl Diagnostic {
    pub fn error(code: DiagnosticCode, span: Span, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            span,
            message: message.into(),
        }
    }

    pub fn warning(code: DiagnosticCode, span: Span, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            span,
            message: message.into(),
        }
    }
}

/// Fire-and-forget sink for diagnostics produced during resolution.
///
/// Reporting never influences resolution results; implementations must not
/// call back into the engine.
pub trait DiagnosticSink: Send + Sync {
    fn report(&self, diag: Diagnostic);
}

/// Thread-safe accumulating sink.
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    diags: Mutex<Vec<Diagnostic>>,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain all collected diagnostics, leaving the collector empty.
    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.diags.lock())
    }

    /// Snapshot of collected diagnostics without draining.
    pub fn snapshot(&self) -> Vec<Diagnostic> {
        self.diags.lock().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.diags.lock().is_empty()
    }
}

impl DiagnosticSink for DiagnosticCollector {
    fn report(&self, diag: Diagnostic) {
        self.diags.lock().push(diag);
    }
}
