//! Per-call warning sink
//!
//! Conversions never fail on recoverable anomalies. They record a
//! [`Diagnostic`] here and emit the same message through `tracing`, so
//! library callers can inspect warnings and binaries can simply log them.

use serde::Serialize;
use std::fmt;

/// What kind of anomaly was met
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// No codec is registered for a block type; the generic one was used
    UnknownBlockType,
    /// A layout lists an id that has no block
    MissingBlock,
    /// Markup looked like a known widget but was missing a part
    MalformedMarkup,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DiagnosticKind::UnknownBlockType => "unknown block type",
            DiagnosticKind::MissingBlock => "missing block",
            DiagnosticKind::MalformedMarkup => "malformed markup",
        };
        f.write_str(name)
    }
}

/// A single recorded warning
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
}

/// Collected warnings of one conversion call
#[derive(Debug, Default, Clone, Serialize)]
#[serde(transparent)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a warning and log it.
    pub fn warn(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(kind = %kind, "{message}");
        self.entries.push(Diagnostic { kind, message });
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether any warning of `kind` was recorded.
    pub fn has(&self, kind: DiagnosticKind) -> bool {
        self.entries.iter().any(|d| d.kind == kind)
    }
}
