//! Diagnostics accumulator threaded through the pipeline.
//!
//! The analysis stages never log globally; recovered problems (a CSS rule
//! that failed to parse, a color that would not normalize) are reported to
//! an explicit sink the caller owns. This keeps the core a pure function of
//! its inputs and makes the recovery paths assertable in tests.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
}

#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Pipeline stage that produced the entry, e.g. "style-rules".
    pub stage: &'static str,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            Severity::Info => "info",
            Severity::Warning => "warn",
        };
        write!(f, "[{}] {}: {}", tag, self.stage, self.message)
    }
}

#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn info(&mut self, stage: &'static str, message: impl Into<String>) {
        self.entries.push(Diagnostic {
            severity: Severity::Info,
            stage,
            message: message.into(),
        });
    }

    pub fn warn(&mut self, stage: &'static str, message: impl Into<String>) {
        self.entries.push(Diagnostic {
            severity: Severity::Warning,
            stage,
            message: message.into(),
        });
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
