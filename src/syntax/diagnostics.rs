//! Collected parse errors.
//!
//! Recording an error never aborts parsing; the sink just remembers that one
//! happened so the front end can withhold the story.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use super::{Position, Span};

/// One recorded error with its location in the source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub message: String,
    pub span: Span,
    pub position: Position,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "line {}, column {}: {}",
            self.position.line, self.position.column, self.message
        )
    }
}

#[derive(Debug, Default)]
pub struct DiagnosticSink {
    entries: Vec<Diagnostic>,
    had_error: bool,
}

impl DiagnosticSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an error.
    ///
    /// Backtracking can walk over the same bad input more than once; an entry
    /// identical to one already recorded is dropped.
    pub fn error(&mut self, message: impl Into<String>, span: Span, position: Position) {
        let diagnostic = Diagnostic {
            message: message.into(),
            span,
            position,
        };
        self.had_error = true;
        if self.entries.contains(&diagnostic) {
            return;
        }
        debug!(
            line = position.line,
            column = position.column,
            message = %diagnostic.message,
            "recorded parse error"
        );
        self.entries.push(diagnostic);
    }

    pub fn had_error(&self) -> bool {
        self.had_error
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops entries recorded after the first `len`. The error flag stays set.
    pub fn truncate(&mut self, len: usize) {
        self.entries.truncate(len);
    }

    pub fn into_entries(self) -> Vec<Diagnostic> {
        self.entries
    }
}
