//! Parser state and the whole-story entry point.

use tracing::debug;

use super::{Cursor, Diagnostic, DiagnosticSink, Position, Span};
use crate::ast::Story;

/// How deep inline logic and expressions may nest before parsing gives up
/// on them.
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserOptions {
    pub max_nesting_depth: usize,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
        }
    }
}

impl ParserOptions {
    pub fn with_max_nesting_depth(mut self, depth: usize) -> Self {
        self.max_nesting_depth = depth;
        self
    }
}

/// Single-use parser over one source text.
#[derive(Debug)]
pub struct Parser<'src> {
    pub(super) source: &'src str,
    pub(super) cursor: Cursor,
    pub(super) snapshots: Vec<Cursor>,
    pub(super) diagnostics: DiagnosticSink,
    options: ParserOptions,
    nesting_depth: usize,
}

/// Result of parsing a story: the tree (only when error-free) and every
/// recorded diagnostic.
#[derive(Debug)]
pub struct ParseOutcome {
    pub story: Option<Story>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ParseOutcome {
    pub fn had_error(&self) -> bool {
        self.story.is_none()
    }
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str) -> Self {
        Self::with_options(source, ParserOptions::default())
    }

    pub fn with_options(source: &'src str, options: ParserOptions) -> Self {
        Self {
            source,
            cursor: Cursor::default(),
            snapshots: Vec::new(),
            diagnostics: DiagnosticSink::new(),
            options,
            nesting_depth: 0,
        }
    }

    pub fn source(&self) -> &'src str {
        self.source
    }

    pub fn options(&self) -> ParserOptions {
        self.options
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.diagnostics.entries()
    }

    pub fn had_error(&self) -> bool {
        self.diagnostics.had_error()
    }

    /// Records an error covering the rest of the current line.
    pub fn error(&mut self, message: impl Into<String>) {
        let start = self.cursor.offset();
        let span = Span::new(start, start + self.line_remainder().len());
        self.error_at(message, span);
    }

    pub fn error_at(&mut self, message: impl Into<String>, span: Span) {
        let position = Position::locate(self.source, span.start);
        self.diagnostics.error(message, span, position);
    }

    /// Runs `rule` one nesting level deeper. Past the configured maximum the
    /// rule is not run; an error is recorded and the call is a no-match.
    pub fn nested<T>(&mut self, rule: impl FnOnce(&mut Self) -> Option<T>) -> Option<T> {
        let max = self.options.max_nesting_depth;
        if self.nesting_depth >= max {
            self.error(format!(
                "Logic nesting is too deep (maximum {max} levels)"
            ));
            return None;
        }
        self.nesting_depth += 1;
        let result = rule(self);
        self.nesting_depth -= 1;
        result
    }

    /// Parses the whole input as a story.
    pub fn parse_story(mut self) -> ParseOutcome {
        debug!(bytes = self.source.len(), "parsing story");
        let content = self.top_level();
        debug_assert_eq!(self.rule_depth(), 0, "unbalanced rule stack");
        let had_error = self.diagnostics.had_error();
        let diagnostics = self.diagnostics.into_entries();
        debug!(
            nodes = content.len(),
            errors = diagnostics.len(),
            "finished parsing story"
        );
        ParseOutcome {
            story: (!had_error).then(|| Story::new(content)),
            diagnostics,
        }
    }
}
