//! Syntax module for skein
//!
//! A backtracking recursive-descent parser. Rules are methods on [`Parser`]
//! returning `Option<T>`, where `None` is the ordinary "no match" signal and
//! never an error. Errors go to the parser's diagnostics sink and do not stop
//! the parse; a [`Story`] is produced only when no error was recorded.
//!
//! Layout, leaves first:
//! - [`cursor`]: read position and the begin/succeed/fail rule stack
//! - [`charset`], [`scanner`]: primitive scanners
//! - [`combinators`]: `one_of`, `optional`, `interleave`, `expect`, `line`
//! - [`grammar`], [`content`], [`logic`], [`weave`], [`expression`]: the story grammar
//! - [`diagnostics`]: the error sink

use serde::{Deserialize, Serialize};

use crate::ast::Story;
use crate::errors::{Result, SkeinError, SyntaxError};

pub mod charset;
pub mod combinators;
pub mod content;
pub mod cursor;
pub mod diagnostics;
pub mod expression;
pub mod grammar;
pub mod logic;
pub mod parser;
pub mod scanner;
pub mod weave;

pub use charset::CharSet;
pub use combinators::{ParseRule, Recovery};
pub use cursor::{Cursor, RuleId};
pub use diagnostics::{Diagnostic, DiagnosticSink};
pub use grammar::StatementLevel;
pub use parser::{ParseOutcome, Parser, ParserOptions, DEFAULT_MAX_NESTING_DEPTH};

/// Represents a span in the source code, as byte offsets.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Span> for miette::SourceSpan {
    fn from(span: Span) -> Self {
        (span.start, span.len()).into()
    }
}

/// Human-facing location: 1-based line and column (in characters).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    /// Derives the line and column of a byte offset in `source`.
    ///
    /// `\n`, `\r\n` and a lone `\r` each end a line.
    pub fn locate(source: &str, offset: usize) -> Self {
        let offset = offset.min(source.len());
        let before = source.get(..offset).unwrap_or(source);
        let mut line = 1;
        let mut line_start = 0;
        for (i, c) in before.char_indices() {
            let ends_line = match c {
                '\n' => true,
                '\r' => source.as_bytes().get(i + 1) != Some(&b'\n'),
                _ => false,
            };
            if ends_line {
                line += 1;
                line_start = i + 1;
            }
        }
        Self {
            line,
            column: before[line_start..].chars().count() + 1,
        }
    }
}

/// Parses a whole story with default options.
pub fn parse(source: &str) -> ParseOutcome {
    Parser::new(source).parse_story()
}

pub fn parse_with_options(source: &str, options: ParserOptions) -> ParseOutcome {
    Parser::with_options(source, options).parse_story()
}

impl Story {
    /// Parses `source`, turning any recorded diagnostics into a
    /// [`SkeinError::Parse`] report that carries the source text.
    pub fn parse(name: impl Into<String>, source: &str) -> Result<Story> {
        parse(source).into_result(name, source)
    }
}

impl ParseOutcome {
    pub fn into_result(self, name: impl Into<String>, source: &str) -> Result<Story> {
        match self.story {
            Some(story) => Ok(story),
            None => {
                let name = name.into();
                Err(SkeinError::Parse {
                    source_code: miette::NamedSource::new(name.clone(), source.to_string()),
                    name,
                    errors: self.diagnostics.iter().map(SyntaxError::from).collect(),
                })
            }
        }
    }
}
