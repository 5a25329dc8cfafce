//! Skein error handling
//!
//! Parse problems are collected as [`crate::syntax::Diagnostic`] values while
//! parsing. This module turns them into `miette` reports at the library
//! boundary, alongside the I/O and serialization failures of the front end.

use miette::{Diagnostic, NamedSource, SourceSpan};
use std::path::PathBuf;
use thiserror::Error;

use crate::syntax::Diagnostic as ParseDiagnostic;

pub type Result<T> = std::result::Result<T, SkeinError>;

#[derive(Debug, Error, Diagnostic)]
pub enum SkeinError {
    #[error("could not read '{}'", .path.display())]
    #[diagnostic(code(skein::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{name}: found {} syntax error(s)", .errors.len())]
    #[diagnostic(
        code(skein::parse),
        help("no story is produced until every reported line is fixed")
    )]
    Parse {
        name: String,
        #[source_code]
        source_code: NamedSource<String>,
        #[related]
        errors: Vec<SyntaxError>,
    },

    #[error("could not serialize the story")]
    #[diagnostic(code(skein::serialize))]
    Serialize(#[from] serde_json::Error),
}

/// One syntax error, labelled in the parent report's source.
#[derive(Debug, Clone, Error, Diagnostic)]
#[error("line {line}, column {column}: {message}")]
#[diagnostic(code(skein::parse::syntax))]
pub struct SyntaxError {
    pub message: String,
    pub line: usize,
    pub column: usize,
    #[label("here")]
    pub span: SourceSpan,
}

impl From<&ParseDiagnostic> for SyntaxError {
    fn from(diagnostic: &ParseDiagnostic) -> Self {
        Self {
            message: diagnostic.message.clone(),
            line: diagnostic.position.line,
            column: diagnostic.position.column,
            span: diagnostic.span.into(),
        }
    }
}

impl SkeinError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Syntax errors carried by a [`SkeinError::Parse`]; empty otherwise.
    pub fn syntax_errors(&self) -> &[SyntaxError] {
        match self {
            Self::Parse { errors, .. } => errors,
            _ => &[],
        }
    }
}
