//! Diagnostic presentation for the CLI.
//!
//! [`DiagnosticReport`] pairs a parse diagnostic with its source so it can be
//! printed with a location header and a snippet pointing at the problem.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::Path;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};
use unicode_width::UnicodeWidthStr;

use crate::syntax::{Diagnostic, Position};

// === Constants ===

/// Number of lines of context to show before and after the error in code snippets.
const SNIPPET_CONTEXT_LINES: usize = 1;

// === Core Types ===

pub struct DiagnosticReport<'a> {
    diagnostic: &'a Diagnostic,
    source: Option<&'a str>,
    name: Option<String>,
}

impl<'a> DiagnosticReport<'a> {
    pub fn new(diagnostic: &'a Diagnostic, source: Option<&'a str>) -> Self {
        Self {
            diagnostic,
            source,
            name: None,
        }
    }

    /// Names the file in the location header.
    pub fn with_name(mut self, name: impl AsRef<Path>) -> Self {
        self.name = Some(name.as_ref().display().to_string());
        self
    }

    fn location(&self) -> String {
        let Position { line, column } = self.diagnostic.position;
        match &self.name {
            Some(name) => format!(" [{name}, line {line}, col {column}]"),
            None => format!(" [at line {line}, col {column}]"),
        }
    }

    fn snippet(&self) -> Option<String> {
        generate_code_snippet(self.source?, self.diagnostic)
    }
}

impl Display for DiagnosticReport<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        writeln!(f, "Error{}:", self.location())?;
        writeln!(f, "{}", self.diagnostic.message)?;
        if let Some(snippet) = self.snippet() {
            write!(f, "\n{snippet}")?;
        }
        Ok(())
    }
}

// === Formatting Helpers ===

/// Source lines around the error, with a pointer under the reported span.
///
/// Spans reaching past the end of their first line are pointed at up to that
/// line's end.
pub fn generate_code_snippet(source: &str, diagnostic: &Diagnostic) -> Option<String> {
    let lines: Vec<&str> = source.lines().flat_map(|line| line.split('\r')).collect();
    let Position { line, .. } = diagnostic.position;
    let error_line = *lines.get(line.checked_sub(1)?).unwrap_or(&"");

    let display_start = line.saturating_sub(SNIPPET_CONTEXT_LINES).max(1);
    let display_end = (line + SNIPPET_CONTEXT_LINES).min(lines.len()).max(line);
    let width = display_end.to_string().len();

    let mut result = String::new();
    for line_num in display_start..=display_end {
        let text = lines.get(line_num - 1).copied().unwrap_or("");
        result.push_str(&format!("{line_num:>width$} | {text}\n"));
        if line_num == line {
            result.push_str(&format!("{:width$} | ", ""));
            result.push_str(&pointer_line(error_line, diagnostic));
        }
    }
    Some(result)
}

/// Spaces up to the error column, then `^` and one `-` per further column
/// the span covers on this line.
fn pointer_line(line: &str, diagnostic: &Diagnostic) -> String {
    let column = diagnostic.position.column;
    let prefix: String = line.chars().take(column - 1).collect();
    let covered: String = line
        .chars()
        .skip(column - 1)
        .take(diagnostic.span.len())
        .collect();
    let lead = UnicodeWidthStr::width(prefix.as_str());
    let tail = UnicodeWidthStr::width(covered.as_str()).saturating_sub(1);
    format!("{}^{} here\n", " ".repeat(lead), "-".repeat(tail))
}

// === Public API ===

/// Prints a diagnostic to standard error with colorization if supported.
pub fn print_diagnostic_to_stderr(report: &DiagnosticReport) {
    let mut stderr = StandardStream::stderr(ColorChoice::Auto);
    if print_diagnostic_colored(&mut stderr, report).is_err() {
        eprintln!("{report}");
    }
}

// === Internal Color Printing ===

fn print_diagnostic_colored(
    writer: &mut impl WriteColor,
    report: &DiagnosticReport,
) -> std::io::Result<()> {
    writer.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
    write!(writer, "Error")?;
    writer.reset()?;
    writeln!(writer, "{}:", report.location())?;
    writeln!(writer, "{}", report.diagnostic.message)?;
    if let Some(snippet) = report.snippet() {
        writer.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)))?;
        write!(writer, "\n{snippet}")?;
    }
    writer.reset()?;
    Ok(())
}
