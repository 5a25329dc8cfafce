//! Statement-level grammar: scope levels, knots, stitches and diverts.
//!
//! A story is a sequence of statements at [`StatementLevel::Top`]. A knot
//! definition opens a knot-level block and a stitch definition a stitch-level
//! block; each block runs until a marker that closes its level.

use once_cell::sync::Lazy;
use tracing::trace;

use super::{CharSet, ParseRule, Parser};
use crate::ast::{Divert, Knot, Node, Path, Stitch};

// ============================================================================
// CONSTANTS
// ============================================================================

pub const KNOT_DIVERT_ARROW: &str = "==>";
pub const STITCH_DIVERT_ARROW: &str = "=>";
pub const WEAVE_POINT_DIVERT_ARROW: &str = "->";

static EQUALS: Lazy<CharSet> = Lazy::new(|| CharSet::from_chars("="));

static IDENTIFIER_FIRST: Lazy<CharSet> = Lazy::new(|| {
    CharSet::new()
        .with_range('A', 'Z')
        .with_range('a', 'z')
        .with_range('0', '9')
        .with_chars("_")
});

// Same as the first-character set today; kept apart so the two can diverge.
static IDENTIFIER_CHARS: Lazy<CharSet> = Lazy::new(|| IDENTIFIER_FIRST.clone());

/// Scope depth of a statement. Ordered so that `Stitch < Knot < Top`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StatementLevel {
    Stitch,
    Knot,
    Top,
}

pub(super) fn is_identifier_char(c: char) -> bool {
    IDENTIFIER_CHARS.contains(c)
}

// ============================================================================
// STATEMENTS
// ============================================================================

impl<'src> Parser<'src> {
    /// The whole story body.
    pub(super) fn top_level(&mut self) -> Vec<Node> {
        let content = self
            .statements_at_level(StatementLevel::Top)
            .unwrap_or_default();
        self.multiline_whitespace();
        content
    }

    /// Statements separated by blank lines, up to the first marker that
    /// closes `level` (the marker is left unconsumed).
    ///
    /// A line no statement at `level` accepts is reported and skipped, and the
    /// block carries on. Blank lines alone are not a block.
    pub fn statements_at_level(&mut self, level: StatementLevel) -> Option<Vec<Node>> {
        self.attempt(|p| {
            let mut saw_statement = false;
            let mut until = |p: &mut Parser<'src>| p.statements_break_for_level(level);
            let content = p.interleave(
                |p| p.optional(Self::multiline_whitespace).map(|_| Vec::new()),
                |p| {
                    let nodes = p
                        .statement_at_level(level)
                        .unwrap_or_else(|| p.skip_unparseable_line());
                    saw_statement = true;
                    Some(nodes)
                },
                Some(&mut until),
            )?;
            saw_statement.then_some(content)
        })
    }

    /// Reports the current line as not a statement and moves past it.
    fn skip_unparseable_line(&mut self) -> Vec<Node> {
        let before = self.cursor();
        self.error_expected("statement");
        trace!(line = self.position().line, "skipping unparseable line");
        self.skip_to_next_line();
        if self.cursor() == before {
            if let Some(c) = self.current_char() {
                self.advance_by(c.len_utf8());
            }
        }
        Vec::new()
    }

    /// One statement permitted at `level`, tried in a fixed order.
    pub fn statement_at_level(&mut self, level: StatementLevel) -> Option<Vec<Node>> {
        let start = self.cursor();
        let mut rules: Vec<ParseRule<'_, 'src, Vec<Node>>> = Vec::new();
        rules.push(Box::new(Self::divert_line));
        if level >= StatementLevel::Top {
            rules.push(Box::new(|p: &mut Self| {
                p.knot_definition().map(|knot| vec![Node::Knot(knot)])
            }));
        }
        rules.push(Box::new(|p: &mut Self| {
            p.line(Self::choice).map(|choice| vec![Node::Choice(choice)])
        }));
        rules.push(Box::new(|p: &mut Self| {
            p.gather_line().map(|gather| vec![Node::Gather(gather)])
        }));
        if level <= StatementLevel::Knot {
            rules.push(Box::new(|p: &mut Self| {
                p.stitch_definition().map(|stitch| vec![Node::Stitch(stitch)])
            }));
        }
        rules.push(Box::new(Self::logic_line));
        rules.push(Box::new(Self::line_of_mixed_text_and_logic));

        let statement = self.one_of(&mut rules)?;

        if level == StatementLevel::Top {
            let span = self.span_from(start);
            for node in &statement {
                let misplaced = match node {
                    Node::Return(_) => "should not have return statement outside of a knot",
                    Node::Choice(_) => "choices can only be in knots and stitches",
                    Node::Gather(_) => "gather points can only be in knots and stitches",
                    _ => continue,
                };
                self.error_at(misplaced, span);
            }
        }
        Some(statement)
    }

    /// Matches, without consuming it, the marker that ends a block at `level`:
    /// a knot title ends knot and stitch blocks, a stitch title ends stitch
    /// blocks. Nothing ends the top level.
    pub fn statements_break_for_level(&mut self, level: StatementLevel) -> Option<()> {
        self.peek(|p| {
            p.whitespace();
            let mut rules: Vec<ParseRule<'_, 'src, ()>> = Vec::new();
            if level <= StatementLevel::Knot {
                rules.push(Box::new(|p: &mut Self| p.knot_title_equals().map(|_| ())));
            }
            if level <= StatementLevel::Stitch {
                rules.push(Box::new(|p: &mut Self| p.stitch_title_equals().map(|_| ())));
            }
            p.one_of(&mut rules)
        })
    }

    // ------------------------------------------------------------------------
    // Knots and stitches
    // ------------------------------------------------------------------------

    /// Two or more `=`, not part of a `==>` arrow.
    pub(super) fn knot_title_equals(&mut self) -> Option<&'src str> {
        self.attempt(|p| {
            let run = p.parse_characters_from_set(&EQUALS, true, None)?;
            (run.len() >= 2 && p.current_char() != Some('>')).then_some(run)
        })
    }

    /// A single `=` that does not start `==` or `=>`.
    pub(super) fn stitch_title_equals(&mut self) -> Option<&'src str> {
        self.attempt(|p| {
            let equals = p.parse_string("=")?;
            (!matches!(p.current_char(), Some('=') | Some('>'))).then_some(equals)
        })
    }

    /// `== name ==` then the knot's statements.
    pub fn knot_definition(&mut self) -> Option<Knot> {
        self.attempt(|p| {
            p.whitespace();
            p.knot_title_equals()?;
            p.whitespace();
            let name = p.expect(Self::identifier, "knot name", Some(Self::skip_to_next_line));
            if name.is_some() {
                p.whitespace();
                p.parse_characters_from_set(&EQUALS, false, None);
                p.expect(
                    Self::end_of_line,
                    "end of line after knot name definition",
                    Some(Self::skip_to_next_line),
                );
            }
            trace!(knot = name.unwrap_or_default(), "parsing knot");
            let content = p
                .expect(
                    |p| p.statements_at_level(StatementLevel::Knot),
                    "at least one line within the knot",
                    Some(Self::skip_to_next_knot),
                )
                .unwrap_or_default();
            Some(Knot {
                name: name.unwrap_or_default().to_string(),
                content,
            })
        })
    }

    /// `= name` then the stitch's statements.
    pub fn stitch_definition(&mut self) -> Option<Stitch> {
        self.attempt(|p| {
            p.whitespace();
            p.stitch_title_equals()?;
            p.whitespace();
            let name = p.expect(Self::identifier, "stitch name", Some(Self::skip_to_next_line));
            if name.is_some() {
                p.expect(
                    Self::end_of_line,
                    "end of line after stitch name",
                    Some(Self::skip_to_next_line),
                );
            }
            trace!(stitch = name.unwrap_or_default(), "parsing stitch");
            let content = p
                .expect(
                    |p| p.statements_at_level(StatementLevel::Stitch),
                    "at least one line within the stitch",
                    Some(Self::skip_to_next_section),
                )
                .unwrap_or_default();
            Some(Stitch {
                name: name.unwrap_or_default().to_string(),
                content,
            })
        })
    }

    fn skip_to_next_knot(&mut self) {
        self.parse_until(Self::knot_title_equals, &EQUALS, &CharSet::new());
    }

    fn skip_to_next_section(&mut self) {
        self.parse_until(
            |p| p.knot_title_equals().or_else(|| p.stitch_title_equals()),
            &EQUALS,
            &CharSet::new(),
        );
    }

    // ------------------------------------------------------------------------
    // Diverts
    // ------------------------------------------------------------------------

    /// A divert as a whole statement line. An arrow whose target could not be
    /// read has already been reported, so the line is dropped without a
    /// second error.
    fn divert_line(&mut self) -> Option<Vec<Node>> {
        if let Some(divert) = self.line(Self::divert) {
            return Some(vec![Node::Divert(divert)]);
        }
        self.attempt(|p| {
            p.whitespace();
            p.divert_arrow()?;
            p.skip_to_next_line();
            Some(Vec::new())
        })
    }

    /// `==> knot`, `=> stitch` and `-> point`, each optional but in that
    /// order, with optional call arguments after the last name.
    pub fn divert(&mut self) -> Option<Divert> {
        self.attempt(|p| {
            p.whitespace();
            let knot = p.divert_target_with_arrow(KNOT_DIVERT_ARROW);
            let stitch = p.divert_target_with_arrow(STITCH_DIVERT_ARROW);
            let weave_point = p.divert_target_with_arrow(WEAVE_POINT_DIVERT_ARROW);
            let target = Path::to(knot, stitch, weave_point)?;
            let arguments = p.expression_function_call_arguments().unwrap_or_default();
            Some(Divert { target, arguments })
        })
    }

    /// `arrow` then the target's name. A missing name is reported; the slot
    /// is then empty.
    fn divert_target_with_arrow(&mut self, arrow: &str) -> Option<String> {
        self.attempt(|p| {
            p.whitespace();
            p.parse_string(arrow)?;
            p.whitespace();
            Some(p.expect(Self::identifier, "name of target to divert to", None))
        })
        .flatten()
        .map(str::to_string)
    }

    /// Any of the three arrow tokens.
    pub fn divert_arrow(&mut self) -> Option<&'src str> {
        let mut arrows: [ParseRule<'_, 'src, &'src str>; 3] = [
            Box::new(|p: &mut Self| p.parse_string(KNOT_DIVERT_ARROW)),
            Box::new(|p: &mut Self| p.parse_string(STITCH_DIVERT_ARROW)),
            Box::new(|p: &mut Self| p.parse_string(WEAVE_POINT_DIVERT_ARROW)),
        ];
        self.one_of(&mut arrows)
    }

    // ------------------------------------------------------------------------
    // Names
    // ------------------------------------------------------------------------

    /// One identifier character followed by any number more.
    pub fn identifier(&mut self) -> Option<&'src str> {
        self.attempt(|p| {
            let start = p.cursor();
            p.parse_characters_from_set(&IDENTIFIER_FIRST, true, Some(1))?;
            p.parse_characters_from_set(&IDENTIFIER_CHARS, false, None);
            Some(p.slice_from(start))
        })
    }

    /// `word` not directly followed by another identifier character.
    pub(super) fn keyword(&mut self, word: &str) -> Option<&'src str> {
        self.attempt(|p| {
            let matched = p.parse_string(word)?;
            (!p.current_char().is_some_and(is_identifier_char)).then_some(matched)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_are_ordered_innermost_first() {
        assert!(StatementLevel::Stitch < StatementLevel::Knot);
        assert!(StatementLevel::Knot < StatementLevel::Top);
    }

    #[test]
    fn identifier_stops_at_punctuation() {
        let mut parser = Parser::new("gold_key2.rest");
        assert_eq!(parser.identifier(), Some("gold_key2"));
        assert_eq!(parser.remaining(), ".rest");
    }

    #[test]
    fn identifier_may_start_with_a_digit() {
        let mut parser = Parser::new("3rd_door");
        assert_eq!(parser.identifier(), Some("3rd_door"));
    }

    #[test]
    fn knot_title_rejects_arrows() {
        let mut parser = Parser::new("==> knot");
        assert_eq!(parser.knot_title_equals(), None);
        assert_eq!(parser.cursor().offset(), 0);
        let mut parser = Parser::new("=== knot");
        assert_eq!(parser.knot_title_equals(), Some("==="));
    }

    #[test]
    fn stitch_title_is_a_lone_equals() {
        assert!(Parser::new("= name").stitch_title_equals().is_some());
        assert!(Parser::new("== name").stitch_title_equals().is_none());
        assert!(Parser::new("=> name").stitch_title_equals().is_none());
    }

    #[test]
    fn break_for_level_does_not_consume() {
        let mut parser = Parser::new("  == next ==");
        assert_eq!(parser.statements_break_for_level(StatementLevel::Knot), Some(()));
        assert_eq!(parser.cursor().offset(), 0);
        assert_eq!(parser.statements_break_for_level(StatementLevel::Top), None);
    }

    #[test]
    fn stitch_marker_breaks_only_stitch_blocks() {
        let mut parser = Parser::new("= inner");
        assert!(parser.statements_break_for_level(StatementLevel::Stitch).is_some());
        assert!(parser.statements_break_for_level(StatementLevel::Knot).is_none());
    }

    #[test]
    fn divert_fills_slots_in_arrow_order() {
        let mut parser = Parser::new("==> harbour => night -> dock");
        let divert = parser.divert().unwrap();
        assert_eq!(divert.target.knot.as_deref(), Some("harbour"));
        assert_eq!(divert.target.stitch.as_deref(), Some("night"));
        assert_eq!(divert.target.weave_point.as_deref(), Some("dock"));
    }

    #[test]
    fn divert_without_a_target_reports_and_fails() {
        let mut parser = Parser::new("-> ");
        assert!(parser.divert().is_none());
        assert_eq!(
            parser.diagnostics()[0].message,
            "Expected name of target to divert to but saw end of line"
        );
    }

    #[test]
    fn keyword_needs_a_word_boundary() {
        assert!(Parser::new("return x").keyword("return").is_some());
        assert!(Parser::new("returned").keyword("return").is_none());
    }
}
