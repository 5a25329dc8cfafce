//! Text content: plain text runs, `{...}` inline logic and conditionals,
//! and whole lines mixing the two.

use once_cell::sync::Lazy;

use super::{CharSet, ParseRule, Parser};
use crate::ast::{Conditional, ExpressionStatement, Node, Text};

/// Characters at which text stops to check for a divert arrow or line end.
static TEXT_PAUSE_CHARACTERS: Lazy<CharSet> = Lazy::new(|| CharSet::from_chars("-"));

/// What line shaping trims from the outer edges of content.
pub(super) const INLINE_SPACING: [char; 2] = [' ', '\t'];

/// Characters that always end a text run.
pub(super) static TEXT_HARD_STOPS: Lazy<CharSet> =
    Lazy::new(|| CharSet::from_chars("={}|\n\r"));

impl<'src> Parser<'src> {
    // ------------------------------------------------------------------------
    // Lines
    // ------------------------------------------------------------------------

    /// A line of text and inline logic, optionally ending in a divert.
    ///
    /// Leading whitespace of the first text and trailing whitespace of the
    /// last text are trimmed, and a newline is appended unless the line ends
    /// in a divert.
    pub fn line_of_mixed_text_and_logic(&mut self) -> Option<Vec<Node>> {
        self.attempt(|p| {
            let content = p.mixed_text_and_logic().unwrap_or_default();
            let divert = p.divert();
            let mut line = shape_line(content, divert.is_some());
            match divert {
                Some(divert) => line.push(Node::Divert(divert)),
                None if line.is_empty() => return None,
                None => {}
            }
            p.expect(Self::end_of_line, "end of line", Some(Self::skip_to_next_line));
            Some(line)
        })
    }

    /// Alternating text runs and inline logic, in source order.
    pub fn mixed_text_and_logic(&mut self) -> Option<Vec<Node>> {
        self.mixed_text_and_logic_within(&TEXT_HARD_STOPS)
    }

    pub(super) fn mixed_text_and_logic_within(
        &mut self,
        hard_stops: &CharSet,
    ) -> Option<Vec<Node>> {
        self.interleave(
            |p| {
                let text = p.content_text_within(hard_stops);
                Some(text.map(Node::Text).into_iter().collect())
            },
            |p| Some(p.inline_logic().into_iter().collect()),
            None,
        )
    }

    /// Plain text up to a hard stop, a divert arrow, or the end of the line.
    pub fn content_text(&mut self) -> Option<Text> {
        self.content_text_within(&TEXT_HARD_STOPS)
    }

    pub(super) fn content_text_within(&mut self, hard_stops: &CharSet) -> Option<Text> {
        self.parse_until(Self::content_text_ends, &TEXT_PAUSE_CHARACTERS, hard_stops)
            .map(Text::new)
    }

    fn content_text_ends(&mut self) -> Option<()> {
        let mut stops: [ParseRule<'_, 'src, ()>; 2] = [
            Box::new(|p: &mut Self| p.divert_arrow().map(|_| ())),
            Box::new(Self::end_of_line),
        ];
        self.one_of(&mut stops)
    }

    // ------------------------------------------------------------------------
    // Inline logic
    // ------------------------------------------------------------------------

    /// `{` inner logic `}`. Once the brace is seen the block is committed:
    /// missing contents or a missing `}` are reported rather than backtracked.
    pub fn inline_logic(&mut self) -> Option<Node> {
        self.attempt(|p| {
            p.parse_string("{")?;
            p.nested(|p| {
                p.whitespace();
                let logic = p.expect(
                    Self::inner_logic,
                    "inner logic within '{' and '}' braces",
                    None,
                )?;
                p.whitespace();
                p.expect(
                    |p| p.parse_string("}"),
                    "closing brace '}' for inline logic",
                    None,
                );
                Some(logic)
            })
        })
    }

    /// A conditional, else an expression whose value is printed.
    pub fn inner_logic(&mut self) -> Option<Node> {
        let mut forms: [ParseRule<'_, 'src, Node>; 2] = [
            Box::new(|p: &mut Self| p.inner_conditional_content().map(Node::Conditional)),
            Box::new(Self::inner_expression),
        ];
        self.one_of(&mut forms)
    }

    pub fn inner_expression(&mut self) -> Option<Node> {
        self.expression().map(|expression| {
            Node::Expression(ExpressionStatement {
                expression,
                output_when_complete: true,
            })
        })
    }

    /// `condition: yes | no`, or `condition:` followed by `- branch` lines.
    ///
    /// Anything other than one or two branches is reported, but the
    /// conditional is still returned with what was found.
    pub fn inner_conditional_content(&mut self) -> Option<Conditional> {
        self.attempt(|p| {
            let condition = p.expression()?;
            p.whitespace();
            p.parse_string(":")?;
            let branches = if p.newline().is_some() {
                p.expect(
                    Self::multiline_conditional_branches,
                    "conditional branches on following lines",
                    None,
                )
            } else {
                p.inline_conditional_branches()
            }
            .unwrap_or_default();

            if branches.is_empty() || branches.len() > 2 {
                p.error("Expected one or two alternatives separated by '|' in inline conditional");
            }
            let mut branches = branches.into_iter();
            Some(Conditional {
                condition,
                when_true: branches.next().unwrap_or_default(),
                when_false: branches.next(),
            })
        })
    }

    /// Branches separated by `|` on the same line. An empty branch is allowed
    /// next to a `|`.
    fn inline_conditional_branches(&mut self) -> Option<Vec<Vec<Node>>> {
        self.attempt(|p| {
            let mut branches = vec![p.mixed_text_and_logic().unwrap_or_default()];
            while p.parse_string("|").is_some() {
                branches.push(p.mixed_text_and_logic().unwrap_or_default());
            }
            if branches.len() == 1 && branches[0].is_empty() {
                return None;
            }
            Some(branches)
        })
    }

    fn multiline_conditional_branches(&mut self) -> Option<Vec<Vec<Node>>> {
        self.one_or_more(Self::individual_condition_branch_line)
    }

    /// `- ` then a line of mixed content.
    fn individual_condition_branch_line(&mut self) -> Option<Vec<Node>> {
        self.attempt(|p| {
            p.optional(Self::multiline_whitespace);
            p.whitespace();
            p.parse_string("-")?;
            if p.current_char() == Some('>') {
                return None;
            }
            p.whitespace();
            p.line_of_mixed_text_and_logic()
        })
    }
}

/// Trims the outer whitespace of a line and appends the line break.
///
/// Returns an empty vector when nothing but whitespace was on the line.
pub(super) fn shape_line(mut content: Vec<Node>, ends_in_divert: bool) -> Vec<Node> {
    if let Some(Node::Text(first)) = content.first_mut() {
        first.content = first.content.trim_start_matches(INLINE_SPACING).to_string();
    }
    if let Some(Node::Text(last)) = content.last_mut() {
        last.content = last.content.trim_end_matches(INLINE_SPACING).to_string();
    }
    content.retain(|node| node.as_text() != Some(""));
    if content.is_empty() || ends_in_divert {
        return content;
    }
    match content.last_mut() {
        Some(Node::Text(last)) => last.content.push('\n'),
        _ => content.push(Node::Text(Text::new("\n"))),
    }
    content
}
