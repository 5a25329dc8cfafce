//! Choices (`* text`, `+ text`) and gathers (`- text`).

use once_cell::sync::Lazy;

use super::content::{shape_line, INLINE_SPACING, TEXT_HARD_STOPS};
use super::{CharSet, Parser};
use crate::ast::{Choice, Gather, Node};

/// Choice text also stops at the brackets around menu-only content.
static CHOICE_TEXT_HARD_STOPS: Lazy<CharSet> =
    Lazy::new(|| TEXT_HARD_STOPS.union(&CharSet::from_chars("[]")));

impl<'src> Parser<'src> {
    /// `*`/`+` bullets, an optional `(label)`, content with an optional
    /// `[menu-only]` part, and an optional trailing divert. The caller
    /// handles the end of line.
    pub fn choice(&mut self) -> Option<Choice> {
        self.attempt(|p| {
            let (depth, sticky) = p.choice_bullets()?;
            p.whitespace();
            let label = p.weave_label();
            p.whitespace();

            let mut start_content = p.choice_content();
            let mut choice_only_content = Vec::new();
            let mut inner_content = Vec::new();
            if p.parse_string("[").is_some() {
                choice_only_content = p.choice_content();
                p.expect(
                    |p| p.parse_string("]"),
                    "closing ']' for choice-only content",
                    None,
                );
                inner_content = p.choice_content();
            }
            let divert = p.divert();

            trim_choice_content(&mut [
                &mut start_content,
                &mut choice_only_content,
                &mut inner_content,
            ]);
            if start_content.is_empty()
                && choice_only_content.is_empty()
                && inner_content.is_empty()
                && divert.is_none()
            {
                p.error_expected("choice content or divert");
            }
            Some(Choice {
                depth,
                sticky,
                label,
                start_content,
                choice_only_content,
                inner_content,
                divert,
            })
        })
    }

    /// Counts leading bullets. Any `+` makes the choice sticky.
    fn choice_bullets(&mut self) -> Option<(usize, bool)> {
        let mut depth = 0;
        let mut sticky = false;
        while let Some(bullet) = self.attempt(|p| {
            p.whitespace();
            p.parse_string("*").or_else(|| p.parse_string("+"))
        }) {
            depth += 1;
            sticky |= bullet == "+";
        }
        (depth > 0).then_some((depth, sticky))
    }

    fn choice_content(&mut self) -> Vec<Node> {
        self.mixed_text_and_logic_within(&CHOICE_TEXT_HARD_STOPS)
            .unwrap_or_default()
    }

    /// A gather line: `-` bullets, optional label, optional content and an
    /// optional divert, then the end of line.
    pub fn gather_line(&mut self) -> Option<Gather> {
        self.attempt(|p| {
            let depth = p.gather_dashes()?;
            p.whitespace();
            let label = p.weave_label();
            let content = p.mixed_text_and_logic().unwrap_or_default();
            let divert = p.divert();
            let content = shape_line(content, divert.is_some());
            p.expect(Self::end_of_line, "end of line", Some(Self::skip_to_next_line));
            Some(Gather {
                depth,
                label,
                content,
                divert,
            })
        })
    }

    /// Counts leading `-` that are not the start of a `->` arrow.
    fn gather_dashes(&mut self) -> Option<usize> {
        let mut depth = 0;
        while self
            .attempt(|p| {
                p.whitespace();
                p.parse_string("-")?;
                (p.current_char() != Some('>')).then_some(())
            })
            .is_some()
        {
            depth += 1;
        }
        (depth > 0).then_some(depth)
    }

    /// `(name)`. Anything else in parentheses is left for the content.
    pub fn weave_label(&mut self) -> Option<String> {
        self.attempt(|p| {
            p.parse_string("(")?;
            p.whitespace();
            let name = p.identifier()?;
            p.whitespace();
            p.parse_string(")")?;
            Some(name.to_string())
        })
    }
}

/// Trims leading whitespace from the first non-empty part and trailing
/// whitespace from the last, then drops text left empty.
fn trim_choice_content(parts: &mut [&mut Vec<Node>]) {
    if let Some(Node::Text(first)) = parts
        .iter_mut()
        .find(|part| !part.is_empty())
        .and_then(|part| part.first_mut())
    {
        first.content = first.content.trim_start_matches(INLINE_SPACING).to_string();
    }
    if let Some(Node::Text(last)) = parts
        .iter_mut()
        .rev()
        .find(|part| !part.is_empty())
        .and_then(|part| part.last_mut())
    {
        last.content = last.content.trim_end_matches(INLINE_SPACING).to_string();
    }
    for part in parts.iter_mut() {
        part.retain(|node| node.as_text() != Some(""));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Text;

    fn text(s: &str) -> Node {
        Node::Text(Text::new(s))
    }

    #[test]
    fn choice_splits_bracketed_content() {
        let mut parser = Parser::new("* Hello [back] there");
        let choice = parser.choice().unwrap();
        assert_eq!(choice.depth, 1);
        assert!(!choice.sticky);
        assert_eq!(choice.start_content, vec![text("Hello ")]);
        assert_eq!(choice.choice_only_content, vec![text("back")]);
        assert_eq!(choice.inner_content, vec![text(" there")]);
    }

    #[test]
    fn nested_sticky_choice_with_label_and_divert() {
        let mut parser = Parser::new("+ + (ask) Ask again -> ask_again");
        let choice = parser.choice().unwrap();
        assert_eq!(choice.depth, 2);
        assert!(choice.sticky);
        assert_eq!(choice.label.as_deref(), Some("ask"));
        assert_eq!(choice.start_content, vec![text("Ask again")]);
        assert_eq!(
            choice.divert.unwrap().target.weave_point.as_deref(),
            Some("ask_again")
        );
    }

    #[test]
    fn choice_trimming_keeps_non_breaking_spaces() {
        let mut parser = Parser::new("* \u{A0}Wait\u{A0} ");
        let choice = parser.choice().unwrap();
        assert_eq!(choice.start_content, vec![text("\u{A0}Wait\u{A0}")]);
    }

    #[test]
    fn gather_dash_is_not_an_arrow() {
        let mut parser = Parser::new("-> somewhere\n");
        assert!(parser.gather_line().is_none());
        assert_eq!(parser.cursor().offset(), 0);
    }

    #[test]
    fn gather_with_only_a_divert() {
        let mut parser = Parser::new("- - -> end\n");
        let gather = parser.gather_line().unwrap();
        assert_eq!(gather.depth, 2);
        assert!(gather.content.is_empty());
        assert!(gather.divert.is_some());
    }

    #[test]
    fn parenthesised_prose_is_not_a_label() {
        let mut parser = Parser::new("- (quietly now) Hello\n");
        let gather = parser.gather_line().unwrap();
        assert_eq!(gather.label, None);
        assert_eq!(gather.content, vec![text("(quietly now) Hello\n")]);
    }
}
