//! Primitive scanners: literals, character runs, whitespace and line ends.
//!
//! Each scanner either matches and consumes, or returns `None` leaving the
//! cursor exactly where it was.

use once_cell::sync::Lazy;

use super::{CharSet, Parser};

pub(super) static INLINE_WHITESPACE: Lazy<CharSet> = Lazy::new(|| CharSet::from_chars(" \t"));
pub(super) static LINE_BREAKS: Lazy<CharSet> = Lazy::new(|| CharSet::from_chars("\n\r"));

impl<'src> Parser<'src> {
    /// Matches `literal` exactly.
    pub fn parse_string(&mut self, literal: &str) -> Option<&'src str> {
        if literal.is_empty() || !self.remaining().starts_with(literal) {
            return None;
        }
        let start = self.cursor();
        self.advance_by(literal.len());
        Some(self.slice_from(start))
    }

    /// Consumes characters while they belong to `set`, up to `max_count` of them.
    ///
    /// With `require_at_least_one`, an empty run is a no-match; otherwise it
    /// matches the empty string.
    pub fn parse_characters_from_set(
        &mut self,
        set: &CharSet,
        require_at_least_one: bool,
        max_count: Option<usize>,
    ) -> Option<&'src str> {
        let limit = max_count.unwrap_or(usize::MAX);
        let run = self.consume_while(limit, |c| set.contains(c));
        if run.is_empty() && require_at_least_one {
            return None;
        }
        Some(run)
    }

    /// Consumes characters until one in `set` (or end of input).
    /// An empty run is a no-match.
    pub fn parse_until_characters(&mut self, set: &CharSet) -> Option<&'src str> {
        let run = self.consume_while(usize::MAX, |c| !set.contains(c));
        (!run.is_empty()).then_some(run)
    }

    /// Consumes characters until a hard-stop character, or until `stop_rule`
    /// would match at a pause character. The stop rule is only peeked.
    ///
    /// An empty result is a no-match.
    pub fn parse_until<S>(
        &mut self,
        mut stop_rule: impl FnMut(&mut Self) -> Option<S>,
        pause_characters: &CharSet,
        hard_stop_characters: &CharSet,
    ) -> Option<&'src str> {
        let start = self.cursor();
        while let Some(c) = self.current_char() {
            if hard_stop_characters.contains(c) {
                break;
            }
            if pause_characters.contains(c) && self.peek(&mut stop_rule).is_some() {
                break;
            }
            self.advance_by(c.len_utf8());
        }
        let text = self.slice_from(start);
        (!text.is_empty()).then_some(text)
    }

    /// One or more spaces or tabs.
    pub fn whitespace(&mut self) -> Option<()> {
        self.parse_characters_from_set(&INLINE_WHITESPACE, true, None)
            .map(|_| ())
    }

    /// Optional trailing whitespace then `\n`, `\r\n` or a lone `\r`.
    pub fn newline(&mut self) -> Option<()> {
        self.attempt(|p| {
            p.whitespace();
            p.parse_string("\n")
                .or_else(|| p.parse_string("\r\n"))
                .or_else(|| p.parse_string("\r"))
                .map(|_| ())
        })
    }

    /// Optional whitespace then end of input.
    pub fn end_of_file(&mut self) -> Option<()> {
        self.attempt(|p| {
            p.whitespace();
            p.at_end().then_some(())
        })
    }

    pub fn end_of_line(&mut self) -> Option<()> {
        self.newline().or_else(|| self.end_of_file())
    }

    /// One or more blank lines, or whitespace running to the end of input.
    pub fn multiline_whitespace(&mut self) -> Option<()> {
        let start = self.cursor();
        while self.newline().is_some() {}
        self.end_of_file();
        (self.cursor() != start).then_some(())
    }

    /// Text from the cursor to the end of the current line. Consumes nothing.
    pub fn line_remainder(&self) -> &'src str {
        let rest = self.remaining();
        let end = rest.find(['\n', '\r']).unwrap_or(rest.len());
        &rest[..end]
    }

    /// Discards the rest of the current line including its line break.
    pub fn skip_to_next_line(&mut self) {
        self.parse_until_characters(&LINE_BREAKS);
        self.newline();
    }

    fn consume_while(&mut self, limit: usize, mut accept: impl FnMut(char) -> bool) -> &'src str {
        let start = self.cursor();
        let length: usize = self
            .remaining()
            .chars()
            .take(limit)
            .take_while(|&c| accept(c))
            .map(char::len_utf8)
            .sum();
        self.advance_by(length);
        self.slice_from(start)
    }
}
