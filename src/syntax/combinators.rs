//! Rule combinators.
//!
//! All of these are transactional: when they return `None` the cursor is
//! where it was before the call.

use tracing::trace;

use super::Parser;

/// A boxed rule, for alternatives chosen at run time.
pub type ParseRule<'r, 'src, T> = Box<dyn FnMut(&mut Parser<'src>) -> Option<T> + 'r>;

/// Called after a failed [`Parser::expect`] to move past the bad input.
pub type Recovery<'src> = fn(&mut Parser<'src>);

impl<'src> Parser<'src> {
    /// Tries each rule in order and returns the first match.
    pub fn one_of<T>(&mut self, rules: &mut [ParseRule<'_, 'src, T>]) -> Option<T> {
        rules.iter_mut().find_map(|rule| self.attempt(rule))
    }

    /// Always succeeds; the inner option says whether `rule` matched.
    pub fn optional<T>(&mut self, rule: impl FnOnce(&mut Self) -> Option<T>) -> Option<Option<T>> {
        Some(self.attempt(rule))
    }

    /// Repeats `rule` until it stops matching. No match at all is a no-match.
    pub fn one_or_more<T>(&mut self, mut rule: impl FnMut(&mut Self) -> Option<T>) -> Option<Vec<T>> {
        let mut results = Vec::new();
        while let Some(value) = self.attempt(&mut rule) {
            results.push(value);
        }
        (!results.is_empty()).then_some(results)
    }

    /// Alternates `filler` and `body`, starting and ending on filler.
    ///
    /// The first filler must match. After that the loop stops at end of input,
    /// when `until` would match (peeked, not consumed), or when a whole round
    /// consumed nothing. Results are flattened. A run that consumed nothing
    /// and collected nothing is a no-match.
    pub fn interleave<T>(
        &mut self,
        mut filler: impl FnMut(&mut Self) -> Option<Vec<T>>,
        mut body: impl FnMut(&mut Self) -> Option<Vec<T>>,
        mut until: Option<&mut dyn FnMut(&mut Self) -> Option<()>>,
    ) -> Option<Vec<T>> {
        self.attempt(move |p| {
            let start = p.cursor();
            let mut results = p.attempt(&mut filler)?;
            loop {
                if p.at_end() {
                    break;
                }
                if let Some(until) = until.as_mut() {
                    if p.peek(|p| until(p)).is_some() {
                        break;
                    }
                }
                let round_start = p.cursor();
                if let Some(items) = p.attempt(&mut body) {
                    results.extend(items);
                }
                if let Some(items) = p.attempt(&mut filler) {
                    results.extend(items);
                }
                if p.cursor() == round_start {
                    break;
                }
            }
            (!results.is_empty() || p.cursor() != start).then_some(results)
        })
    }

    /// Like `attempt`, but a miss records `Expected {expectation} but saw ...`
    /// and then runs `recovery`, if any.
    pub fn expect<T>(
        &mut self,
        rule: impl FnOnce(&mut Self) -> Option<T>,
        expectation: &str,
        recovery: Option<Recovery<'src>>,
    ) -> Option<T> {
        if let Some(value) = self.attempt(rule) {
            return Some(value);
        }
        self.error_expected(expectation);
        if let Some(recover) = recovery {
            trace!(expectation, "recovering after failed expectation");
            recover(self);
        }
        None
    }

    /// Records an "Expected ..." error quoting the rest of the current line.
    pub fn error_expected(&mut self, expectation: &str) {
        let remainder = self.line_remainder();
        let saw = if remainder.is_empty() {
            "end of line".to_string()
        } else {
            format!("'{remainder}'")
        };
        self.error(format!("Expected {expectation} but saw {saw}"));
    }

    /// `rule` followed by a required end of line. A missing line end is
    /// reported and the line skipped, but the rule's result still stands.
    pub fn line<T>(&mut self, rule: impl FnOnce(&mut Self) -> Option<T>) -> Option<T> {
        self.attempt(|p| {
            let value = rule(p)?;
            p.expect(Self::end_of_line, "end of line", Some(Self::skip_to_next_line));
            Some(value)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word<'src>(p: &mut Parser<'src>) -> Option<Vec<&'src str>> {
        let letters = super::super::CharSet::new().with_range('a', 'z');
        p.parse_characters_from_set(&letters, true, None).map(|w| vec![w])
    }

    fn spaces<'src>(p: &mut Parser<'src>) -> Option<Vec<&'src str>> {
        p.optional(Parser::whitespace).map(|_| Vec::new())
    }

    #[test]
    fn one_of_takes_the_first_match_in_order() {
        let mut parser = Parser::new("abc");
        let mut rules: Vec<ParseRule<'_, '_, &str>> = vec![
            Box::new(|p: &mut Parser<'static>| p.parse_string("x")),
            Box::new(|p: &mut Parser<'static>| p.parse_string("a")),
            Box::new(|p: &mut Parser<'static>| p.parse_string("ab")),
        ];
        assert_eq!(parser.one_of(&mut rules), Some("a"));
        assert_eq!(parser.remaining(), "bc");
    }

    #[test]
    fn one_of_fails_cleanly_when_nothing_matches() {
        let mut parser = Parser::new("abc");
        let mut rules: Vec<ParseRule<'_, '_, &str>> = vec![
            Box::new(|p: &mut Parser<'static>| {
                p.parse_string("ab")?;
                p.parse_string("x")
            }),
            Box::new(|p: &mut Parser<'static>| p.parse_string("z")),
        ];
        assert_eq!(parser.one_of(&mut rules), None);
        assert_eq!(parser.cursor().offset(), 0);
    }

    #[test]
    fn optional_always_succeeds() {
        let mut parser = Parser::new("abc");
        assert_eq!(parser.optional(|p| p.parse_string("x")), Some(None));
        assert_eq!(parser.optional(|p| p.parse_string("a")), Some(Some("a")));
    }

    #[test]
    fn interleave_collects_body_results_between_fillers() {
        let mut parser = Parser::new("one two  three");
        let words = parser.interleave(spaces, word, None);
        assert_eq!(words, Some(vec!["one", "two", "three"]));
        assert!(parser.at_end());
    }

    #[test]
    fn interleave_stops_before_the_terminator_without_consuming_it() {
        let mut parser = Parser::new("one two STOP three");
        let mut stop = |p: &mut Parser<'static>| p.parse_string("STOP").map(|_| ());
        let words = parser.interleave(spaces, word, Some(&mut stop));
        assert_eq!(words, Some(vec!["one", "two"]));
        assert_eq!(parser.remaining(), "STOP three");
    }

    #[test]
    fn interleave_with_nothing_consumed_is_a_no_match() {
        let mut parser = Parser::new("123");
        assert_eq!(parser.interleave(spaces, word, None), None);
        assert_eq!(parser.cursor().offset(), 0);
    }

    #[test]
    fn interleave_that_only_consumed_filler_still_matches() {
        let mut parser = Parser::new("   123");
        assert_eq!(parser.interleave(spaces, word, None), Some(vec![]));
        assert_eq!(parser.remaining(), "123");
    }

    #[test]
    fn expect_reports_what_it_saw() {
        let mut parser = Parser::new("abc\nnext");
        assert_eq!(parser.expect(|p| p.parse_string("x"), "an x", None), None);
        assert_eq!(
            parser.diagnostics()[0].message,
            "Expected an x but saw 'abc'"
        );
        assert_eq!(parser.cursor().offset(), 0);
    }

    #[test]
    fn expect_names_end_of_line_when_the_line_is_empty() {
        let mut parser = Parser::new("\nnext");
        parser.expect(|p| p.parse_string("x"), "an x", None);
        assert_eq!(
            parser.diagnostics()[0].message,
            "Expected an x but saw end of line"
        );
    }

    #[test]
    fn expect_runs_recovery_after_a_miss() {
        let mut parser = Parser::new("abc\nnext");
        parser.expect(|p| p.parse_string("x"), "an x", Some(Parser::skip_to_next_line));
        assert_eq!(parser.remaining(), "next");
    }

    #[test]
    fn expect_success_records_nothing() {
        let mut parser = Parser::new("abc");
        assert_eq!(parser.expect(|p| p.parse_string("ab"), "ab", None), Some("ab"));
        assert!(!parser.had_error());
    }

    #[test]
    fn line_keeps_the_value_when_the_line_has_leftovers() {
        let mut parser = Parser::new("ab junk\nnext");
        assert_eq!(parser.line(|p| p.parse_string("ab")), Some("ab"));
        assert!(parser.had_error());
        assert_eq!(parser.remaining(), "next");
    }
}
