//! Read position and rule transactions.
//!
//! Every rule that may consume input brackets its work with [`Parser::begin_rule`]
//! and exactly one of [`Parser::succeed_rule`] / [`Parser::fail_rule`]. Failing
//! restores the cursor to where the rule began; succeeding keeps what was
//! consumed. Rules nest strictly last-in-first-out.

use super::{Parser, Position, Span};

/// A snapshot of the read position. Cheap to copy and compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Cursor {
    offset: usize,
}

impl Cursor {
    pub fn offset(self) -> usize {
        self.offset
    }
}

/// Handle returned by [`Parser::begin_rule`]; its value is the stack depth
/// after the push, so out-of-order completion can be caught.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "a begun rule must be completed with succeed_rule or fail_rule"]
pub struct RuleId(usize);

impl<'src> Parser<'src> {
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn position(&self) -> Position {
        Position::locate(self.source, self.cursor.offset)
    }

    /// Number of rules currently open.
    pub fn rule_depth(&self) -> usize {
        self.snapshots.len()
    }

    pub fn begin_rule(&mut self) -> RuleId {
        self.snapshots.push(self.cursor);
        RuleId(self.snapshots.len())
    }

    pub fn fail_rule<T>(&mut self, id: RuleId) -> Option<T> {
        self.cursor = self.pop_snapshot(id);
        None
    }

    pub fn succeed_rule<T>(&mut self, id: RuleId, value: T) -> Option<T> {
        self.pop_snapshot(id);
        Some(value)
    }

    fn pop_snapshot(&mut self, id: RuleId) -> Cursor {
        debug_assert_eq!(
            id.0,
            self.snapshots.len(),
            "rules must complete in the reverse order they began"
        );
        self.snapshots.pop().unwrap_or(self.cursor)
    }

    /// Runs `rule` as one transaction: on `None` the cursor is rolled back.
    ///
    /// Diagnostics recorded inside the rule are kept either way.
    pub fn attempt<T>(&mut self, rule: impl FnOnce(&mut Self) -> Option<T>) -> Option<T> {
        let id = self.begin_rule();
        match rule(self) {
            Some(value) => self.succeed_rule(id, value),
            None => self.fail_rule(id),
        }
    }

    /// Runs `rule` and always rolls back, reporting only whether it matched.
    pub fn peek<T>(&mut self, rule: impl FnOnce(&mut Self) -> Option<T>) -> Option<T> {
        let id = self.begin_rule();
        let result = rule(self);
        self.fail_rule::<()>(id);
        result
    }

    // ------------------------------------------------------------------------
    // Raw input access
    // ------------------------------------------------------------------------

    /// Unconsumed input.
    pub fn remaining(&self) -> &'src str {
        self.source.get(self.cursor.offset..).unwrap_or("")
    }

    pub fn at_end(&self) -> bool {
        self.cursor.offset >= self.source.len()
    }

    pub fn current_char(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    /// Moves forward `bytes` bytes; callers pass lengths of text they matched.
    pub(super) fn advance_by(&mut self, bytes: usize) {
        self.cursor.offset = (self.cursor.offset + bytes).min(self.source.len());
    }

    /// Source text consumed since `start`.
    pub fn slice_from(&self, start: Cursor) -> &'src str {
        self.source
            .get(start.offset..self.cursor.offset)
            .unwrap_or("")
    }

    /// Span from `start` to the cursor, with trailing line breaks left out.
    pub fn span_from(&self, start: Cursor) -> Span {
        let consumed = self.slice_from(start).trim_end_matches(['\n', '\r']);
        Span::new(start.offset, start.offset + consumed.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_rule_restores_the_cursor() {
        let mut parser = Parser::new("hello");
        let id = parser.begin_rule();
        parser.advance_by(3);
        assert_eq!(parser.cursor().offset(), 3);
        assert_eq!(parser.fail_rule::<()>(id), None);
        assert_eq!(parser.cursor().offset(), 0);
        assert_eq!(parser.rule_depth(), 0);
    }

    #[test]
    fn succeeded_rule_keeps_consumed_input() {
        let mut parser = Parser::new("hello");
        let id = parser.begin_rule();
        parser.advance_by(2);
        assert_eq!(parser.succeed_rule(id, 7), Some(7));
        assert_eq!(parser.remaining(), "llo");
        assert_eq!(parser.rule_depth(), 0);
    }

    #[test]
    fn nested_failure_only_rewinds_the_inner_rule() {
        let mut parser = Parser::new("abcdef");
        let outer = parser.begin_rule();
        parser.advance_by(2);
        let inner = parser.begin_rule();
        parser.advance_by(2);
        parser.fail_rule::<()>(inner);
        assert_eq!(parser.remaining(), "cdef");
        parser.succeed_rule(outer, ());
        assert_eq!(parser.remaining(), "cdef");
    }

    #[test]
    fn peek_never_consumes() {
        let mut parser = Parser::new("abc");
        assert_eq!(parser.peek(|p| p.parse_string("ab")), Some("ab"));
        assert_eq!(parser.cursor().offset(), 0);
    }

    #[test]
    fn span_from_leaves_out_the_line_break() {
        let mut parser = Parser::new("abc\ndef");
        let start = parser.cursor();
        parser.advance_by(4);
        assert_eq!(parser.span_from(start), Span::new(0, 3));
    }
}
