//! Character sets used by the primitive scanners.

use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharSet {
    chars: BTreeSet<char>,
}

impl CharSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// A set holding every character of `chars`.
    pub fn from_chars(chars: &str) -> Self {
        chars.chars().collect()
    }

    /// Adds the inclusive range `first..=last`.
    ///
    /// # Panics
    ///
    /// If `first > last`. Sets are built once from constant tables, so a
    /// reversed range is a programming error.
    pub fn add_range(&mut self, first: char, last: char) {
        assert!(
            first <= last,
            "character range '{first}'..='{last}' is reversed"
        );
        self.chars.extend(first..=last);
    }

    pub fn with_range(mut self, first: char, last: char) -> Self {
        self.add_range(first, last);
        self
    }

    pub fn add(&mut self, c: char) {
        self.chars.insert(c);
    }

    pub fn with_chars(mut self, chars: &str) -> Self {
        self.chars.extend(chars.chars());
        self
    }

    pub fn union(&self, other: &CharSet) -> Self {
        self.chars.union(&other.chars).copied().collect()
    }

    pub fn contains(&self, c: char) -> bool {
        self.chars.contains(&c)
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }
}

impl FromIterator<char> for CharSet {
    fn from_iter<I: IntoIterator<Item = char>>(iter: I) -> Self {
        Self {
            chars: iter.into_iter().collect(),
        }
    }
}
