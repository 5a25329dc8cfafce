//! # Skein Test Helpers
//!
//! Shared parsing shortcuts and fixture discovery for the integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use skein::ast::{Knot, Node, Story, Text};

/// Parses `source` and fails the test on any diagnostic.
pub fn parse_ok(source: &str) -> Story {
    let outcome = skein::parse(source);
    assert!(
        outcome.diagnostics.is_empty(),
        "unexpected diagnostics for {source:?}: {:#?}",
        outcome.diagnostics
    );
    outcome.story.expect("error-free parse produces a story")
}

/// Parses `source`, checks no story was produced, and returns the messages.
pub fn parse_errors(source: &str) -> Vec<String> {
    let outcome = skein::parse(source);
    assert!(outcome.story.is_none(), "expected errors for {source:?}");
    outcome
        .diagnostics
        .into_iter()
        .map(|diagnostic| diagnostic.message)
        .collect()
}

pub fn text(content: &str) -> Node {
    Node::Text(Text::new(content))
}

/// Content of the knot called `name`, failing the test if it is missing.
pub fn knot<'a>(story: &'a Story, name: &str) -> &'a Knot {
    story
        .knot(name)
        .unwrap_or_else(|| panic!("no knot named {name:?}"))
}

pub fn fixtures_dir(kind: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(kind)
}

/// Every `.ink` file under `tests/fixtures/{kind}`, with its contents.
pub fn load_fixtures(kind: &str) -> Vec<(PathBuf, String)> {
    let mut fixtures: Vec<(PathBuf, String)> = WalkDir::new(fixtures_dir(kind))
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "ink"))
        .map(|entry| {
            let source = std::fs::read_to_string(entry.path()).expect("fixture is readable");
            (entry.into_path(), source)
        })
        .collect();
    fixtures.sort();
    fixtures
}
