//! Handles all user-facing output for the CLI.
//!
//! Tree and JSON rendering of parsed stories, and the colored summary printed
//! after `check`.

use std::fmt::Write as _;
use std::io::Write as _;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::ast::{Divert, Node, Story};
use crate::errors::Result;

// ============================================================================
// TREE OUTPUT
// ============================================================================

pub fn print_tree(story: &Story) {
    print!("{}", format_tree(&story.content));
}

/// One line per node, children indented two spaces under their parent.
pub fn format_tree(nodes: &[Node]) -> String {
    let mut out = String::new();
    write_nodes(&mut out, nodes, 0);
    out
}

fn write_nodes(out: &mut String, nodes: &[Node], depth: usize) {
    for node in nodes {
        write_node(out, node, depth);
    }
}

fn write_node(out: &mut String, node: &Node, depth: usize) {
    let indent = "  ".repeat(depth);
    let _ = match node {
        Node::Text(text) => writeln!(out, "{indent}Text {:?}", text.content),
        Node::Divert(divert) => writeln!(out, "{indent}Divert {}", divert_summary(divert)),
        Node::Expression(statement) => writeln!(
            out,
            "{indent}Expression {}{}",
            statement.expression,
            if statement.output_when_complete { " (output)" } else { "" }
        ),
        Node::Return(ret) => match &ret.value {
            Some(value) => writeln!(out, "{indent}Return {value}"),
            None => writeln!(out, "{indent}Return"),
        },
        Node::VariableAssignment(assign) => {
            let keyword = if assign.is_declaration { "var " } else { "" };
            match &assign.value {
                Some(value) => writeln!(out, "{indent}Assign {keyword}{} = {value}", assign.name),
                None => writeln!(out, "{indent}Assign {keyword}{}", assign.name),
            }
        }
        Node::Knot(knot) => {
            let _ = writeln!(out, "{indent}Knot {}", knot.name);
            write_nodes(out, &knot.content, depth + 1);
            Ok(())
        }
        Node::Stitch(stitch) => {
            let _ = writeln!(out, "{indent}Stitch {}", stitch.name);
            write_nodes(out, &stitch.content, depth + 1);
            Ok(())
        }
        Node::Conditional(conditional) => {
            let _ = writeln!(out, "{indent}Conditional {}", conditional.condition);
            write_branch(out, "then", &conditional.when_true, depth + 1);
            if let Some(when_false) = &conditional.when_false {
                write_branch(out, "else", when_false, depth + 1);
            }
            Ok(())
        }
        Node::Choice(choice) => {
            let _ = write!(out, "{indent}Choice depth={}", choice.depth);
            if choice.sticky {
                out.push_str(" sticky");
            }
            if let Some(label) = &choice.label {
                let _ = write!(out, " label={label}");
            }
            out.push('\n');
            write_branch(out, "start", &choice.start_content, depth + 1);
            write_branch(out, "choice-only", &choice.choice_only_content, depth + 1);
            write_branch(out, "inner", &choice.inner_content, depth + 1);
            if let Some(divert) = &choice.divert {
                let _ = writeln!(out, "{indent}  Divert {}", divert_summary(divert));
            }
            Ok(())
        }
        Node::Gather(gather) => {
            let _ = write!(out, "{indent}Gather depth={}", gather.depth);
            if let Some(label) = &gather.label {
                let _ = write!(out, " label={label}");
            }
            out.push('\n');
            write_nodes(out, &gather.content, depth + 1);
            if let Some(divert) = &gather.divert {
                let _ = writeln!(out, "{indent}  Divert {}", divert_summary(divert));
            }
            Ok(())
        }
    };
}

/// Labelled child block; empty blocks are left out.
fn write_branch(out: &mut String, label: &str, nodes: &[Node], depth: usize) {
    if nodes.is_empty() {
        return;
    }
    let _ = writeln!(out, "{}{label}:", "  ".repeat(depth));
    write_nodes(out, nodes, depth + 1);
}

fn divert_summary(divert: &Divert) -> String {
    if divert.arguments.is_empty() {
        return divert.target.to_string();
    }
    let args = divert
        .arguments
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    format!("{}({args})", divert.target)
}

// ============================================================================
// JSON OUTPUT
// ============================================================================

pub fn print_json(story: &Story) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(story)?);
    Ok(())
}

// ============================================================================
// CHECK SUMMARY
// ============================================================================

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CheckSummary {
    pub files: usize,
    pub failed: usize,
    pub errors: usize,
}

impl CheckSummary {
    pub fn record(&mut self, errors: usize) {
        self.files += 1;
        self.errors += errors;
        if errors > 0 {
            self.failed += 1;
        }
    }
}

/// Prints the `check` summary line, green when clean and red otherwise.
pub fn print_summary(summary: &CheckSummary) {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    let color = if summary.failed == 0 { Color::Green } else { Color::Red };
    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true));
    let _ = writeln!(
        stdout,
        "Checked {} file(s): {} with errors, {} error(s) in total",
        summary.files, summary.failed, summary.errors
    );
    let _ = stdout.reset();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tree_indents_knot_content() {
        let story = crate::parse("== start ==\nHello.\n-> start\n").story.unwrap();
        assert_eq!(
            format_tree(&story.content),
            "Knot start\n  Text \"Hello.\\n\"\n  Divert start\n"
        );
    }

    #[test]
    fn summary_counts_failing_files_once() {
        let mut summary = CheckSummary::default();
        summary.record(0);
        summary.record(3);
        assert_eq!(
            summary,
            CheckSummary {
                files: 2,
                failed: 1,
                errors: 3
            }
        );
    }
}
