//! AST module for skein stories
//!
//! The parser only constructs these nodes and arranges them in order; it does
//! not validate what they mean. Every node kind is a variant of the closed
//! [`Node`] enum so later stages (and scope checks in the parser) can match on
//! it directly.

// ============================================================================
// IMPORTS
// ============================================================================

use serde::{Deserialize, Serialize};

pub mod expression;
pub mod path;

pub use expression::{BinaryOp, Expression, Number, UnaryOp};
pub use path::Path;

// ============================================================================
// CORE DATA STRUCTURES
// ============================================================================

/// Root of a parsed story. Owns the top-level statements in source order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Story {
    pub content: Vec<Node>,
}

/// A single story statement or content element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    Text(Text),
    Divert(Divert),
    Conditional(Conditional),
    Knot(Knot),
    Stitch(Stitch),
    Choice(Choice),
    Gather(Gather),
    Return(Return),
    VariableAssignment(VariableAssignment),
    Expression(ExpressionStatement),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Text {
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Divert {
    pub target: Path,
    pub arguments: Vec<Expression>,
}

/// `{condition: when_true | when_false}` or its multi-line form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conditional {
    pub condition: Expression,
    pub when_true: Vec<Node>,
    pub when_false: Option<Vec<Node>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Knot {
    pub name: String,
    pub content: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stitch {
    pub name: String,
    pub content: Vec<Node>,
}

/// A player-selectable option.
///
/// `start_content` is shown both in the menu and after picking, `choice_only_content`
/// (the bracketed part) only in the menu, and `inner_content` only after picking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    pub depth: usize,
    pub sticky: bool,
    pub label: Option<String>,
    pub start_content: Vec<Node>,
    pub choice_only_content: Vec<Node>,
    pub inner_content: Vec<Node>,
    pub divert: Option<Divert>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gather {
    pub depth: usize,
    pub label: Option<String>,
    pub content: Vec<Node>,
    pub divert: Option<Divert>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Return {
    pub value: Option<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableAssignment {
    pub name: String,
    pub value: Option<Expression>,
    pub is_declaration: bool,
}

/// An expression used as a statement or as inline logic.
///
/// `output_when_complete` is set for `{expr}` blocks inside text, whose value is
/// printed; logic-line expressions (`~ f()`) discard their value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpressionStatement {
    pub expression: Expression,
    pub output_when_complete: bool,
}

// ============================================================================
// PUBLIC API IMPLEMENTATION
// ============================================================================

impl Text {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

impl Story {
    pub fn new(content: Vec<Node>) -> Self {
        Self { content }
    }

    /// Looks up a top-level knot by name.
    pub fn knot(&self, name: &str) -> Option<&Knot> {
        self.content.iter().find_map(|node| match node {
            Node::Knot(knot) if knot.name == name => Some(knot),
            _ => None,
        })
    }

    pub fn knots(&self) -> impl Iterator<Item = &Knot> {
        self.content.iter().filter_map(|node| match node {
            Node::Knot(knot) => Some(knot),
            _ => None,
        })
    }
}

impl Knot {
    pub fn stitch(&self, name: &str) -> Option<&Stitch> {
        self.content.iter().find_map(|node| match node {
            Node::Stitch(stitch) if stitch.name == name => Some(stitch),
            _ => None,
        })
    }
}

impl Node {
    /// Short name of the variant, used in tree output and messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Text(_) => "Text",
            Node::Divert(_) => "Divert",
            Node::Conditional(_) => "Conditional",
            Node::Knot(_) => "Knot",
            Node::Stitch(_) => "Stitch",
            Node::Choice(_) => "Choice",
            Node::Gather(_) => "Gather",
            Node::Return(_) => "Return",
            Node::VariableAssignment(_) => "VariableAssignment",
            Node::Expression(_) => "Expression",
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Node::Text(text) => Some(&text.content),
            _ => None,
        }
    }

    /// Renders the node back into source-like text.
    pub fn pretty(&self) -> String {
        match self {
            Node::Text(text) => text.content.clone(),
            Node::Divert(divert) => divert.pretty(),
            Node::Conditional(conditional) => conditional.pretty(),
            Node::Knot(knot) => format!("== {} ==\n{}", knot.name, render_content(&knot.content)),
            Node::Stitch(stitch) => {
                format!("= {}\n{}", stitch.name, render_content(&stitch.content))
            }
            Node::Choice(choice) => choice.pretty(),
            Node::Gather(gather) => gather.pretty(),
            Node::Return(ret) => match &ret.value {
                Some(value) => format!("~ return {value}\n"),
                None => "~ return\n".to_string(),
            },
            Node::VariableAssignment(assign) => {
                let var = if assign.is_declaration { "var " } else { "" };
                match &assign.value {
                    Some(value) => format!("~ {var}{} = {value}\n", assign.name),
                    None => format!("~ {var}{}\n", assign.name),
                }
            }
            Node::Expression(statement) if statement.output_when_complete => {
                format!("{{{}}}", statement.expression)
            }
            Node::Expression(statement) => format!("~ {}\n", statement.expression),
        }
    }
}

impl Divert {
    pub fn pretty(&self) -> String {
        let mut parts = Vec::new();
        if let Some(knot) = &self.target.knot {
            parts.push(format!("==> {knot}"));
        }
        if let Some(stitch) = &self.target.stitch {
            parts.push(format!("=> {stitch}"));
        }
        if let Some(point) = &self.target.weave_point {
            parts.push(format!("-> {point}"));
        }
        let mut out = parts.join(" ");
        if !self.arguments.is_empty() {
            let args = self
                .arguments
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            out.push_str(&format!("({args})"));
        }
        out
    }
}

impl Conditional {
    fn pretty(&self) -> String {
        let mut out = format!("{{{}: {}", self.condition, render_content(&self.when_true));
        if let Some(when_false) = &self.when_false {
            out.push('|');
            out.push_str(&render_content(when_false));
        }
        out.push('}');
        out
    }
}

impl Choice {
    fn pretty(&self) -> String {
        let bullet = if self.sticky { "+" } else { "*" };
        let mut out = vec![bullet; self.depth].join(" ");
        if let Some(label) = &self.label {
            out.push_str(&format!(" ({label})"));
        }
        out.push(' ');
        out.push_str(&render_content(&self.start_content));
        if !self.choice_only_content.is_empty() {
            out.push_str(&format!("[{}]", render_content(&self.choice_only_content)));
        }
        out.push_str(&render_content(&self.inner_content));
        if let Some(divert) = &self.divert {
            out.push_str(&format!(" {}", divert.pretty()));
        }
        out.push('\n');
        out
    }
}

impl Gather {
    fn pretty(&self) -> String {
        let mut out = vec!["-"; self.depth].join(" ");
        if let Some(label) = &self.label {
            out.push_str(&format!(" ({label})"));
        }
        let content = render_content(&self.content);
        if !content.is_empty() {
            out.push(' ');
            out.push_str(&content);
        }
        match &self.divert {
            Some(divert) => out.push_str(&format!(" {}\n", divert.pretty())),
            None if !out.ends_with('\n') => out.push('\n'),
            None => {}
        }
        out
    }
}

/// Renders a content sequence (text, inline logic, diverts) back to text.
pub fn render_content(nodes: &[Node]) -> String {
    nodes.iter().map(Node::pretty).collect()
}
