// tests/grammar_tests.rs
//
// Weave, divert and inline-logic grammar inside knots.

mod common;

use common::{knot, parse_ok, text};
use skein::ast::{Choice, Expression, Gather, Node, Number};

fn knot_content(source: &str) -> Vec<Node> {
    let story = parse_ok(source);
    knot(&story, "k").content.clone()
}

fn as_choice(node: &Node) -> &Choice {
    match node {
        Node::Choice(choice) => choice,
        other => panic!("expected a choice, got {other:?}"),
    }
}

fn as_gather(node: &Node) -> &Gather {
    match node {
        Node::Gather(gather) => gather,
        other => panic!("expected a gather, got {other:?}"),
    }
}

#[test]
fn choices_and_gathers_form_a_weave() {
    let content = knot_content(
        "\
== k ==
* [Look around] You look around.
* * Deeper -> k
- (regroup) Back together.
",
    );
    assert_eq!(content.len(), 3);

    let look = as_choice(&content[0]);
    assert_eq!(look.depth, 1);
    assert!(look.start_content.is_empty());
    assert_eq!(look.choice_only_content, vec![text("Look around")]);
    assert_eq!(look.inner_content, vec![text(" You look around.")]);

    let deeper = as_choice(&content[1]);
    assert_eq!(deeper.depth, 2);
    assert_eq!(deeper.start_content, vec![text("Deeper")]);
    assert_eq!(
        deeper.divert.as_ref().and_then(|d| d.target.weave_point.as_deref()),
        Some("k")
    );

    let regroup = as_gather(&content[2]);
    assert_eq!(regroup.depth, 1);
    assert_eq!(regroup.label.as_deref(), Some("regroup"));
    assert_eq!(regroup.content, vec![text("Back together.\n")]);
}

#[test]
fn sticky_choice_with_only_menu_text_and_a_divert() {
    let content = knot_content("== k ==\n+ [Leave] -> market\n");
    let leave = as_choice(&content[0]);
    assert!(leave.sticky);
    assert_eq!(leave.choice_only_content, vec![text("Leave")]);
    assert!(leave.inner_content.is_empty());
    assert!(leave.divert.is_some());
}

#[test]
fn empty_choice_is_reported() {
    let errors = common::parse_errors("== k ==\n*\nText.\n");
    assert_eq!(
        errors,
        vec!["Expected choice content or divert but saw end of line"]
    );
}

#[test]
fn divert_with_arguments() {
    let content = knot_content("== k ==\n-> greet(name, 2)\n");
    let Node::Divert(divert) = &content[0] else {
        panic!("expected a divert");
    };
    assert_eq!(divert.target.weave_point.as_deref(), Some("greet"));
    assert_eq!(
        divert.arguments,
        vec![
            Expression::Variable("name".into()),
            Expression::Number(Number::Int(2))
        ]
    );
}

#[test]
fn qualified_divert_fills_knot_and_stitch() {
    let content = knot_content("== k ==\n==> harbour => night\n");
    let Node::Divert(divert) = &content[0] else {
        panic!("expected a divert");
    };
    assert_eq!(divert.target.knot.as_deref(), Some("harbour"));
    assert_eq!(divert.target.stitch.as_deref(), Some("night"));
    assert_eq!(divert.target.weave_point, None);
    assert_eq!(divert.target.to_string(), "harbour.night");
}

#[test]
fn inline_conditional_inside_text() {
    let content = knot_content("== k ==\nThe door is {open: ajar|shut}.\n");
    assert_eq!(content.len(), 3);
    assert_eq!(content[0], text("The door is "));
    let Node::Conditional(conditional) = &content[1] else {
        panic!("expected a conditional");
    };
    assert_eq!(conditional.condition, Expression::Variable("open".into()));
    assert_eq!(conditional.when_true, vec![text(" ajar")]);
    assert_eq!(conditional.when_false, Some(vec![text("shut")]));
    assert_eq!(content[2], text(".\n"));
}

#[test]
fn single_branch_conditional_has_no_else() {
    let content = knot_content("== k ==\n{rich: You are rich.}\n");
    let Node::Conditional(conditional) = &content[0] else {
        panic!("expected a conditional");
    };
    assert_eq!(conditional.when_false, None);
    assert_eq!(content[1], text("\n"));
}

#[test]
fn multiline_conditional_branches() {
    let content = knot_content(
        "\
== k ==
{lit:
- The room is bright.
- It is dark.
}
After.
",
    );
    let Node::Conditional(conditional) = &content[0] else {
        panic!("expected a conditional, got {:?}", content[0]);
    };
    assert_eq!(conditional.when_true, vec![text("The room is bright.\n")]);
    assert_eq!(conditional.when_false, Some(vec![text("It is dark.\n")]));
    assert_eq!(&content[1..], &[text("\n"), text("After.\n")]);
}

#[test]
fn printed_expression_inside_text() {
    let content = knot_content("== k ==\nYou have {coins * 2} coins.\n");
    let Node::Expression(statement) = &content[1] else {
        panic!("expected inline logic");
    };
    assert!(statement.output_when_complete);
    assert_eq!(statement.expression.to_string(), "(coins * 2)");
}

#[test]
fn dashes_inside_text_are_kept() {
    let content = knot_content("== k ==\nA lantern -- and a key - nothing more.\n");
    assert_eq!(content, vec![text("A lantern -- and a key - nothing more.\n")]);
}
