//! Logic lines: `~ return`, `~ var x = ...`, `~ x = ...` and `~ expr`.

use super::{ParseRule, Parser};
use crate::ast::{ExpressionStatement, Node, Return, VariableAssignment};

impl<'src> Parser<'src> {
    /// A `~` line. Anything after the `~` that is not a logic statement is
    /// reported once and the line skipped; the statement then yields no nodes.
    pub fn logic_line(&mut self) -> Option<Vec<Node>> {
        self.attempt(|p| {
            p.whitespace();
            p.parse_string("~")?;
            p.whitespace();
            let mut after_tilde: [ParseRule<'_, 'src, Node>; 3] = [
                Box::new(|p: &mut Self| p.return_statement().map(Node::Return)),
                Box::new(|p: &mut Self| {
                    p.variable_declaration_or_assignment()
                        .map(Node::VariableAssignment)
                }),
                Box::new(|p: &mut Self| {
                    p.expression().map(|expression| {
                        Node::Expression(ExpressionStatement {
                            expression,
                            output_when_complete: false,
                        })
                    })
                }),
            ];
            // One report per failed line; errors from the alternatives go.
            let reported = p.diagnostics.len();
            let Some(node) = p.expect(
                |p| {
                    let node = p.one_of(&mut after_tilde);
                    if node.is_none() {
                        p.diagnostics.truncate(reported);
                    }
                    node
                },
                "expression after '~'",
                Some(Self::skip_to_next_line),
            ) else {
                return Some(Vec::new());
            };
            p.expect(Self::end_of_line, "end of line", Some(Self::skip_to_next_line));
            Some(vec![node])
        })
    }

    /// `return` with an optional value.
    pub fn return_statement(&mut self) -> Option<Return> {
        self.attempt(|p| {
            p.keyword("return")?;
            p.whitespace();
            Some(Return {
                value: p.expression(),
            })
        })
    }

    /// `var name = value`, `var name`, or `name = value`.
    pub fn variable_declaration_or_assignment(&mut self) -> Option<VariableAssignment> {
        self.attempt(|p| {
            let is_declaration = p
                .attempt(|p| {
                    p.keyword("var")?;
                    p.whitespace()
                })
                .is_some();
            let name = p.identifier()?.to_string();
            p.whitespace();
            let assigns = p
                .attempt(|p| {
                    p.parse_string("=")?;
                    (p.current_char() != Some('=')).then_some(())
                })
                .is_some();
            if !assigns {
                return is_declaration.then(|| VariableAssignment {
                    name,
                    value: None,
                    is_declaration,
                });
            }
            p.whitespace();
            let value = p.expect(Self::expression, "value expression to be assigned", None);
            Some(VariableAssignment {
                name,
                value,
                is_declaration,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Expression, Number};

    fn logic(source: &str) -> (Option<Vec<Node>>, Vec<String>) {
        let mut parser = Parser::new(source);
        let nodes = parser.logic_line();
        let messages = parser.diagnostics().iter().map(|d| d.message.clone()).collect();
        (nodes, messages)
    }

    #[test]
    fn assignment_is_not_an_equality_test() {
        let (nodes, errors) = logic("~ x == 5\n");
        assert!(errors.is_empty());
        assert!(matches!(nodes.unwrap()[0], Node::Expression(_)));
    }

    #[test]
    fn declaration_without_a_value() {
        let (nodes, _) = logic("~ var lantern\n");
        assert_eq!(
            nodes.unwrap()[0],
            Node::VariableAssignment(VariableAssignment {
                name: "lantern".into(),
                value: None,
                is_declaration: true,
            })
        );
    }

    #[test]
    fn returned_is_an_ordinary_name() {
        let (nodes, _) = logic("~ returned = 1\n");
        match &nodes.unwrap()[0] {
            Node::VariableAssignment(assign) => {
                assert_eq!(assign.name, "returned");
                assert_eq!(assign.value, Some(Expression::Number(Number::Int(1))));
                assert!(!assign.is_declaration);
            }
            other => panic!("expected assignment, got {other:?}"),
        }
    }

    #[test]
    fn bare_return_has_no_value() {
        let (nodes, _) = logic("~ return\n");
        assert_eq!(nodes.unwrap()[0], Node::Return(Return { value: None }));
    }

    #[test]
    fn garbage_after_tilde_is_one_error_and_no_nodes() {
        let mut parser = Parser::new("~ = 5\nnext");
        assert_eq!(parser.logic_line(), Some(vec![]));
        assert_eq!(parser.diagnostics().len(), 1);
        assert_eq!(
            parser.diagnostics()[0].message,
            "Expected expression after '~' but saw '= 5'"
        );
        assert_eq!(parser.remaining(), "next");
    }

    #[test]
    fn dangling_operator_is_reported_once_for_the_line() {
        let mut parser = Parser::new("~ x += 1\nnext");
        assert_eq!(parser.logic_line(), Some(vec![]));
        assert_eq!(parser.diagnostics().len(), 1);
        assert_eq!(
            parser.diagnostics()[0].message,
            "Expected expression after '~' but saw 'x += 1'"
        );
        assert_eq!(parser.remaining(), "next");
    }

    #[test]
    fn lines_without_tilde_are_not_logic() {
        let (nodes, errors) = logic("plain text\n");
        assert_eq!(nodes, None);
        assert!(errors.is_empty());
    }
}
