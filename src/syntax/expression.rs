//! Expressions, by precedence climbing.
//!
//! ```text
//! expression := unary (binary_op unary)*
//! unary      := ('-' | '!' | 'not') unary | primary
//! primary    := number | string | 'true' | 'false' | '(' expression ')'
//!             | identifier '(' arguments ')' | identifier
//! ```
//!
//! Binary operators are left-associative; see [`BinaryOp::precedence`].

use once_cell::sync::Lazy;

use super::grammar::is_identifier_char;
use super::{CharSet, ParseRule, Parser};
use crate::ast::{BinaryOp, Expression, Number, UnaryOp};

static DIGITS: Lazy<CharSet> = Lazy::new(|| CharSet::new().with_range('0', '9'));
static STRING_END: Lazy<CharSet> = Lazy::new(|| CharSet::from_chars("\"\n\r"));

/// Words that can never name a variable.
const RESERVED_WORDS: &[&str] = &["true", "false", "not", "and", "or"];

/// Operator spellings, longest first where one is a prefix of another.
const SYMBOL_OPERATORS: &[(&str, BinaryOp)] = &[
    ("||", BinaryOp::Or),
    ("&&", BinaryOp::And),
    ("==", BinaryOp::Equal),
    ("!=", BinaryOp::NotEqual),
    ("<=", BinaryOp::LessOrEqual),
    (">=", BinaryOp::GreaterOrEqual),
    ("<", BinaryOp::Less),
    (">", BinaryOp::Greater),
    ("+", BinaryOp::Add),
    ("-", BinaryOp::Subtract),
    ("*", BinaryOp::Multiply),
    ("/", BinaryOp::Divide),
    ("%", BinaryOp::Remainder),
];

const WORD_OPERATORS: &[(&str, BinaryOp)] = &[("and", BinaryOp::And), ("or", BinaryOp::Or)];

impl<'src> Parser<'src> {
    pub fn expression(&mut self) -> Option<Expression> {
        self.attempt(|p| {
            p.whitespace();
            p.binary_expression(1)
        })
    }

    /// Operands joined by operators binding at least as tightly as
    /// `min_precedence`.
    fn binary_expression(&mut self, min_precedence: u8) -> Option<Expression> {
        let mut left = self.unary_expression()?;
        while let Some(op) = self.attempt(|p| {
            p.whitespace();
            let op = p.binary_operator()?;
            (op.precedence() >= min_precedence).then_some(op)
        }) {
            self.whitespace();
            let right = self.expect(
                |p| p.binary_expression(op.precedence() + 1),
                &format!("right side of '{}' expression", op.symbol()),
                None,
            )?;
            left = Expression::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Some(left)
    }

    fn binary_operator(&mut self) -> Option<BinaryOp> {
        for &(symbol, op) in SYMBOL_OPERATORS {
            // `->` is a divert, not a subtraction.
            let matched = self.attempt(|p| {
                p.parse_string(symbol)?;
                (op != BinaryOp::Subtract || p.current_char() != Some('>')).then_some(op)
            });
            if matched.is_some() {
                return matched;
            }
        }
        WORD_OPERATORS
            .iter()
            .find_map(|&(word, op)| self.keyword(word).map(|_| op))
    }

    fn unary_expression(&mut self) -> Option<Expression> {
        self.attempt(|p| {
            p.whitespace();
            match p.unary_operator() {
                Some(op) => {
                    let operand = p.nested(Self::unary_expression)?;
                    Some(Expression::Unary {
                        op,
                        operand: Box::new(operand),
                    })
                }
                None => p.primary_expression(),
            }
        })
    }

    fn unary_operator(&mut self) -> Option<UnaryOp> {
        self.attempt(|p| {
            if p.parse_string("-").is_some() {
                return (p.current_char() != Some('>')).then_some(UnaryOp::Negate);
            }
            if p.parse_string("!").is_some() {
                return (p.current_char() != Some('=')).then_some(UnaryOp::Not);
            }
            p.keyword("not").map(|_| UnaryOp::Not)
        })
    }

    fn primary_expression(&mut self) -> Option<Expression> {
        let mut forms: [ParseRule<'_, 'src, Expression>; 6] = [
            Box::new(|p: &mut Self| p.number_literal().map(Expression::Number)),
            Box::new(|p: &mut Self| p.string_literal().map(Expression::String)),
            Box::new(Self::bool_literal),
            Box::new(Self::parenthesized_expression),
            Box::new(Self::function_call),
            Box::new(Self::variable_reference),
        ];
        self.one_of(&mut forms)
    }

    /// Digits with an optional fraction, not running into a name like `2nd`.
    pub fn number_literal(&mut self) -> Option<Number> {
        self.attempt(|p| {
            let start = p.cursor();
            p.parse_characters_from_set(&DIGITS, true, None)?;
            let is_float = p
                .attempt(|p| {
                    p.parse_string(".")?;
                    p.parse_characters_from_set(&DIGITS, true, None)
                })
                .is_some();
            if p.current_char().is_some_and(is_identifier_char) {
                return None;
            }
            let literal = p.slice_from(start);
            let number = if is_float {
                literal.parse().ok().map(Number::Float)
            } else {
                literal.parse().ok().map(Number::Int)
            };
            if number.is_none() {
                p.error_at(
                    format!("Number '{literal}' is out of range"),
                    p.span_from(start),
                );
            }
            number
        })
    }

    /// `"..."` on one line, without escapes.
    pub fn string_literal(&mut self) -> Option<String> {
        self.attempt(|p| {
            p.parse_string("\"")?;
            let content = p.parse_until_characters(&STRING_END).unwrap_or_default();
            p.expect(|p| p.parse_string("\""), "closing '\"' for string", None);
            Some(content.to_string())
        })
    }

    fn bool_literal(&mut self) -> Option<Expression> {
        if self.keyword("true").is_some() {
            return Some(Expression::Bool(true));
        }
        self.keyword("false").map(|_| Expression::Bool(false))
    }

    fn parenthesized_expression(&mut self) -> Option<Expression> {
        self.attempt(|p| {
            p.parse_string("(")?;
            p.nested(|p| {
                let inner = p.expect(
                    Self::expression,
                    "expression within '(' and ')'",
                    None,
                )?;
                p.whitespace();
                p.expect(|p| p.parse_string(")"), "closing ')' for expression", None);
                Some(inner)
            })
        })
    }

    fn function_call(&mut self) -> Option<Expression> {
        self.attempt(|p| {
            let name = p.identifier()?.to_string();
            let arguments = p.expression_function_call_arguments()?;
            Some(Expression::FunctionCall { name, arguments })
        })
    }

    /// `(a, b, ...)` directly after a name. Once the `(` is seen, bad
    /// arguments and a missing `)` are reported.
    pub fn expression_function_call_arguments(&mut self) -> Option<Vec<Expression>> {
        self.attempt(|p| {
            p.parse_string("(")?;
            p.nested(|p| {
                p.whitespace();
                let mut arguments = Vec::new();
                if p.parse_string(")").is_some() {
                    return Some(arguments);
                }
                while let Some(argument) = p.expect(Self::expression, "function argument", None) {
                    arguments.push(argument);
                    p.whitespace();
                    if p.parse_string(",").is_none() {
                        break;
                    }
                }
                p.whitespace();
                p.expect(|p| p.parse_string(")"), "closing ')' for argument list", None);
                Some(arguments)
            })
        })
    }

    fn variable_reference(&mut self) -> Option<Expression> {
        self.attempt(|p| {
            let name = p.identifier()?;
            (!RESERVED_WORDS.contains(&name)).then(|| Expression::Variable(name.to_string()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Expression {
        Parser::new(source)
            .expression()
            .unwrap_or_else(|| panic!("no expression in {source:?}"))
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        assert_eq!(parse("1 + 2 * 3").to_string(), "(1 + (2 * 3))");
    }

    #[test]
    fn operators_associate_left() {
        assert_eq!(parse("10 - 4 - 3").to_string(), "((10 - 4) - 3)");
    }

    #[test]
    fn word_operators_match_symbols() {
        assert_eq!(parse("a and not b or c").to_string(), "((a && !b) || c)");
    }

    #[test]
    fn number_cannot_run_into_a_name() {
        assert_eq!(parse("2nd"), Expression::Variable("2nd".into()));
        assert_eq!(parse("2.5"), Expression::Number(Number::Float(2.5)));
    }

    #[test]
    fn subtraction_stops_at_a_divert_arrow() {
        let mut parser = Parser::new("x -> knot");
        assert_eq!(parser.expression(), Some(Expression::Variable("x".into())));
        assert_eq!(parser.remaining(), " -> knot");
    }

    #[test]
    fn function_calls_take_argument_lists() {
        assert_eq!(parse("max(a, 3)").to_string(), "max(a, 3)");
        assert_eq!(parse("roll()").to_string(), "roll()");
    }

    #[test]
    fn reserved_words_are_not_variables() {
        assert_eq!(Parser::new("or").expression(), None);
    }

    #[test]
    fn missing_right_operand_is_reported() {
        let mut parser = Parser::new("x +");
        assert_eq!(parser.expression(), None);
        assert_eq!(
            parser.diagnostics()[0].message,
            "Expected right side of '+' expression but saw end of line"
        );
    }
}
