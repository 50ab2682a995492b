//! Source rendering for expression trees
//!
//! Renders untyped and typed expressions back to source text with every
//! operator application wrapped in parentheses, so the shape the parser
//! chose is visible at a glance: `1 + 2 * 3` renders as `(1 + (2 * 3))`.

use std::fmt::{self, Display};

use crate::ast::{Expression, FunctionCall};

const BINARY_OPERATORS: &[&str] = &[
    "+", "-", "*", "/", "%", "**", "<", "<=", ">", ">=", "=", "!=", "..", "in", ".", "&",
];

struct Formatter {
    buffer: String,
}

impl Formatter {
    fn new() -> Self {
        Self {
            buffer: String::new(),
        }
    }

    fn write_str(&mut self, s: &str) {
        self.buffer.push_str(s);
    }

    fn finish(self) -> String {
        self.buffer
    }
}

/// Render `expression` as fully parenthesized source.
pub fn format_expression<T>(expression: &Expression<T>) -> String {
    let mut formatter = Formatter::new();
    format_node(expression, &mut formatter);
    formatter.finish()
}

impl<T> Display for Expression<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_expression(self))
    }
}

fn format_node<T>(expression: &Expression<T>, fmt: &mut Formatter) {
    match expression {
        Expression::Identifier(identifier) => fmt.write_str(&identifier.name),
        Expression::Integer(integer) => fmt.write_str(&integer.value.to_string()),
        Expression::Float(float) => fmt.write_str(&format!("{:?}", float.value)),
        Expression::String(string) => fmt.write_str(&format!("{:?}", string.value)),
        Expression::Boolean(boolean) => fmt.write_str(&boolean.value.to_string()),
        Expression::None(_) => fmt.write_str("none"),
        Expression::Array(array) => {
            fmt.write_str("[");
            format_separated(array.elements.iter().map(Some), fmt);
            fmt.write_str("]");
        }
        Expression::FunctionCall(call) => format_call(call, fmt),
        Expression::Unrecognized(unrecognized) => {
            let text: Vec<String> = unrecognized.tokens.iter().map(|token| token.text()).collect();
            fmt.write_str("<unrecognized");
            if !text.is_empty() {
                fmt.write_str(" ");
                fmt.write_str(&text.join(" "));
            }
            fmt.write_str(">");
        }
    }
}

fn format_separated<'a, T: 'a>(
    items: impl Iterator<Item = Option<&'a Expression<T>>>,
    fmt: &mut Formatter,
) {
    for (index, item) in items.enumerate() {
        if index > 0 {
            fmt.write_str(", ");
        }
        match item {
            Some(item) => format_node(item, fmt),
            None => fmt.write_str("_"),
        }
    }
}

/// Operator calls the parser produced are rendered in operator form; any
/// other call keeps the call syntax.
fn format_call<T>(call: &FunctionCall<T>, fmt: &mut Formatter) {
    let operator = match call.callee.as_ref() {
        Expression::Identifier(identifier) => Some(identifier.name.as_str()),
        _ => None,
    };

    match (operator, call.args.as_slice()) {
        (Some(symbol), [Some(left), Some(right)]) if BINARY_OPERATORS.contains(&symbol) => {
            fmt.write_str("(");
            format_node(left, fmt);
            fmt.write_str(&format!(" {symbol} "));
            format_node(right, fmt);
            fmt.write_str(")");
        }
        (Some("neg"), [Some(operand)]) => {
            fmt.write_str("(-");
            format_node(operand, fmt);
            fmt.write_str(")");
        }
        (Some("[]"), [Some(target), Some(index)]) => {
            format_node(target, fmt);
            fmt.write_str("[");
            format_node(index, fmt);
            fmt.write_str("]");
        }
        (Some("[:]"), [Some(target), bounds @ ..]) if bounds.len() == 3 => {
            format_node(target, fmt);
            fmt.write_str("[");
            for (index, bound) in bounds.iter().enumerate() {
                if index > 0 {
                    fmt.write_str(":");
                }
                match bound {
                    Some(Expression::None(_)) | None => {}
                    Some(bound) => format_node(bound, fmt),
                }
            }
            fmt.write_str("]");
        }
        _ => {
            format_node(&call.callee, fmt);
            fmt.write_str("(");
            format_separated(call.args.iter().map(Option::as_ref), fmt);
            fmt.write_str(")");
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::lexer::tokenize;
    use crate::parser::parse_tokens;

    use super::*;

    fn render(source: &str) -> String {
        format_expression(&parse_tokens(tokenize(source).unwrap()))
    }

    #[test]
    fn test_literals() {
        assert_eq!(render("42"), "42");
        assert_eq!(render("1.5"), "1.5");
        assert_eq!(render("\"a\\nb\""), "\"a\\nb\"");
        assert_eq!(render("[true, none]"), "[true, none]");
    }

    #[test]
    fn test_operators_are_parenthesized() {
        assert_eq!(render("1 + 2 * 3"), "(1 + (2 * 3))");
        assert_eq!(render("-x ** 2"), "((-x) ** 2)");
        assert_eq!(render("2 ** 3 ** 2"), "(2 ** (3 ** 2))");
    }

    #[test]
    fn test_calls_and_access() {
        assert_eq!(render("f(_, 2)"), "f(_, 2)");
        assert_eq!(render("xs[1]"), "xs[1]");
        assert_eq!(render("xs[1:]"), "xs[1::]");
        assert_eq!(render("xs[::2]"), "xs[::2]");
    }
}
