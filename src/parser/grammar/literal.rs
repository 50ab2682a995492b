//! Literal parsers

use crate::ast::{
    Boolean, Expression, Float, Identifier, Integer, NoneLiteral, StringLiteral, UntypedExpression,
};
use crate::lexer::Token;
use crate::message::Message;

use crate::parser::combinators::BoxedParser;
use crate::parser::state::{ParseError, ParseState};

/// Parse an identifier
pub fn identifier() -> BoxedParser<Identifier<()>> {
    BoxedParser::new(|state: &mut ParseState| match state.peek() {
        Some(Token::Ident(id)) => {
            let node = Identifier {
                name: id.value.clone(),
                position: id.position.clone(),
                messages: vec![],
                info: (),
            };
            state.advance();
            Ok(node)
        }
        found => Err(ParseError::unexpected("identifier", found)),
    })
}

/// Parse an integer literal. Values outside the `i64` range are reported
/// and read as `0`.
pub fn integer() -> BoxedParser<Integer<()>> {
    BoxedParser::new(|state: &mut ParseState| match state.peek() {
        Some(Token::IntegerLiteral(int)) => {
            let mut messages = vec![];
            let value = int.value.parse().unwrap_or_else(|_| {
                messages.push(Message::error(
                    format!("Integer literal {} is out of range", int.value),
                    &int.position,
                ));
                0
            });
            let node = Integer {
                value,
                position: int.position.clone(),
                messages,
                info: (),
            };
            state.advance();
            Ok(node)
        }
        found => Err(ParseError::unexpected("integer", found)),
    })
}

/// Parse a float literal
pub fn float() -> BoxedParser<Float<()>> {
    BoxedParser::new(|state: &mut ParseState| match state.peek() {
        Some(Token::FloatLiteral(float)) => {
            let mut messages = vec![];
            let value = float.value.parse().unwrap_or_else(|_| {
                messages.push(Message::error(
                    format!("Invalid float literal {}", float.value),
                    &float.position,
                ));
                0.0
            });
            let node = Float {
                value,
                position: float.position.clone(),
                messages,
                info: (),
            };
            state.advance();
            Ok(node)
        }
        found => Err(ParseError::unexpected("float", found)),
    })
}

/// Parse a string literal
pub fn string_literal() -> BoxedParser<StringLiteral<()>> {
    BoxedParser::new(|state: &mut ParseState| match state.peek() {
        Some(Token::StringLiteral(s)) => {
            let node = StringLiteral {
                value: unescape(&s.value),
                position: s.position.clone(),
                messages: vec![],
                info: (),
            };
            state.advance();
            Ok(node)
        }
        found => Err(ParseError::unexpected("string", found)),
    })
}

/// Parse a boolean literal
pub fn boolean() -> BoxedParser<Boolean<()>> {
    BoxedParser::new(|state: &mut ParseState| {
        let (value, position) = match state.peek() {
            Some(Token::True(t)) => (true, t.position.clone()),
            Some(Token::False(f)) => (false, f.position.clone()),
            found => return Err(ParseError::unexpected("boolean", found)),
        };
        state.advance();
        Ok(Boolean {
            value,
            position,
            messages: vec![],
            info: (),
        })
    })
}

/// Parse `none`
pub fn none_literal() -> BoxedParser<NoneLiteral<()>> {
    BoxedParser::new(|state: &mut ParseState| match state.peek() {
        Some(Token::NoneLiteral(n)) => {
            let node = NoneLiteral {
                position: n.position.clone(),
                messages: vec![],
                info: (),
            };
            state.advance();
            Ok(node)
        }
        found => Err(ParseError::unexpected("'none'", found)),
    })
}

/// literal := string | float | integer | boolean | none | identifier
pub fn literal() -> BoxedParser<UntypedExpression> {
    let string_expr = string_literal() >> Expression::String;
    let float_expr = float() >> Expression::Float;
    let int_expr = integer() >> Expression::Integer;
    let bool_expr = boolean() >> Expression::Boolean;
    let none_expr = none_literal() >> Expression::None;
    let ident_expr = identifier() >> Expression::Identifier;

    (string_expr | float_expr | int_expr | bool_expr | none_expr | ident_expr).label("expression")
}

/// Strip the surrounding quotes and resolve backslash escapes.
fn unescape(raw: &str) -> String {
    let inner = raw
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(raw);

    let mut value = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            value.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => value.push('\n'),
            Some('t') => value.push('\t'),
            Some('r') => value.push('\r'),
            Some('0') => value.push('\0'),
            Some(other) => value.push(other),
            None => value.push('\\'),
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::unescape;

    #[test]
    fn test_unescape_plain() {
        assert_eq!(unescape(r#""hello""#), "hello");
    }

    #[test]
    fn test_unescape_sequences() {
        assert_eq!(unescape(r#""a\nb\t\"c\\""#), "a\nb\t\"c\\");
    }
}
