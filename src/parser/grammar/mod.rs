//! Grammar of the sift language
//!
//! - `literal`: identifiers, numbers, strings, booleans and `none`
//! - `expression`: operators, calls, index/slice access, arrays
//! - `list`: the delimited-list helper shared by arrays, calls and slices

mod expression;
mod list;
mod literal;

use lachs::Span;

use crate::ast::{Expression, Unrecognized, UntypedExpression};
use crate::lexer::Token;
use crate::message::Message;

use super::state::ParseState;

pub use expression::{
    ACCESS_PRECEDENCE, Associativity, CALL_PRECEDENCE, UNARY_PRECEDENCE,
    operator_call, parse_expression, starts_expression,
};
pub use literal::{boolean, float, identifier, integer, literal, none_literal, string_literal};

/// Consume tokens no rule accepts, up to the next token an expression can
/// start with.
fn unrecognized_run(state: &mut ParseState) -> UntypedExpression {
    let mut tokens: Vec<Token> = vec![];
    while let Some(token) = state.advance() {
        tokens.push(token);
        if state.peek().is_some_and(starts_expression) {
            break;
        }
    }

    let position = match (tokens.first(), tokens.last()) {
        (Some(first), Some(last)) => first.pos().merge(&last.pos()),
        _ => Span::default(),
    };
    let text = match tokens.first() {
        Some(first) => format!("Unexpected {}", first.describe()),
        None => "Unexpected end of input".to_string(),
    };
    let message = Message::error(text, &position);

    Expression::Unrecognized(Unrecognized {
        tokens,
        position,
        messages: vec![message],
        info: (),
    })
}

/// program := expression
///
/// A program is exactly one expression. Anything after it is reported on
/// the root node, and so is an empty token stream.
pub fn parse(state: &mut ParseState) -> UntypedExpression {
    let mut items = vec![];
    while state.has_next() {
        let start = state.position();
        match parse_expression(state, 0) {
            Ok(expression) => items.push(expression),
            Err(_) => {
                state.restore(start);
                items.push(unrecognized_run(state));
            }
        }
    }

    let mut items = items.into_iter();
    let Some(mut root) = items.next() else {
        let position = Span::default();
        let message = Message::error("Empty program", &position);
        return Expression::Unrecognized(Unrecognized {
            tokens: vec![],
            position,
            messages: vec![message],
            info: (),
        });
    };

    for extra in items {
        if extra.is_unrecognized() {
            root.messages_mut().extend(extra.all_messages());
        } else {
            root.messages_mut().push(Message::error(
                "Unexpected expression after end of program",
                extra.position(),
            ));
        }
    }

    tracing::debug!(messages = root.all_messages().len(), "parsed program");
    root
}

/// Parse a complete token list into a single expression.
pub fn parse_tokens(tokens: Vec<Token>) -> UntypedExpression {
    let mut state = ParseState::new(tokens);
    parse(&mut state)
}
