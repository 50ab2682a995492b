//! Expression parsing by precedence climbing.
//!
//! Every operator is turned into a call of a function named after the
//! operator symbol, so `1 + 2` becomes `+(1, 2)` and `xs[0]` becomes
//! `[](xs, 0)`. Later stages only ever see identifiers and calls.

use lachs::Span;

use crate::ast::{
    Array, Expression, FunctionCall, Identifier, NoneLiteral, Unrecognized, UntypedExpression,
};
use crate::lexer::Token;
use crate::message::Message;

use crate::parser::combinators::{
    expect_lbracket, expect_lparen, expect_minus, expect_underscore, optional,
};
use crate::parser::state::{ParseResult, ParseState, Parser};

use super::list::{ListSyntax, parse_list};
use super::literal::literal;

pub const CALL_PRECEDENCE: u8 = 99;
pub const ACCESS_PRECEDENCE: u8 = 13;
pub const UNARY_PRECEDENCE: u8 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Associativity {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OperatorKind {
    Call,
    Access,
    Binary,
}

#[derive(Debug, Clone, Copy)]
struct Operator {
    symbol: &'static str,
    precedence: u8,
    associativity: Associativity,
    kind: OperatorKind,
}

impl Operator {
    const fn binary(symbol: &'static str, precedence: u8, associativity: Associativity) -> Self {
        Operator {
            symbol,
            precedence,
            associativity,
            kind: OperatorKind::Binary,
        }
    }

    /// An operator only extends the left operand when it binds tighter than
    /// the current floor, or equally tight and right-associative.
    fn binds_over(&self, min_precedence: u8) -> bool {
        self.precedence > min_precedence
            || (self.precedence == min_precedence && self.associativity == Associativity::Right)
    }
}

fn infix_operator(token: &Token) -> Option<Operator> {
    use Associativity::{Left, Right};

    let operator = match token {
        Token::LParen(_) => Operator {
            symbol: "()",
            precedence: CALL_PRECEDENCE,
            associativity: Left,
            kind: OperatorKind::Call,
        },
        Token::LBracket(_) => Operator {
            symbol: "[]",
            precedence: ACCESS_PRECEDENCE,
            associativity: Right,
            kind: OperatorKind::Access,
        },
        Token::Dot(_) => Operator::binary(".", ACCESS_PRECEDENCE, Right),
        Token::Ampersand(_) => Operator::binary("&", ACCESS_PRECEDENCE, Right),
        Token::DoubleStar(_) => Operator::binary("**", 11, Right),
        Token::Star(_) => Operator::binary("*", 10, Left),
        Token::Slash(_) => Operator::binary("/", 10, Left),
        Token::Percent(_) => Operator::binary("%", 10, Left),
        Token::Plus(_) => Operator::binary("+", 9, Left),
        Token::Minus(_) => Operator::binary("-", 9, Left),
        Token::LessThan(_) => Operator::binary("<", 7, Left),
        Token::LessEquals(_) => Operator::binary("<=", 7, Left),
        Token::GreaterThan(_) => Operator::binary(">", 7, Left),
        Token::GreaterEquals(_) => Operator::binary(">=", 7, Left),
        Token::Equals(_) => Operator::binary("=", 6, Left),
        Token::NotEquals(_) => Operator::binary("!=", 6, Left),
        Token::DotDot(_) => Operator::binary("..", 6, Left),
        Token::In(_) => Operator::binary("in", 5, Right),
        _ => return None,
    };
    Some(operator)
}

/// Whether an expression may start at this token.
pub fn starts_expression(token: &Token) -> bool {
    matches!(
        token,
        Token::Ident(_)
            | Token::IntegerLiteral(_)
            | Token::FloatLiteral(_)
            | Token::StringLiteral(_)
            | Token::True(_)
            | Token::False(_)
            | Token::NoneLiteral(_)
            | Token::LParen(_)
            | Token::LBracket(_)
            | Token::Minus(_)
    )
}

enum Step {
    Advanced(UntypedExpression),
    Done(UntypedExpression),
}

/// Parse one expression whose operators all bind tighter than `min_precedence`.
///
/// The prefix result is fed back as left context until no infix rule
/// applies anymore, which chains left-associative operators without
/// backtracking.
pub fn parse_expression(state: &mut ParseState, min_precedence: u8) -> ParseResult<UntypedExpression> {
    let start = state.position();
    let mut left = prefix(state).inspect_err(|_| state.restore(start))?;

    loop {
        match extend(state, left, min_precedence) {
            Step::Advanced(expression) => left = expression,
            Step::Done(expression) => return Ok(expression),
        }
    }
}

/// prefix := "(" expression ")" | array | "-" prefix | literal
fn prefix(state: &mut ParseState) -> ParseResult<UntypedExpression> {
    match state.peek() {
        Some(Token::LParen(_)) => parenthesized(state),
        Some(Token::LBracket(_)) => array(state),
        Some(Token::Minus(_)) => negation(state),
        _ => literal().parse(state),
    }
}

fn extend(state: &mut ParseState, left: UntypedExpression, min_precedence: u8) -> Step {
    let Some(operator) = state.peek().and_then(infix_operator) else {
        return Step::Done(left);
    };
    if !operator.binds_over(min_precedence) {
        return Step::Done(left);
    }

    match operator.kind {
        OperatorKind::Call => Step::Advanced(call(state, left)),
        OperatorKind::Access => Step::Advanced(access(state, left)),
        OperatorKind::Binary => Step::Advanced(binary(state, left, operator)),
    }
}

/// Build the call node an operator desugars to.
pub fn operator_call(
    symbol: &str,
    operator_position: Span,
    args: Vec<Option<UntypedExpression>>,
    position: Span,
) -> UntypedExpression {
    Expression::FunctionCall(FunctionCall {
        callee: Box::new(Expression::Identifier(Identifier {
            name: symbol.to_string(),
            position: operator_position,
            messages: vec![],
            info: (),
        })),
        args,
        position,
        messages: vec![],
        info: (),
    })
}

fn unrecognized(tokens: Vec<Token>, position: Span, text: impl Into<String>) -> UntypedExpression {
    let message = Message::error(text, &position);
    Expression::Unrecognized(Unrecognized {
        tokens,
        position,
        messages: vec![message],
        info: (),
    })
}

/// parenthesized := "(" expression ")"
fn parenthesized(state: &mut ParseState) -> ParseResult<UntypedExpression> {
    let start = state.position();
    let open = expect_lparen().parse(state)?;
    let open_position = open.pos();

    if matches!(state.peek(), Some(Token::RParen(_))) {
        if let Some(close) = state.advance() {
            let position = open_position.merge(&close.pos());
            return Ok(unrecognized(vec![open, close], position, "Empty parentheses"));
        }
    }

    let mut inner = parse_expression(state, 0).inspect_err(|_| state.restore(start))?;
    if matches!(state.peek(), Some(Token::RParen(_))) {
        state.advance();
    } else {
        let position = open_position.merge(inner.position());
        inner
            .messages_mut()
            .push(Message::error("Missing closing ')'", &position));
    }
    Ok(inner)
}

fn array_element(state: &mut ParseState) -> ParseResult<Option<UntypedExpression>> {
    parse_expression(state, 0).map(Some)
}

fn call_argument(state: &mut ParseState) -> ParseResult<Option<UntypedExpression>> {
    if optional(expect_underscore()).parse(state)?.is_some() {
        return Ok(None);
    }
    parse_expression(state, 0).map(Some)
}

/// array := "[" (expression ("," expression)*)? "]"
fn array(state: &mut ParseState) -> ParseResult<UntypedExpression> {
    let open = expect_lbracket().parse(state)?.pos();
    let list = parse_list(state, &ListSyntax::array(), &open, array_element);

    Ok(Expression::Array(Array {
        elements: list.items.into_iter().flatten().collect(),
        position: open.merge(&list.end),
        messages: list.messages,
        info: (),
    }))
}

/// negation := "-" expression
fn negation(state: &mut ParseState) -> ParseResult<UntypedExpression> {
    let minus = expect_minus().parse(state)?;
    let minus_position = minus.pos();
    let after_minus = state.position();

    match parse_expression(state, UNARY_PRECEDENCE) {
        Ok(operand) => {
            let position = minus_position.merge(operand.position());
            Ok(operator_call("neg", minus_position, vec![Some(operand)], position))
        }
        Err(_) => {
            state.restore(after_minus);
            Ok(unrecognized(
                vec![minus],
                minus_position,
                "Expected expression after '-'",
            ))
        }
    }
}

/// call := expression "(" (argument ("," argument)*)? ")"
/// argument := "_" | expression
fn call(state: &mut ParseState, callee: UntypedExpression) -> UntypedExpression {
    let open = match state.advance() {
        Some(token) => token.pos(),
        None => return callee,
    };
    let list = parse_list(state, &ListSyntax::arguments(), &open, call_argument);

    Expression::FunctionCall(FunctionCall {
        position: callee.position().merge(&list.end),
        callee: Box::new(callee),
        args: list.items,
        messages: list.messages,
        info: (),
    })
}

/// access := expression "[" expression "]"
/// slice := expression "[" expression? ":" expression? (":" expression?)? "]"
fn access(state: &mut ParseState, target: UntypedExpression) -> UntypedExpression {
    let open = match state.advance() {
        Some(token) => token.pos(),
        None => return target,
    };
    let list = parse_list(state, &ListSyntax::slice(), &open, array_element);
    let position = target.position().merge(&list.end);
    let mut messages = list.messages;

    let mut call = if list.separators == 0 {
        match list.items.into_iter().flatten().next() {
            Some(index) => operator_call("[]", open, vec![Some(target), Some(index)], position),
            None => {
                messages.push(Message::error("Expected expression after '['", &open));
                operator_call("[]", open, vec![Some(target)], position)
            }
        }
    } else {
        let mut components = list.items;
        if components.len() > 3 {
            messages.push(Message::error("Too many slice components", &position));
            components.truncate(3);
        }
        components.resize_with(3, || None);

        let mut args = vec![Some(target)];
        args.extend(components.into_iter().map(|component| {
            Some(component.unwrap_or_else(|| {
                Expression::None(NoneLiteral {
                    position: open.clone(),
                    messages: vec![],
                    info: (),
                })
            }))
        }));
        operator_call("[:]", open.clone(), args, position)
    };

    call.messages_mut().extend(messages);
    call
}

/// binary := expression operator expression
fn binary(state: &mut ParseState, left: UntypedExpression, operator: Operator) -> UntypedExpression {
    let operator_position = match state.advance() {
        Some(token) => token.pos(),
        None => return left,
    };
    let after_operator = state.position();

    match parse_expression(state, operator.precedence) {
        Ok(right) => {
            let position = left.position().merge(right.position());
            operator_call(
                operator.symbol,
                operator_position,
                vec![Some(left), Some(right)],
                position,
            )
        }
        Err(_) => {
            state.restore(after_operator);
            let position = left.position().merge(&operator_position);
            let mut call = operator_call(
                operator.symbol,
                operator_position.clone(),
                vec![Some(left)],
                position,
            );
            call.messages_mut().push(Message::error(
                format!("Expected expression after '{}'", operator.symbol),
                &operator_position,
            ));
            call
        }
    }
}
