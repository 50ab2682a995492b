use pretty_assertions::assert_eq;
use sift::ast::{Expression, UntypedExpression};
use sift::fmt::format_expression;
use sift::lexer::{Token, tokenize};
use sift::parser::parse_tokens;

fn parse(source: &str) -> UntypedExpression {
    parse_tokens(tokenize(source).expect("lexing failed"))
}

fn shape(source: &str) -> String {
    let expression = parse(source);
    let messages = expression.all_messages();
    assert!(messages.is_empty(), "unexpected diagnostics: {messages:?}");
    format_expression(&expression)
}

fn errors(source: &str) -> Vec<String> {
    parse(source)
        .all_messages()
        .into_iter()
        .filter(|message| message.is_error())
        .map(|message| message.text)
        .collect()
}

// ===== Literals =====

#[test]
fn parse_integer() {
    let expression = parse("42");
    assert!(matches!(expression, Expression::Integer(ref i) if i.value == 42));
}

#[test]
fn parse_float() {
    let expression = parse("2.5");
    assert!(matches!(expression, Expression::Float(ref f) if f.value == 2.5));
}

#[test]
fn parse_string_unescapes() {
    let expression = parse(r#""line\n\"quoted\"""#);
    assert!(matches!(expression, Expression::String(ref s) if s.value == "line\n\"quoted\""));
}

#[test]
fn parse_booleans_and_none() {
    assert!(matches!(parse("true"), Expression::Boolean(ref b) if b.value));
    assert!(matches!(parse("false"), Expression::Boolean(ref b) if !b.value));
    assert!(matches!(parse("none"), Expression::None(_)));
}

#[test]
fn parse_integer_out_of_range() {
    assert_eq!(errors("99999999999999999999").len(), 1);
}

#[test]
fn parse_arrays() {
    assert_eq!(shape("[]"), "[]");
    assert_eq!(shape("[1, [2, 3], \"a\"]"), "[1, [2, 3], \"a\"]");
}

// ===== Operators =====

#[test]
fn operators_desugar_to_calls() {
    let Expression::FunctionCall(call) = parse("1 + 2") else {
        panic!("expected a call");
    };
    assert!(matches!(call.callee.as_ref(), Expression::Identifier(i) if i.name == "+"));
    assert_eq!(call.args.len(), 2);
}

#[test]
fn multiplication_binds_tighter_than_addition() {
    assert_eq!(shape("1 + 2 * 3"), "(1 + (2 * 3))");
    assert_eq!(shape("1 * 2 + 3"), "((1 * 2) + 3)");
}

#[test]
fn left_associative_operators() {
    assert_eq!(shape("1 - 2 - 3"), "((1 - 2) - 3)");
    assert_eq!(shape("8 / 4 / 2"), "((8 / 4) / 2)");
}

#[test]
fn right_associative_operators() {
    assert_eq!(shape("2 ** 3 ** 2"), "(2 ** (3 ** 2))");
    assert_eq!(shape("f . g . h"), "(f . (g . h))");
    assert_eq!(shape("f & g & h"), "(f & (g & h))");
}

#[test]
fn comparison_below_arithmetic() {
    assert_eq!(shape("1 + 1 < 3"), "((1 + 1) < 3)");
    assert_eq!(shape("1 < 2 = true"), "((1 < 2) = true)");
}

#[test]
fn membership_binds_loosest() {
    assert_eq!(shape("1 + 1 in 1 .. 3"), "((1 + 1) in (1 .. 3))");
}

#[test]
fn unary_minus() {
    assert_eq!(shape("-1"), "(-1)");
    assert_eq!(shape("-x * 2"), "((-x) * 2)");
    assert_eq!(shape("1 - -2"), "(1 - (-2))");
}

#[test]
fn parentheses_override_precedence() {
    assert_eq!(shape("(1 + 2) * 3"), "((1 + 2) * 3)");
}

// ===== Calls and access =====

#[test]
fn calls() {
    assert_eq!(shape("f()"), "f()");
    assert_eq!(shape("f(1, g(2))"), "f(1, g(2))");
    assert_eq!(shape("f(1)(2)"), "f(1)(2)");
}

#[test]
fn placeholder_arguments() {
    let Expression::FunctionCall(call) = parse("f(_, 2)") else {
        panic!("expected a call");
    };
    assert!(call.args[0].is_none());
    assert!(call.args[1].is_some());
}

#[test]
fn index_and_slice() {
    assert_eq!(shape("xs[0]"), "xs[0]");
    assert_eq!(shape("xs[1:3]"), "xs[1:3:]");
    assert_eq!(shape("xs[::-1]"), "xs[::(-1)]");
    assert_eq!(shape("xs[i + 1]"), "xs[(i + 1)]");
}

#[test]
fn slice_pads_missing_components_with_none() {
    let Expression::FunctionCall(call) = parse("xs[1:]") else {
        panic!("expected a call");
    };
    assert!(matches!(call.callee.as_ref(), Expression::Identifier(i) if i.name == "[:]"));
    assert_eq!(call.args.len(), 4);
    assert!(matches!(call.args[2], Some(Expression::None(_))));
    assert!(matches!(call.args[3], Some(Expression::None(_))));
}

#[test]
fn access_binds_tighter_than_arithmetic() {
    assert_eq!(shape("xs[0] + 1"), "(xs[0] + 1)");
}

// ===== Recovery =====

#[test]
fn missing_separator_reported_once() {
    assert_eq!(errors("[1, 2 3]"), vec!["Missing separator between items"]);
}

#[test]
fn missing_separator_keeps_items() {
    let Expression::Array(array) = parse("[1 2]") else {
        panic!("expected an array");
    };
    assert_eq!(array.elements.len(), 2);
}

#[test]
fn unexpected_separator() {
    assert_eq!(errors("[1, , 2]"), vec!["Unexpected separator"]);
    assert_eq!(errors("f(1,)"), vec!["Unexpected separator"]);
}

#[test]
fn missing_closing_bracket() {
    assert_eq!(errors("[1, 2"), vec!["Missing closing ']'"]);
    assert_eq!(errors("f(1"), vec!["Missing closing ')'"]);
    assert_eq!(errors("(1 + 2"), vec!["Missing closing ')'"]);
}

#[test]
fn empty_parentheses() {
    assert_eq!(errors("()"), vec!["Empty parentheses"]);
}

#[test]
fn operator_without_right_operand() {
    assert_eq!(errors("1 +"), vec!["Expected expression after '+'"]);
}

#[test]
fn trailing_expression() {
    assert_eq!(errors("1 2"), vec!["Unexpected expression after end of program"]);
}

#[test]
fn empty_program() {
    assert_eq!(errors(""), vec!["Empty program"]);
    assert_eq!(errors("-- only a comment"), vec!["Empty program"]);
}

#[test]
fn stray_tokens_become_unrecognized() {
    let expression = parse(")");
    assert!(expression.is_unrecognized());
    assert_eq!(errors(")"), vec!["Unexpected ')'"]);
}

// ===== Consumed tokens =====

#[test]
fn nodes_recover_their_tokens() {
    let tokens = tokenize("f(1, 2) + xs[0]").unwrap();
    let expression = parse_tokens(tokens.clone());
    let texts = |node: &UntypedExpression| -> Vec<String> {
        node.consumed_tokens(&tokens)
            .into_iter()
            .map(Token::text)
            .collect()
    };

    assert_eq!(texts(&expression).len(), tokens.len());
    let Expression::FunctionCall(call) = &expression else {
        panic!("expected a call");
    };
    let (Some(left), Some(right)) = (&call.args[0], &call.args[1]) else {
        panic!("expected two operands");
    };
    assert_eq!(texts(left), vec!["f", "(", "1", ",", "2", ")"]);
    assert_eq!(texts(right), vec!["xs", "[", "0", "]"]);
}
