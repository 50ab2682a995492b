//! Type checking of complete programs against the standard library

use pretty_assertions::assert_eq;
use sift::types::Type;
use sift::{Scope, compile};

fn root_type(source: &str) -> String {
    let compilation = compile(source, &Scope::standard());
    assert!(
        compilation.compiled,
        "compilation failed: {:?}",
        compilation.messages
    );
    compilation
        .expression
        .and_then(|expression| expression.result_type().cloned())
        .map(|ty| ty.pretty())
        .expect("compiled program has a type")
}

fn errors(source: &str) -> Vec<String> {
    compile(source, &Scope::standard())
        .messages
        .into_iter()
        .filter(|message| message.is_error())
        .map(|message| message.text)
        .collect()
}

// ===== Literals and arrays =====

#[test]
fn check_literals() {
    assert_eq!(root_type("1"), "Integer");
    assert_eq!(root_type("1.5"), "Float");
    assert_eq!(root_type("\"s\""), "String");
    assert_eq!(root_type("true"), "Boolean");
    assert_eq!(root_type("none"), "None");
}

#[test]
fn check_arrays() {
    assert_eq!(root_type("[]"), "[]");
    assert_eq!(root_type("[1, 2]"), "[Integer]");
    assert_eq!(root_type("[1, 2.5]"), "[Float]");
    assert_eq!(root_type("[1, \"a\"]"), "[Integer | String]");
    assert_eq!(root_type("[true, 1]"), "[Boolean | Integer]");
    assert_eq!(root_type("[[1], []]"), "[[Integer]]");
}

// ===== Operators =====

#[test]
fn check_arithmetic() {
    assert_eq!(root_type("5 + 10"), "Integer");
    assert_eq!(root_type("1.5 + 5"), "Float");
    assert_eq!(root_type("5 + 1.5"), "Float");
    assert_eq!(root_type("-2 ** 3"), "Integer");
}

#[test]
fn check_comparisons() {
    assert_eq!(root_type("1 < 2.5"), "Boolean");
    assert_eq!(root_type("\"a\" = \"b\""), "Boolean");
    assert_eq!(root_type("1 in [1, 2, 3]"), "Boolean");
    assert_eq!(root_type("1 in []"), "Boolean");
}

#[test]
fn check_access() {
    assert_eq!(root_type("[1, 2][0]"), "Integer | None");
    assert_eq!(root_type("[1, 2][0:1]"), "[Integer]");
    assert_eq!(root_type("(1 .. 10)[::-1]"), "[Integer]");
}

#[test]
fn check_boolean_accepts_numbers() {
    assert_eq!(root_type("if(1, 1, 2)"), "Integer");
    assert_eq!(root_type("if(true, 1, 2.5)"), "Float");
}

// ===== Generics and partial application =====

#[test]
fn check_higher_order_functions() {
    assert_eq!(root_type("map(sin, [1, 2, 3])"), "[Float]");
    assert_eq!(root_type("map(string, [1, 2])"), "[String]");
    assert_eq!(root_type("filter(not, [true, false])"), "[Boolean]");
}

#[test]
fn check_partial_application() {
    assert_eq!(root_type("take(2)"), "([T]) -> [T]");
    assert_eq!(root_type("map(sin)"), "([Float]) -> [Float]");
    assert_eq!(root_type("take(2)([1, 2, 3])"), "[Integer]");
}

#[test]
fn check_placeholder_arguments() {
    assert_eq!(root_type("take(_, [1, 2, 3])"), "(Integer) -> [Integer]");
    assert_eq!(root_type("if(_, \"a\", \"b\")"), "(Boolean) -> String");
}

#[test]
fn check_composition() {
    assert_eq!(root_type("sin . cos"), "(Float) -> Float");
    assert_eq!(root_type("(sin & string)(1)"), "String");
}

#[test]
fn check_generic_results() {
    assert_eq!(root_type("sum([1, 2])"), "Integer");
    assert_eq!(root_type("sum([1.5, 2])"), "Float");
    assert_eq!(root_type("head([\"a\"])"), "None | String");
    assert_eq!(root_type("take(3, count(0))"), "[Integer]");
}

#[test]
fn check_user_bindings() {
    let scope = Scope::standard().with_value(
        "limit",
        Type::Integer,
        sift::interpreter::Value::Integer(3),
    );
    let compilation = compile("take(limit, count(0))", &scope);
    assert!(compilation.compiled);
}

// ===== Diagnostics =====

#[test]
fn unresolved_identifier() {
    assert_eq!(errors("nope + 1"), vec!["Unresolved identifier 'nope'"]);
}

#[test]
fn argument_mismatch() {
    assert_eq!(
        errors("\"a\" + 1"),
        vec!["Expected argument of type T: Float, found String"]
    );
    assert_eq!(
        errors("upper(1)"),
        vec!["Expected argument of type String, found Integer"]
    );
}

#[test]
fn too_many_arguments() {
    assert_eq!(
        errors("sin(1, 2)"),
        vec!["Too many arguments: expected 1, found 2"]
    );
}

#[test]
fn not_a_function() {
    assert_eq!(errors("1(2)"), vec!["Cannot call a value of type Integer"]);
}

#[test]
fn errors_are_collected_across_siblings() {
    assert_eq!(
        errors("[a, b]"),
        vec!["Unresolved identifier 'a'", "Unresolved identifier 'b'"]
    );
}

#[test]
fn parse_errors_fail_compilation() {
    let compilation = compile("[1, 2 3]", &Scope::standard());
    assert!(!compilation.compiled);
    assert_eq!(
        compilation
            .messages
            .iter()
            .filter(|message| message.text == "Missing separator between items")
            .count(),
        1
    );
}

#[test]
fn lexer_errors_fail_compilation() {
    let compilation = compile("1 $ 2", &Scope::standard());
    assert!(!compilation.compiled);
    assert!(compilation.tokens.is_empty());
    assert!(compilation.expression.is_none());
    assert_eq!(compilation.messages.len(), 1);
}
