//! # Sift - a small lazy expression language
//!
//! Sift compiles and evaluates single expressions over numbers, strings,
//! booleans, lazy (possibly infinite) arrays and curried functions. It is
//! meant to be embedded: the host hands in a [`Scope`] of bindings and gets
//! back diagnostics and a plain JSON result.
//!
//! ## Pipeline Flow
//!
//! ```text
//! Source Code (String)
//!     ↓
//! [Lexer] → Token Stream
//!     ↓
//! [Parser] → Untyped Expression (ast::UntypedExpression)
//!     ↓
//! [Type Checker] → Typed Expression (ast::TypedExpression)
//!     ↓
//! [Evaluator] → Lazy Value (interpreter::LazyValue)
//!     ↓
//! [Strip] → Plain Result (serde_json::Value)
//! ```
//!
//! ## Key Design Decisions
//!
//! ### Diagnostics instead of failures
//! Lexing aside, no stage aborts on bad input. The parser recovers and the
//! checker keeps going, attaching [`message::Message`]s to the nodes they
//! concern. A program compiles when no message is an error and the root
//! type is known.
//!
//! ### Operators are functions
//! `a + b` parses to the call `+(a, b)`, `xs[i]` to `[](xs, i)`. The checker
//! and evaluator only ever see calls, and the standard library supplies
//! every operator as an ordinary curried function.
//!
//! ### Structural types
//! Types are compared by subtyping rather than unification: unions are
//! normalized, generic variables are resolved per call from the supplied
//! arguments, and a call with missing arguments types as a function over
//! the open slots.
//!
//! ### Laziness
//! Evaluation yields deferred values. Arrays are re-enterable lazy sequences,
//! so `take(3, count(0))` terminates and an array can be traversed twice.
//!
//! ## Module Structure
//!
//! - [`lexer`] - Tokenization using lachs
//! - [`parser`] - Precedence-climbing parser with error recovery
//! - [`ast`] - Expression tree, generic over its annotation
//! - [`types`] - Subtyping, generics and the type checker
//! - [`interpreter`] - Lazy evaluation and result stripping
//! - [`stdlib`] - Builtin functions and operators
//! - [`scope`] - Bindings shared by the checker and the evaluator
//! - [`message`] - Diagnostics
//! - [`fmt`] - Source rendering of expression trees
//!
//! ## Example
//!
//! ```text
//! sum(take(4, count(1))) * product(1 .. 3)   -- 60
//! ```
//!
//! ## Getting Started
//!
//! 1. Build the library scope once with [`Scope::standard()`]
//! 2. Compile with [`compile()`]
//! 3. Evaluate with [`evaluate()`], or do both with [`execute()`]

pub mod ast;
pub mod fmt;
pub mod interpreter;
pub mod lexer;
pub mod message;
pub mod parser;
pub mod scope;
pub mod stdlib;
pub mod types;

use ast::TypedExpression;
use interpreter::{EvaluationOptions, LazyValue, Value, evaluate_expression, strip_value};
use lexer::Token;
use message::{Message, has_errors};

pub use scope::Scope;

/// Outcome of [`compile`].
#[derive(Debug, Clone)]
pub struct CompilationResult {
    pub messages: Vec<Message>,
    pub tokens: Vec<Token>,
    pub expression: Option<TypedExpression>,
    pub compiled: bool,
}

/// Outcome of [`evaluate`].
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationResult {
    pub messages: Vec<Message>,
    pub result: Option<serde_json::Value>,
    pub evaluated: bool,
}

/// Outcome of [`execute`]: the messages of both stages.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionResult {
    pub messages: Vec<Message>,
    pub result: Option<serde_json::Value>,
    pub compiled: bool,
    pub evaluated: bool,
}

/// Tokenize, parse and type-check `source` against `scope`.
pub fn compile(source: &str, scope: &Scope) -> CompilationResult {
    let tokens = match lexer::tokenize(source) {
        Ok(tokens) => tokens,
        Err(message) => {
            tracing::debug!("tokenizing failed");
            return CompilationResult {
                messages: vec![message],
                tokens: vec![],
                expression: None,
                compiled: false,
            };
        }
    };
    tracing::debug!(tokens = tokens.len(), "tokenized");

    let untyped = parser::parse_tokens(tokens.clone());
    tracing::debug!("parsed");

    let typed = types::type_expression(&scope.typed(), &untyped);
    let messages = typed.all_messages();
    tracing::debug!(root = ?typed.result_type(), "typed");

    let compiled = !has_errors(&messages) && typed.result_type().is_some();
    if compiled {
        tracing::debug!("compilation succeeded");
    } else {
        tracing::debug!(messages = messages.len(), "compilation failed");
    }

    CompilationResult {
        messages,
        tokens,
        expression: Some(typed),
        compiled,
    }
}

/// Evaluate a compiled expression without forcing it.
pub fn evaluate_lazy(expression: &TypedExpression, scope: &Scope) -> LazyValue {
    evaluate_expression(&scope.evaluation(), expression)
}

/// Evaluate a compiled expression and strip the result to plain JSON.
///
/// Runtime failures are reported as a single "Internal error" message.
pub fn evaluate(
    expression: &TypedExpression,
    scope: &Scope,
    options: &EvaluationOptions,
) -> EvaluationResult {
    let stripped = evaluate_lazy(expression, scope)
        .force()
        .and_then(|value| strip_value(&value, options).map(|plain| (value, plain)));

    match stripped {
        Ok((_, Some(result))) => EvaluationResult {
            messages: vec![],
            result: Some(result),
            evaluated: true,
        },
        Ok((value, None)) => {
            let function = match &value {
                Value::Function(function) => function.name.clone(),
                other => other.type_name().to_string(),
            };
            tracing::debug!(%function, "function at the root");
            EvaluationResult {
                messages: vec![Message::error(
                    "Function values have no plain representation",
                    expression.position(),
                )],
                result: None,
                evaluated: false,
            }
        }
        Err(err) => {
            tracing::warn!(error = %err, "evaluation failed");
            EvaluationResult {
                messages: vec![Message::error(
                    format!("Internal error: {err}"),
                    expression.position(),
                )],
                result: None,
                evaluated: false,
            }
        }
    }
}

/// Compile and, when that succeeds, evaluate `source`.
pub fn execute(source: &str, scope: &Scope, options: &EvaluationOptions) -> ExecutionResult {
    let compilation = compile(source, scope);
    let mut messages = compilation.messages;

    let Some(expression) = compilation.expression.filter(|_| compilation.compiled) else {
        return ExecutionResult {
            messages,
            result: None,
            compiled: false,
            evaluated: false,
        };
    };

    let evaluation = evaluate(&expression, scope, options);
    messages.extend(evaluation.messages);

    ExecutionResult {
        messages,
        result: evaluation.result,
        compiled: true,
        evaluated: evaluation.evaluated,
    }
}
