use std::rc::Rc;

use crate::ast::{Expression, TypedExpression};

use super::error::RuntimeError;
use super::scope::EvaluationScope;
use super::value::{EvalResult, LazyValue, Sequence, Value};

/// Evaluate a typed expression without forcing anything.
///
/// Literals come back already forced. Every other node yields a deferred
/// computation that runs when a consumer forces it.
pub fn evaluate_expression(scope: &EvaluationScope, expression: &TypedExpression) -> LazyValue {
    match expression {
        Expression::Identifier(identifier) => scope.resolve(&identifier.name).unwrap_or_else(|| {
            LazyValue::failed(RuntimeError::UnboundIdentifier {
                name: identifier.name.clone(),
            })
        }),
        Expression::Integer(integer) => LazyValue::from_value(Value::Integer(integer.value)),
        Expression::Float(float) => LazyValue::from_value(Value::Float(float.value)),
        Expression::String(string) => LazyValue::from_value(Value::string(&string.value)),
        Expression::Boolean(boolean) => LazyValue::from_value(Value::Boolean(boolean.value)),
        Expression::None(_) => LazyValue::from_value(Value::None),
        Expression::Array(array) => {
            let elements: Rc<[TypedExpression]> = array.elements.clone().into();
            LazyValue::from_value(Value::Array(array_sequence(scope.clone(), elements)))
        }
        Expression::FunctionCall(call) => {
            let callee = evaluate_expression(scope, &call.callee);
            let args: Vec<Option<LazyValue>> = call
                .args
                .iter()
                .map(|arg| arg.as_ref().map(|arg| evaluate_expression(scope, arg)))
                .collect();
            LazyValue::new(move || apply(&callee.force()?, args))
        }
        Expression::Unrecognized(_) => LazyValue::failed(RuntimeError::Unrecognized),
    }
}

/// The elements of an array literal, evaluated left to right on demand.
/// Each traversal evaluates the element expressions afresh.
fn array_sequence(scope: EvaluationScope, elements: Rc<[TypedExpression]>) -> Sequence {
    Sequence::new(move || {
        let scope = scope.clone();
        let elements = Rc::clone(&elements);
        Box::new(
            (0..elements.len()).map(move |index| Ok(evaluate_expression(&scope, &elements[index]))),
        )
    })
}

/// Apply `callee` to possibly partial arguments.
pub fn apply(callee: &Value, args: Vec<Option<LazyValue>>) -> EvalResult {
    match callee {
        Value::Function(function) => function.apply(args),
        other => Err(RuntimeError::NotAFunction {
            found: other.type_name().to_string(),
        }),
    }
}
