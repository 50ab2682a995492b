//! # Type Checker
//!
//! Rebuilds an untyped expression tree with the result type of every node.
//! Checking is best effort: a defect becomes an error message on the node
//! it concerns, the node's type becomes `None` where it cannot be known,
//! and every sibling is still visited.
//!
//! ## Calls
//!
//! A call fills the callee's parameter slots from left to right, with `_`
//! placeholders leaving a slot open. For each supplied argument the
//! evidence it gives for generic variables is merged into a [`GenericMap`]
//! and the argument is checked against its parameter, both as declared and
//! as specialized by the evidence gathered so far. The call's type is the
//! specialized return type when every slot is filled, and otherwise a
//! function over the open slots.

use crate::ast::{
    Array, Boolean, Expression, Float, FunctionCall, Identifier, Integer, NoneLiteral,
    StringLiteral, TypedExpression, Unrecognized, UntypedExpression,
};
use crate::message::Message;

use super::env::TypedScope;
use super::error::TypeError;
use super::subst::{GenericMap, create_generic_map};
use super::subtype::{is_subtype, make_union_type};
use super::ty::Type;

pub fn type_expression(scope: &TypedScope, expression: &UntypedExpression) -> TypedExpression {
    match expression {
        Expression::Identifier(identifier) => type_identifier(scope, identifier),
        Expression::Integer(node) => Expression::Integer(Integer {
            value: node.value,
            position: node.position.clone(),
            messages: node.messages.clone(),
            info: Some(Type::Integer),
        }),
        Expression::Float(node) => Expression::Float(Float {
            value: node.value,
            position: node.position.clone(),
            messages: node.messages.clone(),
            info: Some(Type::Float),
        }),
        Expression::String(node) => Expression::String(StringLiteral {
            value: node.value.clone(),
            position: node.position.clone(),
            messages: node.messages.clone(),
            info: Some(Type::String),
        }),
        Expression::Boolean(node) => Expression::Boolean(Boolean {
            value: node.value,
            position: node.position.clone(),
            messages: node.messages.clone(),
            info: Some(Type::Boolean),
        }),
        Expression::None(node) => Expression::None(NoneLiteral {
            position: node.position.clone(),
            messages: node.messages.clone(),
            info: Some(Type::None),
        }),
        Expression::Array(array) => type_array(scope, array),
        Expression::FunctionCall(call) => type_call(scope, call),
        Expression::Unrecognized(node) => Expression::Unrecognized(Unrecognized {
            tokens: node.tokens.clone(),
            position: node.position.clone(),
            messages: node.messages.clone(),
            info: None,
        }),
    }
}

fn type_identifier(scope: &TypedScope, identifier: &Identifier<()>) -> TypedExpression {
    let mut messages = identifier.messages.clone();
    let info = scope.lookup(&identifier.name).cloned();
    if info.is_none() {
        messages.push(
            TypeError::UnresolvedIdentifier {
                name: identifier.name.clone(),
                span: identifier.position.clone(),
            }
            .into(),
        );
    }

    Expression::Identifier(Identifier {
        name: identifier.name.clone(),
        position: identifier.position.clone(),
        messages,
        info,
    })
}

fn type_array(scope: &TypedScope, array: &Array<()>) -> TypedExpression {
    let elements: Vec<TypedExpression> = array
        .elements
        .iter()
        .map(|element| type_expression(scope, element))
        .collect();

    let known: Vec<Type> = elements
        .iter()
        .filter_map(|element| element.result_type().cloned())
        .collect();
    let ty = if known.is_empty() {
        Type::empty_array()
    } else {
        Type::array(make_union_type(known))
    };

    Expression::Array(Array {
        elements,
        position: array.position.clone(),
        messages: array.messages.clone(),
        info: Some(ty),
    })
}

fn type_call(scope: &TypedScope, call: &FunctionCall<()>) -> TypedExpression {
    let callee = type_expression(scope, &call.callee);
    let mut args: Vec<Option<TypedExpression>> = call
        .args
        .iter()
        .map(|arg| arg.as_ref().map(|arg| type_expression(scope, arg)))
        .collect();
    let mut messages = call.messages.clone();

    let info = match callee.result_type() {
        // already reported where the callee failed
        None => None,
        Some(Type::Function {
            args: parameters,
            ret,
        }) => Some(apply_arguments(
            parameters,
            ret,
            &mut args,
            &mut messages,
            call,
        )),
        Some(other) => {
            messages.push(
                TypeError::NotAFunction {
                    found: other.clone(),
                    span: call.callee.position().clone(),
                }
                .into(),
            );
            None
        }
    };

    tracing::trace!(
        callee = ?callee.result_type().map(Type::pretty),
        result = ?info.as_ref().map(Type::pretty),
        "typed call"
    );

    Expression::FunctionCall(FunctionCall {
        callee: Box::new(callee),
        args,
        position: call.position.clone(),
        messages,
        info,
    })
}

/// The partial-application state machine. Returns the type of the call.
fn apply_arguments(
    parameters: &[Type],
    ret: &Type,
    args: &mut [Option<TypedExpression>],
    messages: &mut Vec<Message>,
    call: &FunctionCall<()>,
) -> Type {
    if args.len() > parameters.len() {
        messages.push(
            TypeError::TooManyArguments {
                expected: parameters.len(),
                found: args.len(),
                span: call.position.clone(),
            }
            .into(),
        );
    }

    let mut filled = vec![false; parameters.len()];
    let mut generic_map = GenericMap::new();

    for (slot, (parameter, arg)) in parameters.iter().zip(args.iter_mut()).enumerate() {
        let Some(arg) = arg else {
            continue;
        };
        filled[slot] = true;

        let Some(found) = arg.result_type().cloned() else {
            continue;
        };
        // a mismatching argument is no evidence for the generics
        if is_subtype(parameter, &found) {
            generic_map.merge(create_generic_map(parameter, &found));
        }

        let specialized = generic_map.apply(parameter);
        if !is_subtype(parameter, &found) || !is_subtype(&specialized, &found) {
            let span = arg.position().clone();
            arg.messages_mut().push(
                TypeError::ArgumentMismatch {
                    expected: specialized,
                    found,
                    span,
                }
                .into(),
            );
        }
    }

    let open: Vec<Type> = parameters
        .iter()
        .zip(&filled)
        .filter(|(_, filled)| !**filled)
        .map(|(parameter, _)| generic_map.apply(parameter))
        .collect();
    let ret = generic_map.apply(ret);

    if open.is_empty() {
        ret
    } else {
        Type::function(open, ret)
    }
}
