//! # Type Error Definitions
//!
//! Errors found while checking an expression tree:
//!
//! - An identifier is not bound in the scope (`UnresolvedIdentifier`)
//! - An argument does not fit its parameter (`ArgumentMismatch`)
//! - A call supplies more arguments than the callee takes (`TooManyArguments`)
//! - Something that is not a function is called (`NotAFunction`)
//!
//! None of these stop the checker. Each one is turned into an error
//! [`Message`] on the node it concerns and checking continues with the
//! siblings, so a single pass reports every defect.

use lachs::Span;
use thiserror::Error;

use crate::message::Message;

use super::ty::Type;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    #[error("Unresolved identifier '{name}'")]
    UnresolvedIdentifier { name: String, span: Span },

    #[error("Expected argument of type {expected}, found {found}")]
    ArgumentMismatch {
        expected: Type,
        found: Type,
        span: Span,
    },

    #[error("Too many arguments: expected {expected}, found {found}")]
    TooManyArguments {
        expected: usize,
        found: usize,
        span: Span,
    },

    #[error("Cannot call a value of type {found}")]
    NotAFunction { found: Type, span: Span },
}

impl TypeError {
    pub fn span(&self) -> &Span {
        match self {
            TypeError::UnresolvedIdentifier { span, .. } => span,
            TypeError::ArgumentMismatch { span, .. } => span,
            TypeError::TooManyArguments { span, .. } => span,
            TypeError::NotAFunction { span, .. } => span,
        }
    }
}

impl From<TypeError> for Message {
    fn from(err: TypeError) -> Self {
        Message::error(err.to_string(), err.span())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_render_types() {
        let err = TypeError::ArgumentMismatch {
            expected: Type::Float,
            found: Type::String,
            span: Span::default(),
        };
        let message: Message = err.into();
        assert!(message.is_error());
        assert_eq!(message.text, "Expected argument of type Float, found String");
    }

    #[test]
    fn test_unresolved_identifier_text() {
        let err = TypeError::UnresolvedIdentifier {
            name: "foo".to_string(),
            span: Span::default(),
        };
        assert_eq!(err.to_string(), "Unresolved identifier 'foo'");
    }
}
