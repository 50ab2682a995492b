use thiserror::Error;

/// A hard failure during evaluation.
///
/// A compiled program only meets these on conditions the checker cannot
/// see (division by zero, overflow, empty arrays) or when an evaluator
/// contract is broken. They are never turned into ordinary diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    #[error("a value of type {found} is not a function")]
    NotAFunction { found: String },

    #[error("too many arguments for '{name}': expected at most {expected}, found {found}")]
    TooManyArguments {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("division by zero")]
    DivisionByZero,

    #[error("integer overflow in '{operation}'")]
    Overflow { operation: String },

    #[error("'{operation}' of an empty array")]
    EmptyArray { operation: String },

    #[error("invalid argument for '{operation}': {detail}")]
    InvalidArgument { operation: String, detail: String },

    #[error("unbound identifier '{name}'")]
    UnboundIdentifier { name: String },

    #[error("unrecognized expression")]
    Unrecognized,

    #[error("value depends on itself")]
    CyclicEvaluation,

    #[error("array has more than {limit} elements")]
    LimitExceeded { limit: usize },
}

impl RuntimeError {
    pub fn invalid(operation: &str, detail: impl Into<String>) -> Self {
        RuntimeError::InvalidArgument {
            operation: operation.to_string(),
            detail: detail.into(),
        }
    }

    pub fn overflow(operation: &str) -> Self {
        RuntimeError::Overflow {
            operation: operation.to_string(),
        }
    }

    pub fn empty_array(operation: &str) -> Self {
        RuntimeError::EmptyArray {
            operation: operation.to_string(),
        }
    }
}
