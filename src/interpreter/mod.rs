//! # Lazy Evaluator
//!
//! Walks a typed expression tree and produces [`LazyValue`]s. Nothing is
//! computed until a consumer forces a value: array elements are produced
//! on demand from a re-enterable [`Sequence`], and function calls run when
//! their result is first needed. [`strip_value`] is the final consumer,
//! turning a value into plain JSON.

mod error;
mod eval;
mod scope;
mod strip;
mod value;

use serde::{Deserialize, Serialize};

pub use error::RuntimeError;
pub use eval::{apply, evaluate_expression};
pub use scope::EvaluationScope;
pub use strip::strip_value;
pub use value::{Elements, EvalResult, Function, Implementation, LazyValue, Sequence, Value};

/// Settings for turning an evaluated program into its plain result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationOptions {
    /// Upper bound on the number of elements drained from any one array.
    /// `None` drains without bound, which never ends for infinite arrays.
    pub array_limit: Option<usize>,
}

impl EvaluationOptions {
    pub fn with_array_limit(limit: usize) -> Self {
        EvaluationOptions {
            array_limit: Some(limit),
        }
    }
}
