pub mod expression;

pub use expression::*;

use crate::types::Type;

/// Annotation carried by a type-checked node. `None` marks a node whose type
/// could not be determined.
pub type TypeInfo = Option<Type>;

/// Output of the parser.
pub type UntypedExpression = Expression<()>;

/// Output of the type checker.
pub type TypedExpression = Expression<TypeInfo>;

impl TypedExpression {
    pub fn result_type(&self) -> Option<&Type> {
        self.info().as_ref()
    }
}
