use crate::interpreter::Value;
use crate::types::Type;

use super::{Library, fun, t};

pub(super) fn register(library: &mut Library) {
    // only the chosen branch is forced
    library.function(
        "if",
        fun(vec![Type::Boolean, t(), t()], t()),
        |args| {
            if args[0].force()?.truthy("if")? {
                args[1].force()
            } else {
                args[2].force()
            }
        },
    );

    library.function("not", fun(vec![Type::Boolean], Type::Boolean), |args| {
        Ok(Value::Boolean(!args[0].force()?.truthy("not")?))
    });

    library.function(
        "and",
        fun(vec![Type::Boolean, Type::Boolean], Type::Boolean),
        |args| {
            let result = args[0].force()?.truthy("and")? && args[1].force()?.truthy("and")?;
            Ok(Value::Boolean(result))
        },
    );

    library.function(
        "or",
        fun(vec![Type::Boolean, Type::Boolean], Type::Boolean),
        |args| {
            let result = args[0].force()?.truthy("or")? || args[1].force()?.truthy("or")?;
            Ok(Value::Boolean(result))
        },
    );
}
