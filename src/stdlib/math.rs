use crate::interpreter::{RuntimeError, Value};
use crate::types::Type;

use super::{Library, fun, numeric};

fn unary_float(library: &mut Library, name: &'static str, op: fn(f64) -> f64) {
    library.function(name, fun(vec![Type::Float], Type::Float), move |args| {
        Ok(Value::Float(op(args[0].force()?.as_f64(name)?)))
    });
}

/// Round with `op` and convert to an integer, failing outside the `i64` range.
fn rounding(library: &mut Library, name: &'static str, op: fn(f64) -> f64) {
    library.function(name, fun(vec![Type::Float], Type::Integer), move |args| {
        let rounded = op(args[0].force()?.as_f64(name)?);
        if rounded.is_nan() {
            return Err(RuntimeError::invalid(name, "not a number"));
        }
        if rounded < i64::MIN as f64 || rounded >= i64::MAX as f64 {
            return Err(RuntimeError::overflow(name));
        }
        Ok(Value::Integer(rounded as i64))
    });
}

pub(super) fn register(library: &mut Library) {
    unary_float(library, "sin", f64::sin);
    unary_float(library, "cos", f64::cos);
    unary_float(library, "tan", f64::tan);
    unary_float(library, "sqrt", f64::sqrt);
    unary_float(library, "exp", f64::exp);
    unary_float(library, "ln", f64::ln);

    library.function("abs", fun(vec![numeric()], numeric()), |args| {
        match args[0].force()? {
            Value::Integer(i) => i
                .checked_abs()
                .map(Value::Integer)
                .ok_or_else(|| RuntimeError::overflow("abs")),
            other => Ok(Value::Float(other.as_f64("abs")?.abs())),
        }
    });

    rounding(library, "floor", f64::floor);
    rounding(library, "ceil", f64::ceil);
    rounding(library, "round", f64::round);

    library.constant("pi", Type::Float, Value::Float(std::f64::consts::PI));
    library.constant("e", Type::Float, Value::Float(std::f64::consts::E));
}
