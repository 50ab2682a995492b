use std::cmp::Ordering;

use crate::interpreter::{EvalResult, RuntimeError, Value};
use crate::types::Type;

use super::{Library, fun, numeric, t};

type IntegerOp = fn(i64, i64) -> Result<i64, RuntimeError>;
type FloatOp = fn(f64, f64) -> f64;

/// Integers stay integers when both operands are integers; anything else
/// is computed in floating point.
fn numeric_op(name: &str, a: &Value, b: &Value, int_op: IntegerOp, float_op: FloatOp) -> EvalResult {
    match (a, b) {
        (Value::Integer(x), Value::Integer(y)) => int_op(*x, *y).map(Value::Integer),
        _ => Ok(Value::Float(float_op(a.as_f64(name)?, b.as_f64(name)?))),
    }
}

pub(super) fn add(a: &Value, b: &Value) -> EvalResult {
    numeric_op(
        "+",
        a,
        b,
        |x, y| x.checked_add(y).ok_or_else(|| RuntimeError::overflow("+")),
        |x, y| x + y,
    )
}

pub(super) fn multiply(a: &Value, b: &Value) -> EvalResult {
    numeric_op(
        "*",
        a,
        b,
        |x, y| x.checked_mul(y).ok_or_else(|| RuntimeError::overflow("*")),
        |x, y| x * y,
    )
}

fn subtract(a: &Value, b: &Value) -> EvalResult {
    numeric_op(
        "-",
        a,
        b,
        |x, y| x.checked_sub(y).ok_or_else(|| RuntimeError::overflow("-")),
        |x, y| x - y,
    )
}

/// Integer division truncates toward zero.
fn divide(a: &Value, b: &Value) -> EvalResult {
    numeric_op(
        "/",
        a,
        b,
        |x, y| match y {
            0 => Err(RuntimeError::DivisionByZero),
            _ => x.checked_div(y).ok_or_else(|| RuntimeError::overflow("/")),
        },
        |x, y| x / y,
    )
}

fn remainder(a: &Value, b: &Value) -> EvalResult {
    numeric_op(
        "%",
        a,
        b,
        |x, y| match y {
            0 => Err(RuntimeError::DivisionByZero),
            _ => x.checked_rem(y).ok_or_else(|| RuntimeError::overflow("%")),
        },
        |x, y| x % y,
    )
}

fn power(a: &Value, b: &Value) -> EvalResult {
    numeric_op(
        "**",
        a,
        b,
        |x, y| {
            let exponent = u32::try_from(y)
                .map_err(|_| RuntimeError::invalid("**", "negative integer exponent"))?;
            x.checked_pow(exponent)
                .ok_or_else(|| RuntimeError::overflow("**"))
        },
        f64::powf,
    )
}

fn negate(value: &Value) -> EvalResult {
    match value {
        Value::Integer(i) => i
            .checked_neg()
            .map(Value::Integer)
            .ok_or_else(|| RuntimeError::overflow("neg")),
        other => Ok(Value::Float(-other.as_f64("neg")?)),
    }
}

/// Integers compare exactly; mixed operands compare as floats. `None` when
/// a NaN is involved.
pub(super) fn compare_numbers(
    name: &str,
    a: &Value,
    b: &Value,
) -> Result<Option<Ordering>, RuntimeError> {
    match (a, b) {
        (Value::Integer(x), Value::Integer(y)) => Ok(Some(x.cmp(y))),
        _ => Ok(a.as_f64(name)?.partial_cmp(&b.as_f64(name)?)),
    }
}

/// Deep structural equality. Arrays are forced element by element.
pub(crate) fn values_equal(a: &Value, b: &Value) -> Result<bool, RuntimeError> {
    match (a, b) {
        (Value::Integer(x), Value::Integer(y)) => Ok(x == y),
        (Value::Integer(_) | Value::Float(_), Value::Integer(_) | Value::Float(_)) => {
            Ok(a.as_f64("=")? == b.as_f64("=")?)
        }
        (Value::String(x), Value::String(y)) => Ok(x == y),
        (Value::Boolean(x), Value::Boolean(y)) => Ok(x == y),
        (Value::None, Value::None) => Ok(true),
        (Value::Array(xs), Value::Array(ys)) => {
            let mut xs = xs.iter();
            let mut ys = ys.iter();
            loop {
                match (xs.next(), ys.next()) {
                    (None, None) => return Ok(true),
                    (Some(x), Some(y)) => {
                        if !values_equal(&x?.force()?, &y?.force()?)? {
                            return Ok(false);
                        }
                    }
                    _ => return Ok(false),
                }
            }
        }
        (Value::Function(_), _) | (_, Value::Function(_)) => {
            Err(RuntimeError::invalid("=", "functions cannot be compared"))
        }
        _ => Ok(false),
    }
}

fn binary(library: &mut Library, name: &'static str, op: fn(&Value, &Value) -> EvalResult) {
    library.function(name, fun(vec![numeric(), numeric()], numeric()), move |args| {
        op(&args[0].force()?, &args[1].force()?)
    });
}

fn comparison(library: &mut Library, name: &'static str, accept: fn(Ordering) -> bool) {
    library.function(
        name,
        fun(vec![Type::Float, Type::Float], Type::Boolean),
        move |args| {
            let ordering = compare_numbers(name, &args[0].force()?, &args[1].force()?)?;
            Ok(Value::Boolean(ordering.is_some_and(accept)))
        },
    );
}

pub(super) fn register(library: &mut Library) {
    binary(library, "+", add);
    binary(library, "-", subtract);
    binary(library, "*", multiply);
    binary(library, "/", divide);
    binary(library, "%", remainder);
    binary(library, "**", power);

    library.function("neg", fun(vec![numeric()], numeric()), |args| {
        negate(&args[0].force()?)
    });

    comparison(library, "<", Ordering::is_lt);
    comparison(library, "<=", Ordering::is_le);
    comparison(library, ">", Ordering::is_gt);
    comparison(library, ">=", Ordering::is_ge);

    library.function("=", fun(vec![t(), t()], Type::Boolean), |args| {
        values_equal(&args[0].force()?, &args[1].force()?).map(Value::Boolean)
    });
    library.function("!=", fun(vec![t(), t()], Type::Boolean), |args| {
        values_equal(&args[0].force()?, &args[1].force()?).map(|equal| Value::Boolean(!equal))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_arithmetic_stays_integer() {
        assert!(matches!(add(&Value::Integer(2), &Value::Integer(3)), Ok(Value::Integer(5))));
        assert!(matches!(divide(&Value::Integer(7), &Value::Integer(2)), Ok(Value::Integer(3))));
    }

    #[test]
    fn test_mixed_arithmetic_promotes() {
        let Ok(Value::Float(sum)) = add(&Value::Float(1.5), &Value::Integer(5)) else {
            panic!("expected a float");
        };
        assert_eq!(sum, 6.5);
    }

    #[test]
    fn test_integer_errors() {
        assert_eq!(
            divide(&Value::Integer(1), &Value::Integer(0)).unwrap_err(),
            RuntimeError::DivisionByZero
        );
        assert_eq!(
            remainder(&Value::Integer(1), &Value::Integer(0)).unwrap_err(),
            RuntimeError::DivisionByZero
        );
        assert!(matches!(
            add(&Value::Integer(i64::MAX), &Value::Integer(1)),
            Err(RuntimeError::Overflow { .. })
        ));
        assert!(matches!(
            negate(&Value::Integer(i64::MIN)),
            Err(RuntimeError::Overflow { .. })
        ));
    }

    #[test]
    fn test_power() {
        assert!(matches!(power(&Value::Integer(2), &Value::Integer(10)), Ok(Value::Integer(1024))));
        assert!(power(&Value::Integer(2), &Value::Integer(-1)).is_err());
    }

    #[test]
    fn test_equality_across_numbers() {
        assert!(values_equal(&Value::Integer(1), &Value::Float(1.0)).unwrap());
        assert!(!values_equal(&Value::Integer(1), &Value::string("1")).unwrap());
    }
}
