use crate::interpreter::{RuntimeError, Value};
use crate::types::Type;

use super::{Library, array, fun, t};

/// Render a value as text. Strings nested in arrays are quoted; arrays are
/// drained, so an infinite array never finishes rendering.
fn render(value: &Value, nested: bool) -> Result<String, RuntimeError> {
    let text = match value {
        Value::String(s) if nested => format!("{:?}", &**s),
        Value::String(s) => s.to_string(),
        Value::Integer(i) => i.to_string(),
        Value::Float(f) => format!("{f:?}"),
        Value::Boolean(b) => b.to_string(),
        Value::None => "none".to_string(),
        Value::Function(function) => format!("<function {}>", function.name),
        Value::Array(sequence) => {
            let mut items = vec![];
            for element in sequence.iter() {
                items.push(render(&element?.force()?, true)?);
            }
            format!("[{}]", items.join(", "))
        }
    };
    Ok(text)
}

pub(super) fn register(library: &mut Library) {
    library.function(
        "join",
        fun(vec![Type::String, array(Type::String)], Type::String),
        |args| {
            let separator = args[0].force()?.as_str("join")?;
            let mut parts = vec![];
            for element in args[1].force()?.as_sequence("join")?.iter() {
                parts.push(element?.force()?.as_str("join")?.to_string());
            }
            Ok(Value::string(parts.join(&separator)))
        },
    );

    library.function("upper", fun(vec![Type::String], Type::String), |args| {
        Ok(Value::string(args[0].force()?.as_str("upper")?.to_uppercase()))
    });

    library.function("lower", fun(vec![Type::String], Type::String), |args| {
        Ok(Value::string(args[0].force()?.as_str("lower")?.to_lowercase()))
    });

    library.function("string", fun(vec![t()], Type::String), |args| {
        render(&args[0].force()?, false).map(Value::string)
    });

    library.function("length_of", fun(vec![Type::String], Type::Integer), |args| {
        let text = args[0].force()?.as_str("length_of")?;
        Ok(Value::Integer(text.chars().count() as i64))
    });
}
