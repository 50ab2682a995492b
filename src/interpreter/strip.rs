use serde_json::{Number, Value as Json};

use super::EvaluationOptions;
use super::error::RuntimeError;
use super::value::Value;

/// Convert a value into plain JSON, forcing and draining arrays.
///
/// Functions have no plain form: `Ok(None)` is returned for them, and they
/// are left out when they occur inside an array. Non-finite floats become
/// `null`. With `array_limit` set, an array longer than the limit fails
/// instead of being drained forever.
pub fn strip_value(value: &Value, options: &EvaluationOptions) -> Result<Option<Json>, RuntimeError> {
    let plain = match value {
        Value::Integer(i) => Json::from(*i),
        Value::Float(f) => Number::from_f64(*f).map(Json::Number).unwrap_or(Json::Null),
        Value::String(s) => Json::String(s.to_string()),
        Value::Boolean(b) => Json::Bool(*b),
        Value::None => Json::Null,
        Value::Function(_) => return Ok(None),
        Value::Array(sequence) => {
            let mut items = vec![];
            for (count, element) in sequence.iter().enumerate() {
                if let Some(limit) = options.array_limit {
                    if count >= limit {
                        return Err(RuntimeError::LimitExceeded { limit });
                    }
                }
                let element = element?.force()?;
                if let Some(item) = strip_value(&element, options)? {
                    items.push(item);
                }
            }
            Json::Array(items)
        }
    };
    Ok(Some(plain))
}
