use serde_json::Value;

use crate::RecordGraph;

/// Remove null values, empty arrays and objects that end up empty.
///
/// `0`, `false` and `""` are kept. Arrays are walked element by element but
/// never lose elements, so an object inside an array that strips down to
/// `{}` stays as `{}`. The result is a new graph and the function is
/// idempotent.
pub fn strip_empty(input: &RecordGraph) -> RecordGraph {
    let mut out = RecordGraph::new();

    for (key, value) in input {
        match value {
            Value::Null => {}
            Value::Array(items) if items.is_empty() => {}
            Value::Array(items) => {
                out.insert(
                    key.clone(),
                    Value::Array(items.iter().map(strip_empty_value).collect()),
                );
            }
            Value::Object(map) => {
                let nested = strip_empty(map);
                if !nested.is_empty() {
                    out.insert(key.clone(), Value::Object(nested));
                }
            }
            scalar => {
                out.insert(key.clone(), scalar.clone());
            }
        }
    }

    out
}

/// [`strip_empty`] for a value that may not be an object.
///
/// Objects and arrays are cleaned the same way as nested values; scalars,
/// including a root `null`, come back unchanged.
pub fn strip_empty_value(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(strip_empty(map)),
        Value::Array(items) => Value::Array(items.iter().map(strip_empty_value).collect()),
        other => other.clone(),
    }
}
