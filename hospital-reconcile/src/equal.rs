use serde_json::{Number, Value};

/// Structural equality over JSON values.
///
/// Numbers compare by numeric value, so `10` and `10.0` are equal. Objects
/// are equal when they hold the same keys with deeply equal values; key
/// order does not matter. Values of different kinds are never equal.
pub fn deep_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Number(a), Value::Number(b)) => numbers_equal(a, b),
        (Value::String(a), Value::String(b)) => a == b,

        (Value::Array(arr_a), Value::Array(arr_b)) => {
            arr_a.len() == arr_b.len()
                && arr_a
                    .iter()
                    .zip(arr_b)
                    .all(|(item_a, item_b)| deep_equal(item_a, item_b))
        }

        (Value::Object(obj_a), Value::Object(obj_b)) => {
            obj_a.len() == obj_b.len()
                && obj_a.iter().all(|(key, val_a)| {
                    obj_b
                        .get(key)
                        .is_some_and(|val_b| deep_equal(val_a, val_b))
                })
        }

        _ => false,
    }
}

/// Integers compare exactly, floats by value. A float equals an integer only
/// when it has no fractional part and converts to that exact integer, so
/// precision lost beyond 2^53 still counts as a difference.
fn numbers_equal(a: &Number, b: &Number) -> bool {
    match (as_integer(a), as_integer(b)) {
        (Some(a), Some(b)) => a == b,
        (Some(int), None) => b.as_f64().is_some_and(|float| float_is_integer(float, int)),
        (None, Some(int)) => a.as_f64().is_some_and(|float| float_is_integer(float, int)),
        (None, None) => match (a.as_f64(), b.as_f64()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        },
    }
}

fn as_integer(number: &Number) -> Option<i128> {
    number
        .as_i64()
        .map(i128::from)
        .or_else(|| number.as_u64().map(i128::from))
}

fn float_is_integer(float: f64, int: i128) -> bool {
    // `as` saturates, so out-of-range floats cannot alias a real integer.
    float.is_finite() && float.fract() == 0.0 && float as i128 == int && int as f64 == float
}
