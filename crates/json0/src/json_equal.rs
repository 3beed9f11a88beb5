//! Deep equality for snapshot values.
//!
//! Numbers compare by numeric value, so `12` and `12.0` are equal, and
//! object key order is ignored.

use serde_json::{Number, Value};

/// Performs a deep equality check between two JSON values.
///
/// ```
/// use serde_json::json;
/// use json0::json_equal::deep_equal;
///
/// assert!(deep_equal(&json!({"a": [1, 2.0]}), &json!({"a": [1.0, 2]})));
/// assert!(!deep_equal(&json!([1, 2]), &json!([2, 1])));
/// ```
pub fn deep_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Number(a), Value::Number(b)) => number_equal(a, b),
        (Value::String(a), Value::String(b)) => a == b,

        (Value::Array(arr_a), Value::Array(arr_b)) => {
            arr_a.len() == arr_b.len() && arr_a.iter().zip(arr_b).all(|(x, y)| deep_equal(x, y))
        }

        (Value::Object(obj_a), Value::Object(obj_b)) => {
            if obj_a.len() != obj_b.len() {
                return false;
            }
            obj_a.iter().all(|(key, val_a)| match obj_b.get(key) {
                Some(val_b) => deep_equal(val_a, val_b),
                None => false,
            })
        }

        _ => false,
    }
}

fn number_equal(a: &Number, b: &Number) -> bool {
    if a == b {
        return true;
    }
    match (a.as_i64(), b.as_i64()) {
        (Some(x), Some(y)) => x == y,
        _ => match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_primitives() {
        assert!(deep_equal(&json!(null), &json!(null)));
        assert!(deep_equal(&json!("x"), &json!("x")));
        assert!(!deep_equal(&json!(true), &json!(1)));
        assert!(!deep_equal(&json!(null), &json!(false)));
    }

    #[test]
    fn test_integer_and_float_encodings_match() {
        assert!(deep_equal(&json!(12), &json!(12.0)));
        assert!(!deep_equal(&json!(12), &json!(12.5)));
    }

    #[test]
    fn test_object_key_order_is_ignored() {
        let a: Value = serde_json::from_str(r#"{"x": 1, "y": [true]}"#).unwrap();
        let b: Value = serde_json::from_str(r#"{"y": [true], "x": 1}"#).unwrap();
        assert!(deep_equal(&a, &b));
        assert!(!deep_equal(&a, &json!({"x": 1})));
    }
}
