//! Arithmetic on JSON numbers for `na` components.
//!
//! Integers stay integers while the result fits in `i64`; anything else is
//! computed in `f64`.

use serde_json::Number;

use crate::error::{Error, Result};

pub(crate) fn add(a: &Number, b: &Number) -> Result<Number> {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        if let Some(sum) = x.checked_add(y) {
            return Ok(sum.into());
        }
    }
    let sum = to_f64(a)? + to_f64(b)?;
    Number::from_f64(sum).ok_or_else(|| Error::Validation(format!("number add overflowed to {sum}")))
}

pub(crate) fn negate(n: &Number) -> Result<Number> {
    if let Some(x) = n.as_i64() {
        if let Some(neg) = x.checked_neg() {
            return Ok(neg.into());
        }
    }
    let neg = -to_f64(n)?;
    Number::from_f64(neg).ok_or_else(|| Error::Validation(format!("cannot negate {n}")))
}

fn to_f64(n: &Number) -> Result<f64> {
    n.as_f64()
        .ok_or_else(|| Error::Validation(format!("number {n} is not representable")))
}
