//! JSON codec for json0 components.
//!
//! Each component is a plain object with a `p` path and the fields of
//! exactly one edit kind:
//!
//! | kind | fields |
//! |---|---|
//! | object insert / delete / replace | `oi`, `od`, `od`+`oi` |
//! | list insert / delete / replace | `li`, `ld`, `ld`+`li` |
//! | list move | `lm` |
//! | number add | `na` |
//! | subtype | `t`, `o` |
//! | legacy string insert / delete | `si`, `sd` |

use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::types::{Component, Edit, Op, Path, PathKey};

// ── Path helpers ──────────────────────────────────────────────────────────

pub fn encode_path(path: &[PathKey]) -> Value {
    Value::Array(
        path.iter()
            .map(|step| match step {
                PathKey::Key(k) => Value::String(k.clone()),
                PathKey::Index(i) => Value::from(*i),
            })
            .collect(),
    )
}

pub fn decode_path(v: &Value) -> Result<Path> {
    let steps = v
        .as_array()
        .ok_or_else(|| Error::Validation(format!("path must be an array, got {v}")))?;
    steps
        .iter()
        .map(|step| match step {
            Value::String(k) => Ok(PathKey::Key(k.clone())),
            Value::Number(n) => n
                .as_u64()
                .and_then(|i| usize::try_from(i).ok())
                .map(PathKey::Index)
                .ok_or_else(|| Error::Validation(format!("invalid path index {n}"))),
            other => Err(Error::Validation(format!("invalid path step {other}"))),
        })
        .collect()
}

fn take_string(obj: &Map<String, Value>, field: &str) -> Result<String> {
    match obj.get(field) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(Error::Validation(format!("{field} must be a string, got {other}"))),
        None => Err(Error::Validation(format!("missing {field}"))),
    }
}

fn field(obj: &Map<String, Value>, name: &str) -> Option<Value> {
    obj.get(name).cloned()
}

// ── Serialization ─────────────────────────────────────────────────────────

/// Serialize a component into its wire shape.
pub fn to_json(c: &Component) -> Value {
    let mut m = Map::new();
    m.insert("p".into(), encode_path(&c.path));
    match &c.edit {
        Edit::ObjectInsert { value } => {
            m.insert("oi".into(), value.clone());
        }
        Edit::ObjectDelete { old } => {
            m.insert("od".into(), old.clone());
        }
        Edit::ObjectReplace { old, new } => {
            m.insert("od".into(), old.clone());
            m.insert("oi".into(), new.clone());
        }
        Edit::ListInsert { value } => {
            m.insert("li".into(), value.clone());
        }
        Edit::ListDelete { old } => {
            m.insert("ld".into(), old.clone());
        }
        Edit::ListReplace { old, new } => {
            m.insert("ld".into(), old.clone());
            m.insert("li".into(), new.clone());
        }
        Edit::ListMove { to } => {
            m.insert("lm".into(), Value::from(*to));
        }
        Edit::NumberAdd { delta } => {
            m.insert("na".into(), Value::Number(delta.clone()));
        }
        Edit::Subtype { name, op } => {
            m.insert("t".into(), Value::String(name.clone()));
            m.insert("o".into(), op.clone());
        }
        Edit::StringInsert { text } => {
            m.insert("si".into(), Value::String(text.clone()));
        }
        Edit::StringDelete { text } => {
            m.insert("sd".into(), Value::String(text.clone()));
        }
    }
    Value::Object(m)
}

pub fn to_json_op(op: &[Component]) -> Value {
    Value::Array(op.iter().map(to_json).collect())
}

// ── Deserialization ───────────────────────────────────────────────────────

/// Parse a component from its wire shape.
pub fn from_json(v: &Value) -> Result<Component> {
    let obj = v
        .as_object()
        .ok_or_else(|| Error::Validation(format!("component must be an object, got {v}")))?;
    let path = match obj.get("p") {
        Some(p) => decode_path(p)?,
        None => return Err(Error::Validation("missing path".into())),
    };

    let has = |k: &str| obj.contains_key(k);
    let groups = [
        has("si") || has("sd"),
        has("t") || has("o"),
        has("na"),
        has("li") || has("ld"),
        has("lm"),
        has("oi") || has("od"),
    ];
    match groups.iter().filter(|g| **g).count() {
        0 => return Err(Error::Unsupported(format!("no edit instruction in {v}"))),
        1 => {}
        _ => {
            return Err(Error::Validation(format!(
                "component carries more than one edit kind: {v}"
            )))
        }
    }

    let edit = if has("si") || has("sd") {
        match (has("si"), has("sd")) {
            (true, false) => Edit::StringInsert { text: take_string(obj, "si")? },
            (false, true) => Edit::StringDelete { text: take_string(obj, "sd")? },
            _ => return Err(Error::Validation("si and sd cannot be combined".into())),
        }
    } else if has("t") || has("o") {
        let name = take_string(obj, "t")?;
        let op = field(obj, "o").ok_or_else(|| Error::Validation(format!("subtype {name:?} without o")))?;
        Edit::Subtype { name, op }
    } else if let Some(na) = obj.get("na") {
        match na {
            Value::Number(delta) => Edit::NumberAdd { delta: delta.clone() },
            other => return Err(Error::Validation(format!("na must be a number, got {other}"))),
        }
    } else if has("li") || has("ld") {
        match (field(obj, "ld"), field(obj, "li")) {
            (Some(old), Some(new)) => Edit::ListReplace { old, new },
            (None, Some(value)) => Edit::ListInsert { value },
            (Some(old), None) => Edit::ListDelete { old },
            (None, None) => unreachable!("checked by has()"),
        }
    } else if let Some(lm) = obj.get("lm") {
        let to = lm
            .as_u64()
            .and_then(|i| usize::try_from(i).ok())
            .ok_or_else(|| Error::Validation(format!("lm must be a list index, got {lm}")))?;
        Edit::ListMove { to }
    } else {
        match (field(obj, "od"), field(obj, "oi")) {
            (Some(old), Some(new)) => Edit::ObjectReplace { old, new },
            (None, Some(value)) => Edit::ObjectInsert { value },
            (Some(old), None) => Edit::ObjectDelete { old },
            (None, None) => unreachable!("checked by has()"),
        }
    };

    Ok(Component { path, edit })
}

pub fn from_json_op(v: &Value) -> Result<Op> {
    let arr = v
        .as_array()
        .ok_or_else(|| Error::Validation(format!("operation must be an array, got {v}")))?;
    arr.iter().map(from_json).collect()
}
