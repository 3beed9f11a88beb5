//! Plain-text subtype (`text0`).
//!
//! An operation is a list of inserts and deletes at character offsets:
//!
//! ```text
//! [{"p": 3, "i": "hi"}, {"p": 0, "d": "ab"}]
//! ```
//!
//! Components apply in order, each against the result of the previous one.
//! Offsets count Unicode scalar values. Deletes carry the deleted text so the
//! operation is invertible.
//!
//! json0 uses this type for legacy `si`/`sd` components.

mod transform;

pub use transform::transform_position;

use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::subtype::Subtype;
use crate::transform::bootstrap;
use crate::types::Side;

/// Name `text0` is registered under.
pub const NAME: &str = "text0";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextEdit {
    Insert(String),
    Delete(String),
}

impl TextEdit {
    pub fn text(&self) -> &str {
        match self {
            TextEdit::Insert(s) | TextEdit::Delete(s) => s,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextComponent {
    pub pos: usize,
    pub edit: TextEdit,
}

impl TextComponent {
    pub fn insert(pos: usize, text: impl Into<String>) -> Self {
        Self { pos, edit: TextEdit::Insert(text.into()) }
    }

    pub fn delete(pos: usize, text: impl Into<String>) -> Self {
        Self { pos, edit: TextEdit::Delete(text.into()) }
    }
}

pub type TextOp = Vec<TextComponent>;

// ── String helpers (character offsets) ────────────────────────────────────

pub(crate) fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Offset just past `text` inserted or deleted at `pos`.
pub(crate) fn end_of(pos: usize, text: &str) -> Result<usize> {
    pos.checked_add(char_len(text))
        .ok_or_else(|| Error::Validation(format!("text0 offset {pos} is too large")))
}

fn byte_offset(s: &str, pos: usize) -> usize {
    s.char_indices().nth(pos).map_or(s.len(), |(i, _)| i)
}

/// Characters `start..end` of `s`, clamped to its length.
pub(crate) fn char_slice(s: &str, start: usize, end: usize) -> &str {
    let from = byte_offset(s, start);
    let to = byte_offset(s, end.max(start));
    &s[from..to]
}

fn inject(s: &str, pos: usize, text: &str) -> String {
    let at = byte_offset(s, pos);
    let mut out = String::with_capacity(s.len() + text.len());
    out.push_str(&s[..at]);
    out.push_str(text);
    out.push_str(&s[at..]);
    out
}

// ── Operations ────────────────────────────────────────────────────────────

pub fn apply(snapshot: &str, op: &[TextComponent]) -> Result<String> {
    let mut s = snapshot.to_owned();
    for c in op {
        let len = char_len(&s);
        match &c.edit {
            TextEdit::Insert(text) => {
                if c.pos > len {
                    return Err(Error::OutOfRange { action: "insert", index: c.pos, len });
                }
                let at = byte_offset(&s, c.pos);
                s.insert_str(at, text);
            }
            TextEdit::Delete(text) => {
                let end = c
                    .pos
                    .checked_add(char_len(text))
                    .filter(|end| *end <= len)
                    .ok_or(Error::OutOfRange { action: "delete", index: c.pos, len })?;
                let start = byte_offset(&s, c.pos);
                let end = byte_offset(&s, end);
                if &s[start..end] != text.as_str() {
                    return Err(Error::Precondition {
                        path: format!("offset {}", c.pos),
                        expected: Value::String(text.clone()).to_string(),
                        actual: Value::String(s[start..end].to_owned()).to_string(),
                    });
                }
                s.replace_range(start..end, "");
            }
        }
    }
    Ok(s)
}

/// Pushes `c` onto `op`, merging it into the last component when the two
/// touch: inserts that land inside or at either end of the previous insert,
/// and deletes that cover the previous delete's offset.
pub fn append(op: &mut TextOp, c: TextComponent) {
    if c.edit.text().is_empty() {
        return;
    }
    if let Some(last) = op.last_mut() {
        let last_pos = last.pos;
        match (&mut last.edit, &c.edit) {
            (TextEdit::Insert(prev), TextEdit::Insert(ins)) => {
                if last_pos <= c.pos && end_of(last_pos, prev).is_ok_and(|end| c.pos <= end) {
                    *prev = inject(prev, c.pos - last_pos, ins);
                    return;
                }
            }
            (TextEdit::Delete(prev), TextEdit::Delete(del)) => {
                if c.pos <= last_pos && end_of(c.pos, del).is_ok_and(|end| last_pos <= end) {
                    *prev = inject(del, last_pos - c.pos, prev);
                    last.pos = c.pos;
                    return;
                }
            }
            _ => {}
        }
    }
    op.push(c);
}

pub fn compose(op1: &[TextComponent], op2: &[TextComponent]) -> TextOp {
    let mut out = op1.to_vec();
    for c in op2 {
        append(&mut out, c.clone());
    }
    out
}

pub fn normalize(op: &[TextComponent]) -> TextOp {
    compose(&[], op)
}

pub fn invert(op: &[TextComponent]) -> TextOp {
    op.iter()
        .rev()
        .map(|c| TextComponent {
            pos: c.pos,
            edit: match &c.edit {
                TextEdit::Insert(s) => TextEdit::Delete(s.clone()),
                TextEdit::Delete(s) => TextEdit::Insert(s.clone()),
            },
        })
        .collect()
}

// ── Codec ─────────────────────────────────────────────────────────────────

pub fn decode_component(v: &Value) -> Result<TextComponent> {
    let obj = v
        .as_object()
        .ok_or_else(|| Error::Validation(format!("text0 component must be an object, got {v}")))?;
    let pos = obj
        .get("p")
        .and_then(Value::as_u64)
        .and_then(|p| usize::try_from(p).ok())
        .ok_or_else(|| Error::Validation(format!("text0 component needs an offset: {v}")))?;
    match (obj.get("i"), obj.get("d")) {
        (Some(Value::String(s)), None) => Ok(TextComponent::insert(pos, s.clone())),
        (None, Some(Value::String(s))) => Ok(TextComponent::delete(pos, s.clone())),
        _ => Err(Error::Validation(format!(
            "text0 component needs exactly one of i or d as a string: {v}"
        ))),
    }
}

pub fn decode_op(v: &Value) -> Result<TextOp> {
    match v {
        Value::Array(components) => components.iter().map(decode_component).collect(),
        other => Err(Error::Validation(format!("text0 op must be an array, got {other}"))),
    }
}

pub fn encode_component(c: &TextComponent) -> Value {
    let mut m = Map::new();
    m.insert("p".into(), Value::from(c.pos));
    match &c.edit {
        TextEdit::Insert(s) => m.insert("i".into(), Value::String(s.clone())),
        TextEdit::Delete(s) => m.insert("d".into(), Value::String(s.clone())),
    };
    Value::Object(m)
}

pub fn encode_op(op: &[TextComponent]) -> Value {
    Value::Array(op.iter().map(encode_component).collect())
}

// ── Subtype ───────────────────────────────────────────────────────────────

/// The `text0` subtype.
#[derive(Debug, Clone, Copy, Default)]
pub struct Text0;

impl Subtype for Text0 {
    fn name(&self) -> &str {
        NAME
    }

    fn apply(&self, snapshot: &Value, op: &Value) -> Result<Value> {
        let s = snapshot.as_str().ok_or_else(|| Error::TypeMismatch {
            expected: "a string",
            path: format!("text0 target {snapshot}"),
        })?;
        Ok(Value::String(apply(s, &decode_op(op)?)?))
    }

    fn compose(&self, op1: &Value, op2: &Value) -> Result<Value> {
        Ok(encode_op(&compose(&decode_op(op1)?, &decode_op(op2)?)))
    }

    fn invert(&self, op: &Value) -> Result<Value> {
        Ok(encode_op(&invert(&decode_op(op)?)))
    }

    fn transform(&self, op: &Value, other: &Value, side: Side) -> Result<Value> {
        let op = decode_op(op)?;
        let other = decode_op(other)?;
        Ok(encode_op(&bootstrap::transform(self, &op, &other, side)?))
    }
}
