//! Applying operations to snapshots.

use std::iter::FusedIterator;

use serde_json::Value;

use crate::engine::Json0;
use crate::error::{Error, Result};
use crate::json_equal::deep_equal;
use crate::legacy;
use crate::number;
use crate::types::{format_path, Component, Edit, PathKey};

impl Json0 {
    /// Applies `op` to a copy of `snapshot`.
    ///
    /// The input is never modified; on error nothing is returned, so a
    /// failed apply leaves no partial result behind.
    pub fn apply(&self, snapshot: &Value, op: &[Component]) -> Result<Value> {
        self.apply_owned(snapshot.clone(), op)
    }

    /// Like [`Json0::apply`], but takes the snapshot by value and edits it
    /// without copying. On error the snapshot is dropped.
    pub fn apply_owned(&self, mut snapshot: Value, op: &[Component]) -> Result<Value> {
        self.check_valid_op(op)?;
        for c in op {
            self.apply_component(&mut snapshot, c)?;
        }
        Ok(snapshot)
    }

    /// Applies `op` one component at a time, yielding each component with
    /// the snapshot it produced. Iteration stops after the first error.
    pub fn incremental_apply<'a>(
        &'a self,
        snapshot: &Value,
        op: &'a [Component],
    ) -> IncrementalApply<'a> {
        IncrementalApply {
            engine: self,
            snapshot: snapshot.clone(),
            components: op.iter(),
            failed: false,
        }
    }

    /// A failing component leaves `doc` untouched: every edit checks its
    /// target before mutating it.
    fn apply_component(&self, doc: &mut Value, c: &Component) -> Result<()> {
        match &c.edit {
            Edit::StringInsert { .. } | Edit::StringDelete { .. } => {
                self.apply_component(doc, &legacy::to_subtype(c)?)
            }
            Edit::Subtype { name, op } => {
                let subtype = self.registry.get(name)?;
                let target = resolve_mut(doc, &c.path)?;
                *target = subtype.apply(target, op)?;
                Ok(())
            }
            Edit::NumberAdd { delta } => match resolve_mut(doc, &c.path)? {
                Value::Number(n) => {
                    *n = number::add(n, delta)?;
                    Ok(())
                }
                _ => Err(Error::TypeMismatch {
                    expected: "a number",
                    path: format_path(&c.path),
                }),
            },
            edit if edit.is_list_edit() => apply_list_edit(doc, c),
            _ => apply_object_edit(doc, c),
        }
    }
}

/// Walks `path` from `doc`, keys through objects and indices through lists.
fn resolve_mut<'a>(doc: &'a mut Value, path: &[PathKey]) -> Result<&'a mut Value> {
    let mut cur = doc;
    for (depth, step) in path.iter().enumerate() {
        let here = || format_path(&path[..depth]);
        let missing = || no_value(&path[..=depth]);
        cur = match (cur, step) {
            (Value::Object(map), PathKey::Key(key)) => map.get_mut(key).ok_or_else(missing)?,
            (Value::Array(list), PathKey::Index(i)) => list.get_mut(*i).ok_or_else(missing)?,
            (Value::Object(_), PathKey::Index(_)) => {
                return Err(Error::TypeMismatch { expected: "a list", path: here() })
            }
            (Value::Array(_), PathKey::Key(_)) => {
                return Err(Error::TypeMismatch { expected: "an object", path: here() })
            }
            _ => return Err(Error::TypeMismatch { expected: "a container", path: here() }),
        };
    }
    Ok(cur)
}

fn no_value(path: &[PathKey]) -> Error {
    Error::Validation(format!("no value at {}", format_path(path)))
}

fn check_old(path: &[PathKey], expected: &Value, actual: &Value) -> Result<()> {
    if deep_equal(expected, actual) {
        return Ok(());
    }
    let path = format_path(path);
    tracing::debug!(%path, "recorded value does not match the snapshot");
    Err(Error::Precondition {
        path,
        expected: expected.to_string(),
        actual: actual.to_string(),
    })
}

fn apply_list_edit(doc: &mut Value, c: &Component) -> Result<()> {
    let Some((PathKey::Index(index), parent)) = c.path.split_last() else {
        return Err(Error::Validation(format!(
            "{} component needs a list index, got {}",
            c.edit.kind(),
            format_path(&c.path)
        )));
    };
    let index = *index;
    let list = match resolve_mut(doc, parent)? {
        Value::Array(list) => list,
        _ => {
            return Err(Error::TypeMismatch {
                expected: "a list",
                path: format_path(parent),
            })
        }
    };
    let len = list.len();
    let in_range = |action: &'static str, index: usize| {
        if index < len {
            Ok(())
        } else {
            Err(Error::OutOfRange { action, index, len })
        }
    };

    match &c.edit {
        Edit::ListInsert { value } => {
            if index > len {
                return Err(Error::OutOfRange { action: "insert", index, len });
            }
            list.insert(index, value.clone());
        }
        Edit::ListDelete { old } => {
            in_range("delete", index)?;
            check_old(&c.path, old, &list[index])?;
            list.remove(index);
        }
        Edit::ListReplace { old, new } => {
            in_range("replace", index)?;
            check_old(&c.path, old, &list[index])?;
            list[index] = new.clone();
        }
        Edit::ListMove { to } => {
            if *to != index {
                in_range("move from", index)?;
                in_range("move to", *to)?;
                let moved = list.remove(index);
                list.insert(*to, moved);
            }
        }
        _ => unreachable!("not a list edit: {}", c.edit.kind()),
    }
    Ok(())
}

fn apply_object_edit(doc: &mut Value, c: &Component) -> Result<()> {
    let Some((last, parent)) = c.path.split_last() else {
        return apply_root_edit(doc, c);
    };
    let PathKey::Key(key) = last else {
        return Err(Error::Validation(format!(
            "{} component needs an object key, got {}",
            c.edit.kind(),
            format_path(&c.path)
        )));
    };
    let map = match resolve_mut(doc, parent)? {
        Value::Object(map) => map,
        _ => {
            return Err(Error::TypeMismatch {
                expected: "an object",
                path: format_path(parent),
            })
        }
    };

    match &c.edit {
        Edit::ObjectInsert { value } => {
            if let Some(current) = map.get(key) {
                return Err(Error::Precondition {
                    path: format_path(&c.path),
                    expected: "nothing".into(),
                    actual: current.to_string(),
                });
            }
            map.insert(key.clone(), value.clone());
        }
        Edit::ObjectReplace { old, new } => {
            let current = map.get(key).ok_or_else(|| no_value(&c.path))?;
            check_old(&c.path, old, current)?;
            map.insert(key.clone(), new.clone());
        }
        Edit::ObjectDelete { old } => {
            let current = map.get(key).ok_or_else(|| no_value(&c.path))?;
            check_old(&c.path, old, current)?;
            map.remove(key);
        }
        _ => unreachable!("not an object edit: {}", c.edit.kind()),
    }
    Ok(())
}

/// Object edits with an empty path replace the whole document.
fn apply_root_edit(doc: &mut Value, c: &Component) -> Result<()> {
    match &c.edit {
        Edit::ObjectInsert { value } => {
            if !doc.is_null() {
                return Err(Error::Precondition {
                    path: format_path(&[]),
                    expected: "null".into(),
                    actual: doc.to_string(),
                });
            }
            *doc = value.clone();
        }
        Edit::ObjectReplace { old, new } => {
            check_old(&[], old, doc)?;
            *doc = new.clone();
        }
        Edit::ObjectDelete { old } => {
            check_old(&[], old, doc)?;
            *doc = Value::Null;
        }
        _ => unreachable!("not an object edit: {}", c.edit.kind()),
    }
    Ok(())
}

/// Iterator returned by [`Json0::incremental_apply`].
#[derive(Debug, Clone)]
pub struct IncrementalApply<'a> {
    engine: &'a Json0,
    snapshot: Value,
    components: std::slice::Iter<'a, Component>,
    failed: bool,
}

impl IncrementalApply<'_> {
    /// Snapshot after the components yielded so far.
    pub fn snapshot(&self) -> &Value {
        &self.snapshot
    }
}

impl Iterator for IncrementalApply<'_> {
    type Item = Result<(Component, Value)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let c = self.components.next()?;
        let step = self
            .engine
            .check_valid_op(std::slice::from_ref(c))
            .and_then(|()| self.engine.apply_component(&mut self.snapshot, c));
        match step {
            Ok(()) => Some(Ok((c.clone(), self.snapshot.clone()))),
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}

impl FusedIterator for IncrementalApply<'_> {}
