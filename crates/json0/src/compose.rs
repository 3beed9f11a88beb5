//! Appending, composing and normalizing operations.

use crate::engine::Json0;
use crate::error::Result;
use crate::json_equal::deep_equal;
use crate::legacy;
use crate::number;
use crate::text0;
use crate::types::{Component, Edit, Op, PathKey};

impl Json0 {
    /// Pushes `c` onto `dest`, merging it with the last component when both
    /// act on the same path.
    ///
    /// Merges: consecutive number adds sum, an insert followed by the delete
    /// of the same value cancels, object delete then insert becomes a
    /// replace, same-named subtype edits compose through the subtype, and
    /// a move onto its own index disappears.
    pub fn append(&self, dest: &mut Op, c: Component) -> Result<()> {
        let Some(last) = dest.pop() else {
            dest.push(c);
            return Ok(());
        };
        dest.extend(self.merge(last, c)?);
        Ok(())
    }

    /// `op1` followed by `op2`, as one operation.
    pub fn compose(&self, op1: &[Component], op2: &[Component]) -> Result<Op> {
        self.check_valid_op(op1)?;
        self.check_valid_op(op2)?;
        let mut out = op1.to_vec();
        for c in op2 {
            self.append(&mut out, c.clone())?;
        }
        Ok(out)
    }

    /// Re-appends every component, merging neighbours.
    pub fn normalize(&self, op: &[Component]) -> Result<Op> {
        self.compose(&[], op)
    }

    /// What replaces `last` once `c` is appended after it.
    fn merge(&self, last: Component, c: Component) -> Result<Vec<Component>> {
        if last.edit.is_legacy_text() && c.edit.is_legacy_text() {
            return self.merge_legacy(last, c);
        }
        if last.path != c.path {
            return Ok(vec![last, c]);
        }

        let path = last.path;
        let edit = match (last.edit, c.edit) {
            (Edit::Subtype { name: last_name, op: last_op }, Edit::Subtype { name, op })
                if last_name == name =>
            {
                let op = self.registry.get(&name)?.compose(&last_op, &op)?;
                Edit::Subtype { name, op }
            }
            (Edit::NumberAdd { delta: a }, Edit::NumberAdd { delta: b }) => Edit::NumberAdd {
                delta: number::add(&a, &b)?,
            },
            (Edit::ListInsert { value }, Edit::ListDelete { old }) if deep_equal(&value, &old) => {
                return Ok(Vec::new())
            }
            (Edit::ListReplace { old, new }, Edit::ListDelete { old: removed })
                if deep_equal(&new, &removed) =>
            {
                Edit::ListDelete { old }
            }
            (Edit::ObjectDelete { old }, Edit::ObjectInsert { value }) => {
                Edit::ObjectReplace { old, new: value }
            }
            (Edit::ObjectInsert { .. }, Edit::ObjectReplace { new, .. }) => {
                Edit::ObjectInsert { value: new }
            }
            (Edit::ObjectReplace { old, .. }, Edit::ObjectReplace { new, .. }) => {
                Edit::ObjectReplace { old, new }
            }
            (Edit::ObjectInsert { .. }, Edit::ObjectDelete { .. }) => return Ok(Vec::new()),
            (Edit::ObjectReplace { old, .. }, Edit::ObjectDelete { .. }) => {
                Edit::ObjectDelete { old }
            }
            (last_edit, Edit::ListMove { to }) if path.last() == Some(&PathKey::Index(to)) => {
                last_edit
            }
            (last_edit, edit) => {
                return Ok(vec![
                    Component::new(path.clone(), last_edit),
                    Component::new(path, edit),
                ])
            }
        };
        Ok(vec![Component::new(path, edit)])
    }

    /// Two string edits on the same string compose as text0 ops and come
    /// back out as legacy components.
    fn merge_legacy(&self, last: Component, c: Component) -> Result<Vec<Component>> {
        let bridged_last = legacy::to_subtype(&last)?;
        let bridged = legacy::to_subtype(&c)?;
        match (&bridged_last.edit, &bridged.edit) {
            (Edit::Subtype { op: last_op, .. }, Edit::Subtype { op, .. })
                if bridged_last.path == bridged.path =>
            {
                let composed = self.registry.get(text0::NAME)?.compose(last_op, op)?;
                legacy::from_subtype(&bridged.path, &composed)
            }
            _ => Ok(vec![last, c]),
        }
    }
}
