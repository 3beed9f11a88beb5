//! Transforming concurrent json0 operations.
//!
//! [`bootstrap`] lifts a pairwise component transform to whole operations;
//! this module provides the json0 component transform and the engine-level
//! entry points built on it.

pub mod bootstrap;

use std::borrow::Cow;

use crate::engine::Json0;
use crate::error::{Error, Result};
use crate::legacy;
use crate::text0;
use crate::types::{format_path, Component, Edit, Op, Path, PathKey, Side};

use self::bootstrap::ComponentTransform;

/// Where two components' paths meet, seen from the first one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Common {
    /// The first component replaces the whole document.
    Root,
    /// The first component's operand is the container at this depth of the
    /// second component's path.
    At(usize),
}

/// Whether `a`'s operand is a container on the path to `b`'s target, and
/// at which depth. `None` means `a` cannot affect `b`.
fn common_length(a_path: &[PathKey], a_len: usize, b_path: &[PathKey], b_len: usize) -> Option<Common> {
    if a_len == 0 {
        return Some(Common::Root);
    }
    if b_len == 0 {
        return None;
    }
    let (a_last, b_last) = (a_len - 1, b_len - 1);
    for i in 0..a_last {
        if i >= b_last || a_path.get(i) != b_path.get(i) {
            return None;
        }
    }
    Some(Common::At(a_last))
}

fn key_at(path: &[PathKey], common: Common) -> Option<&PathKey> {
    match common {
        Common::Root => None,
        Common::At(i) => path.get(i),
    }
}

fn index_at(path: &[PathKey], i: usize) -> Option<usize> {
    path.get(i).and_then(PathKey::as_index)
}

fn is_text(edit: &Edit) -> bool {
    edit.is_legacy_text() || matches!(edit, Edit::Subtype { name, .. } if name == text0::NAME)
}

impl Json0 {
    /// Whether `c` edits inside the container holding `path`. Conservative:
    /// an edit to a sibling of `path` counts, since it can shift list
    /// indices.
    pub fn can_op_affect_path(&self, c: &Component, path: &[PathKey]) -> bool {
        common_length(path, path.len(), &c.path, c.operand_len()).is_some()
    }

    /// Pushes `c`, rewritten to apply after `other`, onto `dest`.
    ///
    /// Pushes nothing when `other` makes `c` meaningless (e.g. both delete
    /// the same element), and may push several components when `c` is a
    /// string edit split by `other`.
    pub fn transform_component(&self, dest: &mut Op, c: &Component, other: &Component, side: Side) -> Result<()> {
        let mut c = c.clone();
        let c_len = c.operand_len();
        let other_len = other.operand_len();

        // `c` removes a value `other` edits inside of: keep the recorded
        // value in step so `c` stays invertible.
        if let Some(common2) = common_length(&c.path, c_len, &other.path, other_len) {
            if other_len > c_len && key_at(&c.path, common2) == key_at(&other.path, common2) {
                if let Some(old) = c.old_value_mut() {
                    let inner = Component::new(other.path[c_len..].to_vec(), other.edit.clone());
                    *old = self.apply(old, std::slice::from_ref(&inner))?;
                }
            }
        }

        let Some(common) = common_length(&other.path, other_len, &c.path, c_len) else {
            return self.append(dest, c);
        };
        let common_operand = c_len == other_len;
        let same_key = key_at(&c.path, common) == key_at(&other.path, common);

        if let Edit::Subtype { name, .. } = &other.edit {
            self.registry.get(name)?;
        }
        if self.transform_text(dest, &c, other, side)? {
            return Ok(());
        }

        match &other.edit {
            Edit::NumberAdd { .. }
            | Edit::Subtype { .. }
            | Edit::StringInsert { .. }
            | Edit::StringDelete { .. } => {}

            Edit::ListReplace { new: other_new, .. } => {
                if same_key {
                    if !common_operand {
                        return Ok(());
                    }
                    match &mut c.edit {
                        Edit::ListReplace { old, .. } if side == Side::Left => *old = other_new.clone(),
                        Edit::ListReplace { .. } | Edit::ListDelete { .. } => return Ok(()),
                        _ => {}
                    }
                }
            }

            Edit::ListInsert { .. } => {
                let (i, other_index) = list_position(other, common)?;
                if matches!(c.edit, Edit::ListInsert { .. }) && common_operand && same_key {
                    if side == Side::Right {
                        c.path[i] = PathKey::Index(bump(other_index)?);
                    }
                } else if let Some(index) = index_at(&c.path, i) {
                    if other_index <= index {
                        c.path[i] = PathKey::Index(bump(index)?);
                    }
                }
                if let Edit::ListMove { to } = &mut c.edit {
                    if common_operand && other_index <= *to {
                        *to = bump(*to)?;
                    }
                }
            }

            Edit::ListDelete { .. } => {
                let (i, other_index) = list_position(other, common)?;
                if let Edit::ListMove { to } = &mut c.edit {
                    if common_operand {
                        let from = index_at(&c.path, i);
                        if from == Some(other_index) {
                            return Ok(());
                        }
                        if other_index < *to || (other_index == *to && from.is_some_and(|f| f < *to)) {
                            *to -= 1;
                        }
                    }
                }
                if let Some(index) = index_at(&c.path, i) {
                    if other_index < index {
                        c.path[i] = PathKey::Index(index - 1);
                    } else if other_index == index {
                        if other_len < c_len {
                            return Ok(());
                        }
                        let inserted = match &c.edit {
                            Edit::ListReplace { new, .. } => Some(new.clone()),
                            Edit::ListDelete { .. } => return Ok(()),
                            _ => None,
                        };
                        if let Some(value) = inserted {
                            c.edit = Edit::ListInsert { value };
                        }
                    }
                }
            }

            Edit::ListMove { to: other_to } => {
                let (i, other_from) = list_position(other, common)?;
                if !transform_against_move(&mut c, i, other_from, *other_to, common_operand, side)? {
                    return Ok(());
                }
            }

            Edit::ObjectReplace { new: other_new, .. } => {
                if same_key {
                    let replaced = match &c.edit {
                        Edit::ObjectInsert { value } if common_operand => Some(value.clone()),
                        Edit::ObjectReplace { new, .. } if common_operand => Some(new.clone()),
                        _ => None,
                    };
                    match (replaced, side) {
                        (Some(new), Side::Left) => {
                            c.edit = Edit::ObjectReplace { old: other_new.clone(), new };
                        }
                        _ => return Ok(()),
                    }
                }
            }

            Edit::ObjectInsert { value: other_value } => {
                if same_key {
                    let inserted = match &c.edit {
                        Edit::ObjectInsert { value } | Edit::ObjectReplace { new: value, .. } => Some(value.clone()),
                        _ => None,
                    };
                    if let Some(new) = inserted {
                        if side == Side::Right {
                            return Ok(());
                        }
                        c.edit = Edit::ObjectReplace { old: other_value.clone(), new };
                    }
                }
            }

            Edit::ObjectDelete { .. } => {
                if same_key {
                    if !common_operand {
                        return Ok(());
                    }
                    let value = match &c.edit {
                        Edit::ObjectInsert { value } | Edit::ObjectReplace { new: value, .. } => value.clone(),
                        _ => return Ok(()),
                    };
                    c.edit = Edit::ObjectInsert { value };
                }
            }
        }

        self.append(dest, c)
    }

    /// Transforms two text edits on the same string through the `text0`
    /// subtype, and same-named subtype edits on the same value through their
    /// subtype. Returns whether `c` was handled.
    fn transform_text(&self, dest: &mut Op, c: &Component, other: &Component, side: Side) -> Result<bool> {
        let c_legacy = c.edit.is_legacy_text();
        let bridged = if c_legacy && is_text(&other.edit) {
            Cow::Owned(legacy::to_subtype(c)?)
        } else {
            Cow::Borrowed(c)
        };
        let bridged_other = if other.edit.is_legacy_text() && is_text(&c.edit) {
            Cow::Owned(legacy::to_subtype(other)?)
        } else {
            Cow::Borrowed(other)
        };

        let (Edit::Subtype { name, op }, Edit::Subtype { name: other_name, op: other_op }) =
            (&bridged.edit, &bridged_other.edit)
        else {
            return Ok(false);
        };
        if name != other_name || bridged.path != bridged_other.path {
            return Ok(false);
        }

        let subtype = self.registry.get(name)?;
        let result = subtype.transform(op, other_op, side)?;
        if c_legacy {
            for piece in legacy::from_subtype(&bridged.path, &result)? {
                self.append(dest, piece)?;
            }
        } else if !subtype.is_noop(&result) {
            self.append(dest, Component::new(bridged.path.clone(), Edit::Subtype { name: name.clone(), op: result }))?;
        }
        Ok(true)
    }

    /// Transforms two concurrent operations against each other, `left`
    /// winning ties. See [`bootstrap::transform_x`].
    pub fn transform_x(&self, left: &[Component], right: &[Component]) -> Result<(Op, Op)> {
        bootstrap::transform_x(self, left, right)
    }

    /// Transforms `op` so it applies after the concurrent `other`.
    pub fn transform(&self, op: &[Component], other: &[Component], side: Side) -> Result<Op> {
        self.check_valid_op(op)?;
        self.check_valid_op(other)?;
        bootstrap::transform(self, op, other, side)
    }
}

/// Depth of the list `other` edits and the index it edits there.
fn list_position(other: &Component, common: Common) -> Result<(usize, usize)> {
    let invalid = || {
        Error::Validation(format!(
            "{} component needs a list index, got {}",
            other.edit.kind(),
            format_path(&other.path)
        ))
    };
    let Common::At(i) = common else {
        return Err(invalid());
    };
    let index = index_at(&other.path, i).ok_or_else(invalid)?;
    Ok((i, index))
}

/// `index + 1`, for indices shifted right by a concurrent edit.
fn bump(index: usize) -> Result<usize> {
    index
        .checked_add(1)
        .ok_or_else(|| Error::Validation(format!("list index {index} is too large to shift")))
}

/// Rewrites `c` for a concurrent move of `other_from` to `other_to` in the
/// list at depth `i`. Returns false when `c` is dropped.
fn transform_against_move(
    c: &mut Component,
    i: usize,
    other_from: usize,
    other_to: usize,
    common_operand: bool,
    side: Side,
) -> Result<bool> {
    let Some(index) = index_at(&c.path, i) else {
        return Ok(true);
    };
    let set = |path: &mut Path, index: usize| path[i] = PathKey::Index(index);

    match &mut c.edit {
        Edit::ListMove { to } if common_operand => {
            if other_from == other_to {
                return Ok(true);
            }
            let (from, orig_to) = (index, *to);
            if from == other_from {
                // Both moved the same element.
                if side == Side::Right {
                    return Ok(false);
                }
                set(&mut c.path, other_to);
                if from == orig_to {
                    *to = other_to;
                }
                return Ok(true);
            }

            let mut new_from = from;
            if from > other_from {
                new_from -= 1;
            }
            if from > other_to {
                new_from = bump(new_from)?;
            } else if from == other_to && other_from > other_to {
                new_from = bump(new_from)?;
                if from == orig_to {
                    *to = bump(*to)?;
                }
            }
            set(&mut c.path, new_from);

            if orig_to > other_from || (orig_to == other_from && orig_to > from) {
                *to -= 1;
            }
            if orig_to > other_to {
                *to = bump(*to)?;
            } else if orig_to == other_to {
                let same_direction =
                    (other_to > other_from && orig_to > from) || (other_to < other_from && orig_to < from);
                if same_direction {
                    if side == Side::Right {
                        *to = bump(*to)?;
                    }
                } else if orig_to > from {
                    *to = bump(*to)?;
                } else if orig_to == other_from {
                    *to -= 1;
                }
            }
        }
        Edit::ListInsert { .. } if common_operand => {
            let mut new_index = index;
            if index > other_from {
                new_index -= 1;
            }
            if index > other_to {
                new_index = bump(new_index)?;
            }
            set(&mut c.path, new_index);
        }
        _ => {
            // Anything that cares where its element went.
            let new_index = if index == other_from {
                other_to
            } else {
                let mut new_index = index;
                if index > other_from {
                    new_index -= 1;
                }
                if index > other_to || (index == other_to && other_from > other_to) {
                    new_index = bump(new_index)?;
                }
                new_index
            };
            set(&mut c.path, new_index);
        }
    }
    Ok(true)
}

impl ComponentTransform for Json0 {
    type Component = Component;
    type Error = Error;

    fn check_valid_op(&self, op: &[Component]) -> Result<()> {
        Json0::check_valid_op(self, op)
    }

    fn transform_component(&self, dest: &mut Op, c: &Component, other: &Component, side: Side) -> Result<()> {
        Json0::transform_component(self, dest, c, other, side)
    }

    fn append(&self, dest: &mut Op, c: Component) -> Result<()> {
        Json0::append(self, dest, c)
    }
}
