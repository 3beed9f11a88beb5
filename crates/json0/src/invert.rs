//! Inverting operations.

use crate::engine::Json0;
use crate::error::{Error, Result};
use crate::number;
use crate::types::{format_path, Component, Edit, Op, PathKey};

impl Json0 {
    /// The operation that undoes `op`: components in reverse order, each
    /// inverted.
    pub fn invert(&self, op: &[Component]) -> Result<Op> {
        op.iter().rev().map(|c| self.invert_component(c)).collect()
    }

    pub fn invert_component(&self, c: &Component) -> Result<Component> {
        let edit = match &c.edit {
            Edit::ObjectInsert { value } => Edit::ObjectDelete { old: value.clone() },
            Edit::ObjectDelete { old } => Edit::ObjectInsert { value: old.clone() },
            Edit::ObjectReplace { old, new } => Edit::ObjectReplace { old: new.clone(), new: old.clone() },
            Edit::ListInsert { value } => Edit::ListDelete { old: value.clone() },
            Edit::ListDelete { old } => Edit::ListInsert { value: old.clone() },
            Edit::ListReplace { old, new } => Edit::ListReplace { old: new.clone(), new: old.clone() },
            Edit::ListMove { to } => {
                let Some((PathKey::Index(from), parent)) = c.path.split_last() else {
                    return Err(Error::Validation(format!(
                        "lm component needs a list index, got {}",
                        format_path(&c.path)
                    )));
                };
                let mut path = parent.to_vec();
                path.push(PathKey::Index(*to));
                return Ok(Component::new(path, Edit::ListMove { to: *from }));
            }
            Edit::NumberAdd { delta } => Edit::NumberAdd { delta: number::negate(delta)? },
            Edit::Subtype { name, op } => Edit::Subtype {
                name: name.clone(),
                op: self.registry.get(name)?.invert(op)?,
            },
            Edit::StringInsert { text } => Edit::StringDelete { text: text.clone() },
            Edit::StringDelete { text } => Edit::StringInsert { text: text.clone() },
        };
        Ok(Component::new(c.path.clone(), edit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{from_json_op, to_json_op};
    use crate::subtype::Registry;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    fn invert(op: Value) -> Value {
        to_json_op(&Json0::new().invert(&from_json_op(&op).unwrap()).unwrap())
    }

    #[test]
    fn inverts_in_reverse_order() {
        assert_eq!(
            invert(json!([{"p": ["a"], "oi": 1}, {"p": ["a"], "na": 2}])),
            json!([{"p": ["a"], "na": -2}, {"p": ["a"], "od": 1}])
        );
    }

    #[test]
    fn swaps_replace_values() {
        assert_eq!(
            invert(json!([{"p": [0], "ld": 1, "li": 2}, {"p": ["k"], "od": "x", "oi": "y"}])),
            json!([{"p": ["k"], "od": "y", "oi": "x"}, {"p": [0], "ld": 2, "li": 1}])
        );
    }

    #[test]
    fn move_swaps_indices() {
        assert_eq!(invert(json!([{"p": ["l", 1], "lm": 3}])), json!([{"p": ["l", 3], "lm": 1}]));
    }

    #[test]
    fn string_edits_swap() {
        assert_eq!(
            invert(json!([{"p": ["s", 1], "si": "x"}, {"p": ["t"], "t": "text0", "o": [{"p": 0, "d": "y"}]}])),
            json!([{"p": ["t"], "t": "text0", "o": [{"p": 0, "i": "y"}]}, {"p": ["s", 1], "sd": "x"}])
        );
    }

    #[test]
    fn unregistered_subtype_cannot_be_inverted() {
        let engine = Json0::with_registry(Registry::new());
        let op = from_json_op(&json!([{"p": [], "t": "rich-text", "o": []}])).unwrap();
        assert_eq!(engine.invert(&op).unwrap_err(), Error::UnregisteredSubtype("rich-text".into()));
    }
}
