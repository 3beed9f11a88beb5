//! Bridge between legacy `si`/`sd` components and the `text0` subtype.
//!
//! A legacy component addresses a character offset as the last path step
//! (`{p: ["title", 3], si: "x"}`); the bridged form addresses the string
//! itself and carries a one-component text0 op
//! (`{p: ["title"], t: "text0", o: [{p: 3, i: "x"}]}`).

use serde_json::Value;

use crate::error::{Error, Result};
use crate::text0::{self, TextComponent, TextEdit};
use crate::types::{format_path, Component, Edit, PathKey};

pub(crate) fn to_subtype(c: &Component) -> Result<Component> {
    let text_component = match (&c.edit, c.path.split_last()) {
        (Edit::StringInsert { text }, Some((PathKey::Index(pos), _))) => {
            TextComponent::insert(*pos, text.clone())
        }
        (Edit::StringDelete { text }, Some((PathKey::Index(pos), _))) => {
            TextComponent::delete(*pos, text.clone())
        }
        (Edit::StringInsert { .. } | Edit::StringDelete { .. }, _) => {
            return Err(Error::Validation(format!(
                "string component at {} needs a character offset",
                format_path(&c.path)
            )))
        }
        _ => return Ok(c.clone()),
    };
    Ok(Component::new(
        c.path[..c.path.len() - 1].to_vec(),
        Edit::Subtype {
            name: text0::NAME.to_owned(),
            op: text0::encode_op(&[text_component]),
        },
    ))
}

/// Re-emits a text0 op on the string at `path` as legacy components, one per
/// text edit.
pub(crate) fn from_subtype(path: &[PathKey], op: &Value) -> Result<Vec<Component>> {
    let components = text0::decode_op(op)?;
    Ok(components
        .into_iter()
        .map(|tc| {
            let mut p = path.to_vec();
            p.push(PathKey::Index(tc.pos));
            let edit = match tc.edit {
                TextEdit::Insert(text) => Edit::StringInsert { text },
                TextEdit::Delete(text) => Edit::StringDelete { text },
            };
            Component::new(p, edit)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{from_json, to_json};
    use serde_json::json;

    #[test]
    fn bridges_both_ways() {
        let legacy = from_json(&json!({"p": ["title", 3], "si": "x"})).unwrap();
        let bridged = to_subtype(&legacy).unwrap();
        assert_eq!(to_json(&bridged), json!({"p": ["title"], "t": "text0", "o": [{"p": 3, "i": "x"}]}));

        let Edit::Subtype { op, .. } = &bridged.edit else { panic!("not bridged") };
        assert_eq!(from_subtype(&bridged.path, op).unwrap(), vec![legacy]);
    }

    #[test]
    fn offset_must_be_an_index() {
        let c = from_json(&json!({"p": ["title", "3"], "sd": "x"})).unwrap();
        assert!(matches!(to_subtype(&c), Err(Error::Validation(_))));
    }

    #[test]
    fn other_components_pass_through() {
        let c = from_json(&json!({"p": ["n"], "na": 1})).unwrap();
        assert_eq!(to_subtype(&c).unwrap(), c);
    }
}
