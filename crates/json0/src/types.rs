//! Core data model: paths, components and operations.
//!
//! A component is exactly one [`Edit`] applied at a [`Path`]. The path of
//! list and object edits names the mutated element itself (its last step is
//! the list index or object key), while number adds and subtype edits name
//! the value they operate on.

use std::fmt::{self, Display};
use std::str::FromStr;

use serde_json::{Number, Value};

use crate::error::Error;

/// One step of a [`Path`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathKey {
    Key(String),
    Index(usize),
}

pub type Path = Vec<PathKey>;

impl PathKey {
    pub fn as_index(&self) -> Option<usize> {
        match self {
            PathKey::Index(i) => Some(*i),
            PathKey::Key(_) => None,
        }
    }

    pub fn as_key(&self) -> Option<&str> {
        match self {
            PathKey::Key(k) => Some(k),
            PathKey::Index(_) => None,
        }
    }
}

impl Display for PathKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathKey::Key(k) => write!(f, "{}", Value::String(k.clone())),
            PathKey::Index(i) => write!(f, "{i}"),
        }
    }
}

impl From<&str> for PathKey {
    fn from(key: &str) -> Self {
        PathKey::Key(key.to_owned())
    }
}

impl From<String> for PathKey {
    fn from(key: String) -> Self {
        PathKey::Key(key)
    }
}

impl From<usize> for PathKey {
    fn from(index: usize) -> Self {
        PathKey::Index(index)
    }
}

/// Renders a path the way it appears on the wire, e.g. `["a",0]`.
pub fn format_path(path: &[PathKey]) -> String {
    let steps: Vec<String> = path.iter().map(ToString::to_string).collect();
    format!("[{}]", steps.join(","))
}

/// The kind of a component together with the fields that kind needs.
#[derive(Debug, Clone, PartialEq)]
pub enum Edit {
    ObjectInsert { value: Value },
    ObjectDelete { old: Value },
    ObjectReplace { old: Value, new: Value },
    ListInsert { value: Value },
    ListDelete { old: Value },
    ListReplace { old: Value, new: Value },
    /// Moves the element at the component path to index `to` of the same list.
    ListMove { to: usize },
    NumberAdd { delta: Number },
    /// Delegated edit; `op` is opaque to json0 and interpreted by the
    /// subtype registered under `name`.
    Subtype { name: String, op: Value },
    /// Legacy string insert; the last path step is the character offset.
    StringInsert { text: String },
    /// Legacy string delete; the last path step is the character offset.
    StringDelete { text: String },
}

impl Edit {
    /// Wire name of the kind, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Edit::ObjectInsert { .. } => "oi",
            Edit::ObjectDelete { .. } => "od",
            Edit::ObjectReplace { .. } => "od+oi",
            Edit::ListInsert { .. } => "li",
            Edit::ListDelete { .. } => "ld",
            Edit::ListReplace { .. } => "ld+li",
            Edit::ListMove { .. } => "lm",
            Edit::NumberAdd { .. } => "na",
            Edit::Subtype { .. } => "t",
            Edit::StringInsert { .. } => "si",
            Edit::StringDelete { .. } => "sd",
        }
    }

    pub fn is_list_edit(&self) -> bool {
        matches!(
            self,
            Edit::ListInsert { .. }
                | Edit::ListDelete { .. }
                | Edit::ListReplace { .. }
                | Edit::ListMove { .. }
        )
    }

    pub fn is_object_edit(&self) -> bool {
        matches!(
            self,
            Edit::ObjectInsert { .. } | Edit::ObjectDelete { .. } | Edit::ObjectReplace { .. }
        )
    }

    pub fn is_legacy_text(&self) -> bool {
        matches!(self, Edit::StringInsert { .. } | Edit::StringDelete { .. })
    }
}

/// A single atomic edit.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    pub path: Path,
    pub edit: Edit,
}

/// An ordered list of components, applied in sequence.
pub type Op = Vec<Component>;

impl Component {
    pub fn new(path: Path, edit: Edit) -> Self {
        Self { path, edit }
    }

    /// Length of the path this component operates on. Number adds and
    /// subtype edits act on the addressed value itself, so they count one
    /// step deeper than their path.
    pub(crate) fn operand_len(&self) -> usize {
        match self.edit {
            Edit::NumberAdd { .. } | Edit::Subtype { .. } => self.path.len() + 1,
            _ => self.path.len(),
        }
    }

    /// The recorded value this component removes, if it removes one.
    pub(crate) fn old_value_mut(&mut self) -> Option<&mut Value> {
        match &mut self.edit {
            Edit::ObjectDelete { old }
            | Edit::ObjectReplace { old, .. }
            | Edit::ListDelete { old }
            | Edit::ListReplace { old, .. } => Some(old),
            _ => None,
        }
    }
}

/// Tie-break role of a transform call. The two peers of a concurrent pair
/// always transform with opposite sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

impl Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => write!(f, "left"),
            Side::Right => write!(f, "right"),
        }
    }
}

impl FromStr for Side {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(Side::Left),
            "right" => Ok(Side::Right),
            other => Err(Error::Validation(format!(
                "side must be 'left' or 'right', got {other:?}"
            ))),
        }
    }
}
