//! The json0 engine.

use serde_json::Value;

use crate::error::{Error, Result};
use crate::subtype::Registry;
use crate::types::{format_path, Component, Op, PathKey};

/// The json0 OT type.
///
/// Holds the subtype registry every operation is interpreted against. All
/// methods take `&self` and never modify their inputs, so one engine can be
/// shared between threads.
#[derive(Debug, Clone)]
pub struct Json0 {
    pub(crate) registry: Registry,
}

impl Default for Json0 {
    fn default() -> Self {
        Self::new()
    }
}

impl Json0 {
    pub const NAME: &'static str = "json0";
    pub const URI: &'static str = "http://sharejs.org/types/JSONv0";

    /// An engine with the built-in `text0` subtype registered.
    pub fn new() -> Self {
        Self::with_registry(Registry::with_text0())
    }

    pub fn with_registry(registry: Registry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Initial snapshot for a new document.
    pub fn create(data: Option<Value>) -> Value {
        data.unwrap_or(Value::Null)
    }

    /// Splits an operation into single-component operations.
    pub fn shatter(op: &[Component]) -> Vec<Op> {
        op.iter().map(|c| vec![c.clone()]).collect()
    }

    /// Structural checks: list and legacy string components must end in an
    /// index, object components in a key (or address the root).
    pub fn check_valid_op(&self, op: &[Component]) -> Result<()> {
        for c in op {
            let last = c.path.last();
            let ok = match &c.edit {
                e if e.is_list_edit() || e.is_legacy_text() => {
                    matches!(last, Some(PathKey::Index(_)))
                }
                e if e.is_object_edit() => matches!(last, None | Some(PathKey::Key(_))),
                _ => true,
            };
            if !ok {
                return Err(Error::Validation(format!(
                    "{} component has invalid path {}",
                    c.edit.kind(),
                    format_path(&c.path)
                )));
            }
        }
        Ok(())
    }
}
