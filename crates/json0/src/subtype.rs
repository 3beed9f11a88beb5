//! Pluggable nested operation types.
//!
//! A component tagged with a subtype name (`t`) carries an opaque
//! sub-operation (`o`) that json0 never interprets itself: apply, compose,
//! invert and transform are delegated to the [`Subtype`] registered under
//! that name.

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

use serde_json::Value;

use crate::error::{Error, Result};
use crate::text0::Text0;
use crate::types::Side;

/// Capability set of a nested operation type.
pub trait Subtype: Debug + Send + Sync {
    fn name(&self) -> &str;

    fn apply(&self, snapshot: &Value, op: &Value) -> Result<Value>;

    fn compose(&self, op1: &Value, op2: &Value) -> Result<Value>;

    fn invert(&self, op: &Value) -> Result<Value>;

    /// Transforms `op` so it applies after `other`.
    fn transform(&self, op: &Value, other: &Value, side: Side) -> Result<Value>;

    /// Whether `op` has no effect. A transformed sub-operation for which
    /// this holds is dropped instead of being emitted as a component.
    fn is_noop(&self, op: &Value) -> bool {
        match op {
            Value::Null => true,
            Value::Array(components) => components.is_empty(),
            _ => false,
        }
    }
}

/// Name → subtype mapping consulted by the engine.
///
/// The engine takes the registry by value when it is built, so it cannot be
/// changed while operations are being processed.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    subtypes: HashMap<String, Arc<dyn Subtype>>,
}

impl Registry {
    /// An empty registry. Legacy `si`/`sd` components need the `text0`
    /// subtype, see [`Registry::with_text0`].
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the built-in `text0` subtype.
    pub fn with_text0() -> Self {
        let mut registry = Self::new();
        registry.register(Text0);
        registry
    }

    /// Registers `subtype` under its name, replacing any previous entry.
    pub fn register<S: Subtype + 'static>(&mut self, subtype: S) -> &mut Self {
        self.register_arc(Arc::new(subtype))
    }

    pub fn register_arc(&mut self, subtype: Arc<dyn Subtype>) -> &mut Self {
        let name = subtype.name().to_owned();
        tracing::debug!(subtype = %name, "registered subtype");
        self.subtypes.insert(name, subtype);
        self
    }

    pub fn get(&self, name: &str) -> Result<&dyn Subtype> {
        self.subtypes
            .get(name)
            .map(|s| s.as_ref())
            .ok_or_else(|| Error::UnregisteredSubtype(name.to_owned()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.subtypes.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.subtypes.keys().map(String::as_str)
    }
}
