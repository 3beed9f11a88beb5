//! json0 - operational transformation for JSON documents.
//!
//! Operations are lists of components (`{p: path, ...}`) that insert,
//! delete, replace or move values in objects and lists, add to numbers, or
//! delegate to a registered subtype such as [`text0`]. [`Json0`] applies,
//! composes, inverts and transforms them so that peers editing the same
//! document concurrently converge.
//!
//! ```
//! use json0::{codec, Json0, Side};
//! use serde_json::json;
//!
//! let engine = Json0::new();
//! let doc = json!({"items": ["a", "b"]});
//! let mine = codec::from_json_op(&json!([{"p": ["items", 0], "li": "x"}])).unwrap();
//! let theirs = codec::from_json_op(&json!([{"p": ["items", 0], "ld": "a"}])).unwrap();
//!
//! let (mine_t, theirs_t) = engine.transform_x(&mine, &theirs).unwrap();
//! let a = engine.apply(&engine.apply(&doc, &mine).unwrap(), &theirs_t).unwrap();
//! let b = engine.apply(&engine.apply(&doc, &theirs).unwrap(), &mine_t).unwrap();
//! assert_eq!(a, b);
//! assert_eq!(a, json!({"items": ["x", "b"]}));
//! ```

pub mod codec;
pub mod error;
pub mod json_equal;
pub mod subtype;
pub mod text0;
pub mod transform;
pub mod types;

mod apply;
mod compose;
mod engine;
mod invert;
mod legacy;
mod number;

pub use apply::IncrementalApply;
pub use engine::Json0;
pub use error::{Error, Result};
pub use subtype::{Registry, Subtype};
pub use transform::bootstrap::ComponentTransform;
pub use types::{format_path, Component, Edit, Op, Path, PathKey, Side};
