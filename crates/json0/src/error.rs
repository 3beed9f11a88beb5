//! Error type shared by every json0 entry point.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum Error {
    /// The component is malformed: missing or invalid path, bad field shape.
    #[error("invalid component: {0}")]
    Validation(String),
    /// The addressed location does not have the shape the component needs.
    #[error("referenced element is not {expected} (at {path})")]
    TypeMismatch { expected: &'static str, path: String },
    #[error("referenced element is not in range (cannot {action} index {index}, length {len})")]
    OutOfRange {
        action: &'static str,
        index: usize,
        len: usize,
    },
    /// A recorded old value does not match the document. Usually means the
    /// operation is stale or was transformed against the wrong base.
    #[error("precondition failed at {path}: expected {expected}, found {actual}")]
    Precondition {
        path: String,
        expected: String,
        actual: String,
    },
    #[error("unsupported component: {0}")]
    Unsupported(String),
    #[error("subtype {0:?} is not registered")]
    UnregisteredSubtype(String),
}

pub type Result<T> = std::result::Result<T, Error>;
