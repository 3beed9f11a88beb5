//! Wire codecs for json0 operations.

pub mod json;

pub use json::{decode_path, encode_path, from_json, from_json_op, to_json, to_json_op};
