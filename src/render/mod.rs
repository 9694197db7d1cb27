//! Serialization of results.

mod json;

pub use json::{blocks_to_json, to_json, write_json, JsonFormat};
