//! Serializer Module
//!
//! Turns values into the text blobs a backing store persists, and back.
//!
//! ## Responsibilities
//! - Define the serializer capability (`serialize` / `deserialize`)
//! - Provide the built-in `json` and `msgpack` serializers
//! - Resolve the active item serializer and the fixed metadata serializer
//!
//! Values use `serde_json::Value` as the common model. Every payload is text:
//! binary formats are base64-wrapped before they reach a backing store.

mod json;
mod msgpack;
mod registry;

use std::fmt::Debug;

use serde_json::Value;

use crate::error::Result;

pub use json::JsonSerializer;
pub use msgpack::MessagePackSerializer;
pub use registry::SerializerRegistry;

/// A named text serializer
pub trait Serializer: Debug + Send + Sync {
    /// Unique name the serializer is registered under
    fn name(&self) -> &str;

    /// Encode a value as text
    fn serialize(&self, value: &Value) -> Result<String>;

    /// Decode text produced by `serialize`
    fn deserialize(&self, raw: &str) -> Result<Value>;
}
