//! MessagePack serializer
//!
//! MessagePack is binary, so the encoded bytes are wrapped in standard
//! base64 to satisfy the text-only payload contract.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::Value;

use crate::error::{DeferError, Result};
use super::Serializer;

/// Base64-wrapped MessagePack, registered as `msgpack`
#[derive(Debug, Clone, Copy, Default)]
pub struct MessagePackSerializer;

impl MessagePackSerializer {
    pub const NAME: &'static str = "msgpack";
}

impl Serializer for MessagePackSerializer {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn serialize(&self, value: &Value) -> Result<String> {
        let bytes = rmp_serde::to_vec(value)
            .map_err(|e| DeferError::Serialization(format!("msgpack encode: {}", e)))?;
        Ok(STANDARD.encode(bytes))
    }

    fn deserialize(&self, raw: &str) -> Result<Value> {
        let bytes = STANDARD
            .decode(raw.trim())
            .map_err(|e| DeferError::Serialization(format!("msgpack base64: {}", e)))?;
        rmp_serde::from_slice(&bytes)
            .map_err(|e| DeferError::Serialization(format!("msgpack decode: {}", e)))
    }
}
