//! JSON serializer

use serde_json::Value;

use crate::error::Result;
use super::Serializer;

/// Plain JSON text, registered as `json`
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSerializer;

impl JsonSerializer {
    pub const NAME: &'static str = "json";
}

impl Serializer for JsonSerializer {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn serialize(&self, value: &Value) -> Result<String> {
        Ok(serde_json::to_string(value)?)
    }

    fn deserialize(&self, raw: &str) -> Result<Value> {
        Ok(serde_json::from_str(raw)?)
    }
}
