//! Serializer Registry
//!
//! Immutable name → serializer map, built once per facade instance.

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::Config;
use crate::error::{DeferError, Result};
use super::{JsonSerializer, MessagePackSerializer, Serializer};

/// Resolves item and metadata serializers by name
///
/// The map is populated at construction and never mutated afterwards, so a
/// registry can be cloned and shared freely between facades.
#[derive(Debug, Clone)]
pub struct SerializerRegistry {
    serializers: HashMap<String, Arc<dyn Serializer>>,
    preferred_item: Arc<dyn Serializer>,
    metadata: Arc<dyn Serializer>,
}

impl SerializerRegistry {
    /// Build a registry from a list of serializers
    ///
    /// Fails if a name is registered twice, if either the preferred item
    /// serializer or the metadata serializer is missing, or if both name the
    /// same serializer.
    pub fn new(
        serializers: Vec<Arc<dyn Serializer>>,
        preferred_item: &str,
        metadata: &str,
    ) -> Result<Self> {
        if preferred_item == metadata {
            return Err(DeferError::Config(format!(
                "metadata serializer must differ from the preferred item serializer: {}",
                metadata
            )));
        }

        let mut map: HashMap<String, Arc<dyn Serializer>> = HashMap::with_capacity(serializers.len());
        for serializer in serializers {
            let name = serializer.name().to_string();
            if map.insert(name.clone(), serializer).is_some() {
                return Err(DeferError::Config(format!(
                    "serializer registered twice: {}",
                    name
                )));
            }
        }

        let preferred_item = map.get(preferred_item).cloned().ok_or_else(|| {
            DeferError::Config(format!("unknown preferred item serializer: {}", preferred_item))
        })?;
        let metadata = map.get(metadata).cloned().ok_or_else(|| {
            DeferError::Config(format!("unknown metadata serializer: {}", metadata))
        })?;

        Ok(Self {
            serializers: map,
            preferred_item,
            metadata,
        })
    }

    /// Registry with the built-in serializers, bound per `config`
    pub fn with_defaults(config: &Config) -> Result<Self> {
        Self::new(
            vec![Arc::new(JsonSerializer), Arc::new(MessagePackSerializer)],
            &config.preferred_item_serializer,
            &config.metadata_serializer,
        )
    }

    /// Resolve the item serializer for `name`
    ///
    /// `None` or an unregistered name falls back to the preferred serializer.
    pub fn resolve_item(&self, name: Option<&str>) -> Arc<dyn Serializer> {
        match name {
            None => Arc::clone(&self.preferred_item),
            Some(name) => match self.serializers.get(name) {
                Some(serializer) => Arc::clone(serializer),
                None => {
                    tracing::warn!(
                        "Unknown item serializer '{}', falling back to '{}'",
                        name,
                        self.preferred_item.name()
                    );
                    Arc::clone(&self.preferred_item)
                }
            },
        }
    }

    /// The fixed metadata serializer
    pub fn metadata(&self) -> Arc<dyn Serializer> {
        Arc::clone(&self.metadata)
    }

    /// Name of the fixed metadata serializer
    pub fn metadata_name(&self) -> &str {
        self.metadata.name()
    }

    /// Look up a serializer by exact name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Serializer>> {
        self.serializers.get(name).cloned()
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.serializers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
