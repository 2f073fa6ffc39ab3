//! In-memory backing store
//!
//! BTreeMap-per-namespace store behind a single RwLock. Keys are stored
//! verbatim: no marker classification, no encoding.

use std::collections::BTreeMap;

use parking_lot::RwLock;

use crate::error::{DeferError, Result};

use super::{BackingStore, RawItem};

#[derive(Debug, Default)]
struct MemoryState {
    namespaces: BTreeMap<String, BTreeMap<String, String>>,
    active: Option<String>,
}

impl MemoryState {
    fn active_mut(&mut self) -> Result<&mut BTreeMap<String, String>> {
        let namespace = self.active.clone().ok_or(DeferError::NoActiveNamespace)?;
        Ok(self.namespaces.entry(namespace).or_default())
    }
}

/// Backing store holding everything in process memory
#[derive(Debug, Default)]
pub struct MemoryBackingStore {
    state: RwLock<MemoryState>,
}

impl MemoryBackingStore {
    /// Create an empty store with no active namespace
    pub fn new() -> Self {
        Self::default()
    }

    /// Name of the active namespace, if any
    pub fn namespace(&self) -> Option<String> {
        self.state.read().active.clone()
    }

    /// Snapshot of one namespace's raw entries (for testing/debugging)
    pub fn entries(&self, namespace: &str) -> BTreeMap<String, String> {
        self.state
            .read()
            .namespaces
            .get(namespace)
            .cloned()
            .unwrap_or_default()
    }

    /// Total entry count across namespaces
    pub fn len(&self) -> usize {
        self.state.read().namespaces.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl BackingStore for MemoryBackingStore {
    fn load(&self, namespace: &str) -> Result<BTreeMap<String, String>> {
        let mut state = self.state.write();
        state.active = Some(namespace.to_string());
        Ok(state.namespaces.entry(namespace.to_string()).or_default().clone())
    }

    fn clear(&self, namespace: &str) -> Result<()> {
        let mut state = self.state.write();
        state.namespaces.insert(namespace.to_string(), BTreeMap::new());
        state.active = Some(namespace.to_string());
        Ok(())
    }

    fn set_item(&self, key: &str, raw: &str) -> Result<()> {
        self.state
            .write()
            .active_mut()?
            .insert(key.to_string(), raw.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.state.write().active_mut()?.remove(key);
        Ok(())
    }

    fn get_item(&self, key: &str) -> Result<RawItem> {
        let state = self.state.read();
        let namespace = state.active.as_ref().ok_or(DeferError::NoActiveNamespace)?;
        Ok(state
            .namespaces
            .get(namespace)
            .and_then(|entries| entries.get(key))
            .map(|raw| RawItem::Text(raw.clone()))
            .unwrap_or(RawItem::Missing))
    }
}
