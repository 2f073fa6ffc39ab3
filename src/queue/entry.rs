//! Queue entry definitions
//!
//! Defines the structure of individual pending mutations.

use serde::{Deserialize, Serialize};

/// Kind of mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Set,
    Remove,
}

/// A single pending mutation; immutable once queued
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum QueueEntry {
    /// Store already-serialized text under a key
    Set { key: String, payload: String },

    /// Remove a key
    Remove { key: String },
}

impl QueueEntry {
    pub fn set(key: impl Into<String>, payload: impl Into<String>) -> Self {
        QueueEntry::Set {
            key: key.into(),
            payload: payload.into(),
        }
    }

    pub fn remove(key: impl Into<String>) -> Self {
        QueueEntry::Remove { key: key.into() }
    }

    /// The key this entry targets
    pub fn key(&self) -> &str {
        match self {
            QueueEntry::Set { key, .. } | QueueEntry::Remove { key } => key,
        }
    }

    pub fn action(&self) -> Action {
        match self {
            QueueEntry::Set { .. } => Action::Set,
            QueueEntry::Remove { .. } => Action::Remove,
        }
    }
}
