//! Storage Module
//!
//! Backing stores the write queue drains into.
//!
//! ## Responsibilities
//! - Define the minimal backing-store contract (load/clear/get/set/remove)
//! - File backing store: one container per namespace, one entry per data key
//! - In-memory backing store for hosts without a disk (and for tests)
//! - Platform capability for the physical folder/file primitives
//!
//! ## On-Disk Layout (file backing store)
//! ```text
//! {data_dir}/
//!   └── data/                      (data area)
//!         ├── todos/               (namespace container)
//!         │     ├── dG9kb3MjaXRlbTph.dat
//!         │     └── ...
//!         └── settings/
//! ```

mod platform;
mod manager;
mod file;
mod memory;

use std::collections::BTreeMap;

use crate::error::Result;

pub use platform::{LocalDisk, Platform};
pub use manager::NamespaceContainerManager;
pub use file::FileBackingStore;
pub use memory::MemoryBackingStore;

/// Result of reading one key from a backing store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawItem {
    /// Stored text, still serialized
    Text(String),

    /// No entry exists for the key
    Missing,

    /// Synthetic empty string (namespace marker keys)
    Blank,

    /// Synthetic empty sequence (index marker keys)
    EmptySequence,
}

/// Minimal persistence capability consumed by the storage facade
///
/// Item operations act on the namespace most recently passed to `load` or
/// `clear`. Implementations serialize namespace switches internally, but
/// writes queued before a switch land in whichever namespace is active when
/// they are applied.
pub trait BackingStore: Send + Sync + 'static {
    /// Activate `namespace` and return every raw entry in it
    fn load(&self, namespace: &str) -> Result<BTreeMap<String, String>>;

    /// Drop every entry of `namespace` and leave it active and empty
    fn clear(&self, namespace: &str) -> Result<()>;

    /// Store serialized text under `key`
    fn set_item(&self, key: &str, raw: &str) -> Result<()>;

    /// Remove `key`; removing a missing key is not an error
    fn remove_item(&self, key: &str) -> Result<()>;

    /// Read the serialized text stored under `key`
    fn get_item(&self, key: &str) -> Result<RawItem>;
}
