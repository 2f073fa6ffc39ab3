//! File Backing Store
//!
//! One physical entry per data key, inside the active namespace container.
//! Marker keys are absorbed here and never reach the platform.

use std::collections::BTreeMap;
use std::io;
use std::sync::Arc;

use crate::config::Config;
use crate::error::{DeferError, Result};
use crate::key::{encode_key, StorageKey};

use super::{BackingStore, LocalDisk, NamespaceContainerManager, Platform, RawItem};

/// Backing store persisting each data key as a file
///
/// File names are the base64 of the key, so on common filesystems a data
/// key may be at most [`MAX_KEY_LEN`](crate::key::MAX_KEY_LEN) bytes.
/// Longer keys fail with `WriteFailed` when saved.
pub struct FileBackingStore<P: Platform = LocalDisk> {
    containers: NamespaceContainerManager<P>,
    separator: char,
}

impl FileBackingStore<LocalDisk> {
    /// Open a store rooted at `config.data_dir` on the local disk
    pub fn open(config: &Config) -> Result<Self> {
        let disk = LocalDisk::new(&config.data_dir)?;
        Ok(Self::with_platform(disk, config))
    }
}

impl<P: Platform> FileBackingStore<P> {
    /// Build a store on top of an arbitrary platform
    pub fn with_platform(platform: P, config: &Config) -> Self {
        Self {
            containers: NamespaceContainerManager::new(Arc::new(platform), config.data_folder.clone()),
            separator: config.namespace_separator,
        }
    }

    /// Classify a logical key with this store's separator
    pub fn classify(&self, key: &str) -> StorageKey {
        StorageKey::classify(key, self.separator)
    }

    /// The container manager (for testing/debugging)
    pub fn containers(&self) -> &NamespaceContainerManager<P> {
        &self.containers
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn save(&self, key: &str, raw: &str) -> Result<()> {
        let active = self.containers.active()?;
        let platform = self.containers.platform();
        let name = encode_key(key);

        let file = match platform.open_file(&active.folder, &name) {
            Ok(file) => file,
            Err(_) => platform
                .create_file(&active.folder, &name)
                .map_err(|source| DeferError::WriteFailed {
                    key: key.to_string(),
                    source,
                })?,
        };

        platform
            .write_text(&file, raw)
            .map_err(|source| DeferError::WriteFailed {
                key: key.to_string(),
                source,
            })
    }

    fn delete(&self, key: &str) -> Result<()> {
        let active = self.containers.active()?;
        let platform = self.containers.platform();

        match platform.open_file(&active.folder, &encode_key(key)) {
            Ok(file) => Ok(platform.delete_file(file)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::trace!("Remove of missing key '{}' ignored", key);
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn read(&self, key: &str) -> Result<RawItem> {
        let active = self.containers.active()?;
        let platform = self.containers.platform();

        match platform.open_file(&active.folder, &encode_key(key)) {
            Ok(file) => Ok(RawItem::Text(platform.read_text(&file)?)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(RawItem::Missing),
            Err(e) => Err(e.into()),
        }
    }
}

impl<P: Platform> BackingStore for FileBackingStore<P> {
    fn load(&self, namespace: &str) -> Result<BTreeMap<String, String>> {
        self.containers.load(namespace)
    }

    fn clear(&self, namespace: &str) -> Result<()> {
        self.containers.clear(namespace)
    }

    fn set_item(&self, key: &str, raw: &str) -> Result<()> {
        match self.classify(key) {
            StorageKey::Data(key) => self.save(&key, raw),
            StorageKey::NamespaceMarker | StorageKey::IndexMarker => Ok(()),
        }
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        match self.classify(key) {
            StorageKey::Data(key) => self.delete(&key),
            StorageKey::NamespaceMarker | StorageKey::IndexMarker => Ok(()),
        }
    }

    fn get_item(&self, key: &str) -> Result<RawItem> {
        match self.classify(key) {
            StorageKey::Data(key) => self.read(&key),
            StorageKey::NamespaceMarker => Ok(RawItem::Blank),
            StorageKey::IndexMarker => Ok(RawItem::EmptySequence),
        }
    }
}
