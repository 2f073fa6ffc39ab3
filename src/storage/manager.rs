//! Namespace Container Manager
//!
//! Manages the physical container behind each namespace.
//!
//! ## Responsibilities
//! - Get-or-create the data area and namespace containers
//! - Track the single active namespace container
//! - Enumerate and read every entry of a namespace on load
//! - Delete and recreate a namespace container on clear

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::error::{DeferError, Result};
use crate::key::decode_entry_name;

use super::Platform;

/// The container item operations currently act on
#[derive(Debug, Clone)]
pub struct ActiveContainer<F> {
    pub namespace: String,
    pub folder: F,
}

/// Manages namespace containers on top of a platform
///
/// ## Concurrency:
/// - `switch_lock`: serializes `load` / `clear` (namespace switches)
/// - `active`: RwLock read by every item operation, replaced in a single
///   write once the new container exists
/// - All methods use `&self`
pub struct NamespaceContainerManager<P: Platform> {
    /// Physical primitives
    platform: Arc<P>,

    /// Name of the data area under the platform root
    data_folder: String,

    /// Active namespace container, if any
    active: RwLock<Option<ActiveContainer<P::Folder>>>,

    /// Held for the whole of a namespace switch
    switch_lock: Mutex<()>,
}

impl<P: Platform> NamespaceContainerManager<P> {
    /// Create a manager with no active namespace
    pub fn new(platform: Arc<P>, data_folder: impl Into<String>) -> Self {
        Self {
            platform,
            data_folder: data_folder.into(),
            active: RwLock::new(None),
            switch_lock: Mutex::new(()),
        }
    }

    /// Open `name` under `parent`, creating it if it cannot be opened
    pub fn get_or_create(&self, parent: &P::Folder, name: &str) -> Result<P::Folder> {
        match self.platform.open_folder(parent, name) {
            Ok(folder) => Ok(folder),
            Err(open_err) => {
                tracing::debug!("Folder '{}' not opened ({}), creating", name, open_err);
                self.platform
                    .create_folder(parent, name)
                    .map_err(|source| DeferError::ContainerUnavailable {
                        subfolder: name.to_string(),
                        source,
                    })
            }
        }
    }

    /// Activate `namespace` and read every entry in its container
    ///
    /// Returns logical key → raw text. Entries whose names don't decode
    /// are skipped.
    pub fn load(&self, namespace: &str) -> Result<BTreeMap<String, String>> {
        validate_namespace(namespace)?;
        let _switch = self.switch_lock.lock();

        let data = self.data_area()?;
        let folder = self.get_or_create(&data, namespace)?;
        self.set_active(namespace, &folder);

        let mut entries = BTreeMap::new();
        for name in self.platform.list_files(&folder)? {
            let key = match decode_entry_name(&name) {
                Ok(key) => key,
                Err(e) => {
                    tracing::warn!("Skipping entry in namespace '{}': {}", namespace, e);
                    continue;
                }
            };
            let file = self.platform.open_file(&folder, &name)?;
            let text = self.platform.read_text(&file)?;
            entries.insert(key, text);
        }

        tracing::debug!("Loaded {} entries from namespace '{}'", entries.len(), namespace);
        Ok(entries)
    }

    /// Delete `namespace`'s container (if any) and recreate it empty
    ///
    /// After return the container exists, is empty, and is active.
    pub fn clear(&self, namespace: &str) -> Result<()> {
        validate_namespace(namespace)?;
        let _switch = self.switch_lock.lock();

        // Item operations wait while the container is being replaced
        let mut active = self.active.write();

        let data = self.data_area()?;
        if let Ok(existing) = self.platform.open_folder(&data, namespace) {
            if active.as_ref().is_some_and(|a| a.namespace == namespace) {
                *active = None;
            }
            self.platform.delete_folder(&existing)?;
        }

        let folder = self.get_or_create(&data, namespace)?;
        *active = Some(ActiveContainer {
            namespace: namespace.to_string(),
            folder,
        });
        tracing::debug!("Cleared namespace '{}'", namespace);
        Ok(())
    }

    /// The active container
    pub fn active(&self) -> Result<ActiveContainer<P::Folder>> {
        self.active.read().clone().ok_or(DeferError::NoActiveNamespace)
    }

    /// Name of the active namespace, if any
    pub fn namespace(&self) -> Option<String> {
        self.active.read().as_ref().map(|a| a.namespace.clone())
    }

    /// The platform this manager operates on
    pub fn platform(&self) -> &P {
        &self.platform
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn data_area(&self) -> Result<P::Folder> {
        let root = self.platform.root();
        self.get_or_create(&root, &self.data_folder)
    }

    /// Swap in a fully built container in one write
    fn set_active(&self, namespace: &str, folder: &P::Folder) {
        *self.active.write() = Some(ActiveContainer {
            namespace: namespace.to_string(),
            folder: folder.clone(),
        });
    }
}

/// Namespaces become folder names, so they must be a single path component
fn validate_namespace(namespace: &str) -> Result<()> {
    let invalid = namespace.is_empty()
        || namespace == "."
        || namespace == ".."
        || namespace.contains(['/', '\\', '\0']);
    if invalid {
        return Err(DeferError::InvalidNamespace(namespace.to_string()));
    }
    Ok(())
}
