//! Storage Facade
//!
//! The public surface: serialization in front, write-behind queue in the
//! middle, a backing store behind.
//!
//! ## Responsibilities
//! - Serialize values with the active item serializer (or the metadata one)
//! - Queue item writes; apply them later through the flush scheduler
//! - Read items and whole namespaces straight from the backing store
//! - Own the flush scheduler's lifecycle

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use serde_json::Value;

use crate::config::Config;
use crate::error::Result;
use crate::key::short_key;
use crate::queue::{CycleReport, FlushScheduler, FlushStats, Flusher, WriteQueue};
use crate::serializer::{Serializer, SerializerRegistry};
use crate::storage::{BackingStore, RawItem};

/// Write-behind key-value facade over a backing store
///
/// ## Read/Write Model
///
/// - **Item writes** (`set_item` / `remove_item`): appended to the write
///   queue and return immediately. A background cycle applies them in
///   submission order every `flush_interval`.
/// - **Reads** (`get_item` / `load`): go straight to the backing store and
///   never consult the queue. A read that follows a write observes the old
///   value until the next cycle has run.
/// - **Metadata** (`set_metadata` / `get_metadata`): fixed metadata
///   serializer, written through to the store immediately.
///
/// Changing the item serializer does not re-encode values that are already
/// queued or persisted; reading those back with a different serializer
/// will fail or return garbage.
pub struct StorageFacade<B: BackingStore> {
    /// Facade configuration
    config: Config,

    /// Name → serializer map, immutable after construction
    registry: SerializerRegistry,

    /// Serializer bound to item get/set
    item_serializer: RwLock<Arc<dyn Serializer>>,

    /// Pending item mutations
    queue: Arc<WriteQueue>,

    /// Applies queued mutations to the store
    flusher: Arc<Flusher<B>>,

    /// Background flush thread
    scheduler: Mutex<FlushScheduler>,
}

impl<B: BackingStore> StorageFacade<B> {
    /// Open a facade with the built-in serializers and start flushing
    pub fn open(config: Config, store: B) -> Result<Self> {
        let registry = SerializerRegistry::with_defaults(&config)?;
        Self::with_registry(config, registry, store)
    }

    /// Open a facade with a caller-supplied serializer registry
    pub fn with_registry(config: Config, registry: SerializerRegistry, store: B) -> Result<Self> {
        let queue = Arc::new(WriteQueue::new());
        let flusher = Arc::new(Flusher::new(
            Arc::clone(&queue),
            Arc::new(store),
            config.failure_policy,
        ));
        let scheduler = FlushScheduler::start(
            Arc::clone(&flusher),
            config.flush_interval,
            config.flush_on_shutdown,
        )?;
        let item_serializer = registry.resolve_item(None);

        Ok(Self {
            config,
            registry,
            item_serializer: RwLock::new(item_serializer),
            queue,
            flusher,
            scheduler: Mutex::new(scheduler),
        })
    }

    // =========================================================================
    // Items
    // =========================================================================

    /// Serialize `value` and queue it for `key`
    pub fn set_item(&self, key: &str, value: &Value) -> Result<()> {
        let payload = self.item_serializer().serialize(value)?;
        self.queue.enqueue_set(key, payload)
    }

    /// Queue removal of `key`
    pub fn remove_item(&self, key: &str) -> Result<()> {
        self.queue.enqueue_remove(key)
    }

    /// Read `key` from the backing store
    ///
    /// Returns `None` if nothing is stored. Namespace marker keys read as
    /// `""`, index marker keys as `[]`.
    pub fn get_item(&self, key: &str) -> Result<Option<Value>> {
        let serializer = self.item_serializer();
        self.read_with(serializer.as_ref(), key)
    }

    // =========================================================================
    // Metadata
    // =========================================================================

    /// Serialize `value` with the metadata serializer and store it now
    pub fn set_metadata(&self, key: &str, value: &Value) -> Result<()> {
        let payload = self.registry.metadata().serialize(value)?;
        self.flusher.store().set_item(key, &payload)
    }

    /// Read `key` with the metadata serializer
    pub fn get_metadata(&self, key: &str) -> Result<Option<Value>> {
        let serializer = self.registry.metadata();
        self.read_with(serializer.as_ref(), key)
    }

    // =========================================================================
    // Namespaces
    // =========================================================================

    /// Load every item of `namespace`, keyed by short key
    ///
    /// "todos#item:a" is returned as "a"; keys without `:` are unchanged.
    /// Never runs concurrently with a flush cycle. Writes queued before any
    /// namespace was active are applied to `namespace` first.
    pub fn load(&self, namespace: &str) -> Result<BTreeMap<String, Value>> {
        let serializer = self.item_serializer();
        let raw = self.flusher.switch_namespace(|store| store.load(namespace))?;

        let mut items = BTreeMap::new();
        for (key, text) in raw {
            let value = serializer.deserialize(&text)?;
            items.insert(short_key(&key).to_string(), value);
        }
        Ok(items)
    }

    /// Remove every item of `namespace`
    ///
    /// Writes still queued are not dropped; they apply on the next cycle.
    pub fn clear(&self, namespace: &str) -> Result<()> {
        self.flusher.switch_namespace(|store| store.clear(namespace))
    }

    // =========================================================================
    // Serializers
    // =========================================================================

    /// Name of the active item serializer
    pub fn item_serializer_name(&self) -> String {
        self.item_serializer.read().name().to_string()
    }

    /// Bind item get/set to `name`, or to the preferred serializer
    ///
    /// Unknown names fall back to the preferred serializer. Returns the
    /// name actually bound.
    pub fn set_item_serializer(&self, name: Option<&str>) -> String {
        let serializer = self.registry.resolve_item(name);
        let bound = serializer.name().to_string();
        *self.item_serializer.write() = serializer;
        bound
    }

    /// Name of the fixed metadata serializer
    pub fn metadata_serializer_name(&self) -> &str {
        self.registry.metadata_name()
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Run a flush cycle now, on the calling thread
    pub fn flush(&self) -> Result<CycleReport> {
        self.flusher.run_cycle()
    }

    /// Stop accepting writes and stop the flush thread
    ///
    /// With `flush_on_shutdown`, queued writes are applied before return.
    pub fn shutdown(&self) {
        self.queue.close();
        self.scheduler.lock().stop();
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Number of writes waiting for the next cycle
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Flush totals since open
    pub fn flush_stats(&self) -> FlushStats {
        self.flusher.stats()
    }

    /// The backing store
    pub fn store(&self) -> &B {
        self.flusher.store()
    }

    /// The serializer registry
    pub fn registry(&self) -> &SerializerRegistry {
        &self.registry
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn item_serializer(&self) -> Arc<dyn Serializer> {
        self.item_serializer.read().clone()
    }

    fn read_with(&self, serializer: &dyn Serializer, key: &str) -> Result<Option<Value>> {
        match self.flusher.store().get_item(key)? {
            RawItem::Text(text) => Ok(Some(serializer.deserialize(&text)?)),
            RawItem::Missing => Ok(None),
            RawItem::Blank => Ok(Some(Value::String(String::new()))),
            RawItem::EmptySequence => Ok(Some(Value::Array(Vec::new()))),
        }
    }
}

impl<B: BackingStore> Drop for StorageFacade<B> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
