//! Tests for StorageFacade
//!
//! These tests verify:
//! - set/remove are queued and applied in order on flush
//! - get reads the store directly (stale until the next flush)
//! - load strips key qualifiers and deserializes values
//! - clear empties a namespace
//! - Item serializer switching and metadata binding
//! - Shutdown semantics

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use deferkv::config::Config;
use deferkv::serializer::{JsonSerializer, MessagePackSerializer, Serializer, SerializerRegistry};
use deferkv::storage::{BackingStore, MemoryBackingStore};
use deferkv::{DeferError, StorageFacade};
use serde_json::json;

// =============================================================================
// Helper Functions
// =============================================================================

/// Facade whose background cycle effectively never fires; tests flush by hand
fn setup_manual_facade() -> StorageFacade<MemoryBackingStore> {
    let config = Config::builder().flush_interval(Duration::from_secs(3600)).build();
    let facade = StorageFacade::open(config, MemoryBackingStore::new()).unwrap();
    facade.load("ns").unwrap();
    facade
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// =============================================================================
// Queue Semantics Tests
// =============================================================================

#[test]
fn test_set_is_queued_not_written() {
    let facade = setup_manual_facade();

    facade.set_item("ns:a", &json!(1)).unwrap();

    assert_eq!(facade.pending(), 1);
    assert!(facade.store().entries("ns").is_empty());
}

#[test]
fn test_get_before_flush_sees_old_value() {
    let facade = setup_manual_facade();
    facade.set_item("ns:a", &json!("old")).unwrap();
    facade.flush().unwrap();

    facade.set_item("ns:a", &json!("new")).unwrap();

    assert_eq!(facade.get_item("ns:a").unwrap(), Some(json!("old")));
    facade.flush().unwrap();
    assert_eq!(facade.get_item("ns:a").unwrap(), Some(json!("new")));
}

#[test]
fn test_get_before_first_flush_is_none() {
    let facade = setup_manual_facade();
    facade.set_item("ns:a", &json!(1)).unwrap();

    assert_eq!(facade.get_item("ns:a").unwrap(), None);
}

#[test]
fn test_flush_applies_in_order_last_write_wins() {
    let facade = setup_manual_facade();
    facade.set_item("ns:a", &json!(1)).unwrap();
    facade.set_item("ns:b", &json!(2)).unwrap();
    facade.remove_item("ns:a").unwrap();
    facade.set_item("ns:b", &json!(3)).unwrap();
    facade.set_item("ns:c", &json!(4)).unwrap();
    facade.remove_item("ns:c").unwrap();

    let report = facade.flush().unwrap();

    assert_eq!(report.applied, 6);
    assert_eq!(facade.get_item("ns:a").unwrap(), None);
    assert_eq!(facade.get_item("ns:b").unwrap(), Some(json!(3)));
    assert_eq!(facade.get_item("ns:c").unwrap(), None);
    assert_eq!(facade.pending(), 0);
}

#[test]
fn test_background_flush_applies_without_manual_flush() {
    init_tracing();
    let config = Config::builder().flush_interval_ms(20).build();
    let facade = StorageFacade::open(config, MemoryBackingStore::new()).unwrap();
    facade.load("ns").unwrap();

    facade.set_item("itemA", &json!({"x": 1})).unwrap();

    let deadline = Instant::now() + Duration::from_secs(5);
    while facade.flush_stats().applied < 1 && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(5));
    }
    assert_eq!(facade.load("ns").unwrap()["itemA"], json!({"x": 1}));
}

#[test]
fn test_write_before_first_load_reaches_loaded_namespace() {
    let config = Config::builder().flush_interval_ms(50).build();
    let facade = StorageFacade::open(config, MemoryBackingStore::new()).unwrap();

    facade.set_item("itemA", &json!({"x": 1})).unwrap();
    thread::sleep(Duration::from_millis(150));

    let items = facade.load("ns").unwrap();
    assert_eq!(items.get("itemA"), Some(&json!({"x": 1})));
    assert_eq!(facade.flush_stats().failed, 0);

    facade.clear("ns").unwrap();
    assert!(facade.load("ns").unwrap().is_empty());
}

#[test]
fn test_flush_without_namespace_keeps_writes_queued() {
    let config = Config::builder().flush_interval(Duration::from_secs(3600)).build();
    let facade = StorageFacade::open(config, MemoryBackingStore::new()).unwrap();
    facade.set_item("a", &json!(1)).unwrap();
    facade.set_item("b", &json!(2)).unwrap();

    let report = facade.flush().unwrap();

    assert_eq!(report.applied, 0);
    assert_eq!(report.failed, 0);
    assert_eq!(report.deferred, 2);
    assert_eq!(facade.pending(), 2);
}

// =============================================================================
// Load / Clear Tests
// =============================================================================

#[test]
fn test_load_strips_qualifier() {
    let facade = setup_manual_facade();
    facade.set_item("ns:itemA", &json!({"a": true})).unwrap();
    facade.set_item("itemB", &json!([1, 2])).unwrap();
    facade.flush().unwrap();

    let items = facade.load("ns").unwrap();

    assert_eq!(items.len(), 2);
    assert_eq!(items["itemA"], json!({"a": true}));
    assert_eq!(items["itemB"], json!([1, 2]));
}

#[test]
fn test_load_uses_last_colon() {
    let facade = setup_manual_facade();
    facade.set_item("todos#item:sub:leaf", &json!("v")).unwrap();
    facade.flush().unwrap();

    let items = facade.load("ns").unwrap();

    assert_eq!(items.keys().collect::<Vec<_>>(), vec!["leaf"]);
}

#[test]
fn test_clear_then_load_is_empty() {
    let facade = setup_manual_facade();
    facade.set_item("ns:a", &json!(1)).unwrap();
    facade.flush().unwrap();

    facade.clear("ns").unwrap();

    assert!(facade.load("ns").unwrap().is_empty());
}

#[test]
fn test_clear_keeps_queued_writes() {
    let facade = setup_manual_facade();
    facade.set_item("ns:a", &json!(1)).unwrap();

    facade.clear("ns").unwrap();
    facade.flush().unwrap();

    assert_eq!(facade.load("ns").unwrap()["a"], json!(1));
}

#[test]
fn test_load_fails_on_undeserializable_entry() {
    let facade = setup_manual_facade();
    facade.store().set_item("ns:bad", "{not json").unwrap();

    assert!(matches!(facade.load("ns"), Err(DeferError::Serialization(_))));
}

// =============================================================================
// Serializer Tests
// =============================================================================

#[test]
fn test_default_serializers() {
    let facade = setup_manual_facade();

    assert_eq!(facade.item_serializer_name(), "json");
    assert_eq!(facade.metadata_serializer_name(), "msgpack");
}

#[test]
fn test_metadata_serializer_name_follows_registry() {
    let serializers: Vec<Arc<dyn Serializer>> =
        vec![Arc::new(JsonSerializer), Arc::new(MessagePackSerializer)];
    let registry = SerializerRegistry::new(serializers, "msgpack", "json").unwrap();
    let config = Config::builder().flush_interval(Duration::from_secs(3600)).build();

    let facade = StorageFacade::with_registry(config, registry, MemoryBackingStore::new()).unwrap();

    assert_eq!(facade.config().metadata_serializer, "msgpack");
    assert_eq!(facade.metadata_serializer_name(), "json");
    assert_eq!(facade.item_serializer_name(), "msgpack");
}

#[test]
fn test_switch_item_serializer() {
    let facade = setup_manual_facade();

    assert_eq!(facade.set_item_serializer(Some("msgpack")), "msgpack");
    facade.set_item("ns:a", &json!({"k": "v"})).unwrap();
    facade.flush().unwrap();

    let raw = facade.store().entries("ns")["ns:a"].clone();
    assert!(!raw.starts_with('{'));
    assert_eq!(facade.get_item("ns:a").unwrap(), Some(json!({"k": "v"})));
}

#[test]
fn test_unknown_serializer_falls_back_to_preferred() {
    let facade = setup_manual_facade();
    facade.set_item_serializer(Some("msgpack"));

    assert_eq!(facade.set_item_serializer(Some("yaml")), "json");
    assert_eq!(facade.item_serializer_name(), "json");
    assert_eq!(facade.set_item_serializer(None), "json");
}

#[test]
fn test_switch_does_not_reencode_persisted_values() {
    let facade = setup_manual_facade();
    facade.set_item("ns:a", &json!({"k": "v"})).unwrap();
    facade.flush().unwrap();

    facade.set_item_serializer(Some("msgpack"));

    assert!(facade.get_item("ns:a").is_err());
    facade.set_item_serializer(None);
    assert_eq!(facade.get_item("ns:a").unwrap(), Some(json!({"k": "v"})));
}

#[test]
fn test_metadata_written_through_with_metadata_serializer() {
    let facade = setup_manual_facade();

    facade.set_metadata("ns:meta", &json!({"version": 2})).unwrap();

    assert_eq!(facade.pending(), 0);
    let raw = facade.store().entries("ns")["ns:meta"].clone();
    assert!(!raw.starts_with('{'));
    assert_eq!(facade.get_metadata("ns:meta").unwrap(), Some(json!({"version": 2})));
}

#[test]
fn test_metadata_unaffected_by_item_serializer_switch() {
    let facade = setup_manual_facade();
    facade.set_metadata("ns:meta", &json!("m")).unwrap();

    facade.set_item_serializer(Some("json"));

    assert_eq!(facade.get_metadata("ns:meta").unwrap(), Some(json!("m")));
}

// =============================================================================
// Lifecycle Tests
// =============================================================================

#[test]
fn test_shutdown_flushes_and_rejects_new_writes() {
    let facade = setup_manual_facade();
    facade.set_item("ns:a", &json!(1)).unwrap();

    facade.shutdown();

    assert_eq!(facade.get_item("ns:a").unwrap(), Some(json!(1)));
    assert!(matches!(
        facade.set_item("ns:b", &json!(2)),
        Err(DeferError::SchedulerStopped)
    ));
    assert!(matches!(facade.remove_item("ns:a"), Err(DeferError::SchedulerStopped)));
}

#[test]
fn test_every_accepted_write_applied_across_shutdown() {
    let config = Config::builder().flush_interval_ms(1).build();
    let facade = Arc::new(StorageFacade::open(config, MemoryBackingStore::new()).unwrap());
    facade.load("ns").unwrap();
    let accepted = Arc::new(AtomicUsize::new(0));

    let writers: Vec<_> = (0..4)
        .map(|w| {
            let facade = Arc::clone(&facade);
            let accepted = Arc::clone(&accepted);
            thread::spawn(move || {
                for i in 0.. {
                    match facade.set_item(&format!("w{}:{}", w, i), &json!(i)) {
                        Ok(()) => {
                            accepted.fetch_add(1, Ordering::SeqCst);
                        }
                        Err(DeferError::SchedulerStopped) => break,
                        Err(e) => panic!("unexpected error: {}", e),
                    }
                }
            })
        })
        .collect();

    thread::sleep(Duration::from_millis(20));
    facade.shutdown();
    for writer in writers {
        writer.join().unwrap();
    }

    assert_eq!(facade.pending(), 0);
    assert_eq!(facade.store().entries("ns").len(), accepted.load(Ordering::SeqCst));
}

#[test]
fn test_shutdown_twice_is_fine() {
    let facade = setup_manual_facade();
    facade.shutdown();
    facade.shutdown();
}

#[test]
fn test_open_with_unknown_metadata_serializer_fails() {
    let config = Config::builder().metadata_serializer("yaml").build();
    let result = StorageFacade::open(config, MemoryBackingStore::new());

    assert!(matches!(result, Err(DeferError::Config(_))));
}
