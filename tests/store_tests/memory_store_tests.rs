//! Tests for MemoryBackingStore
//!
//! These tests verify:
//! - Keys are stored verbatim, markers included
//! - Namespace isolation and switching
//! - Clear semantics

use deferkv::storage::{BackingStore, MemoryBackingStore, RawItem};
use deferkv::DeferError;

// =============================================================================
// Basic Operations Tests
// =============================================================================

#[test]
fn test_set_get_remove() {
    let store = MemoryBackingStore::new();
    store.load("ns").unwrap();

    store.set_item("itemA", "1").unwrap();
    assert_eq!(store.get_item("itemA").unwrap(), RawItem::Text("1".into()));

    store.remove_item("itemA").unwrap();
    assert_eq!(store.get_item("itemA").unwrap(), RawItem::Missing);
}

#[test]
fn test_keys_stored_verbatim() {
    let store = MemoryBackingStore::new();
    store.load("ns").unwrap();

    store.set_item("itemB", "b").unwrap();
    store.set_item("ns#index:primary", "[]").unwrap();

    let entries = store.entries("ns");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries["ns#index:primary"], "[]");
}

#[test]
fn test_operations_without_namespace_fail() {
    let store = MemoryBackingStore::new();

    assert!(matches!(store.set_item("k", "v"), Err(DeferError::NoActiveNamespace)));
    assert!(matches!(store.get_item("k"), Err(DeferError::NoActiveNamespace)));
    assert!(matches!(store.remove_item("k"), Err(DeferError::NoActiveNamespace)));
    assert!(store.is_empty());
}

// =============================================================================
// Namespace Tests
// =============================================================================

#[test]
fn test_namespaces_are_isolated() {
    let store = MemoryBackingStore::new();

    store.load("a").unwrap();
    store.set_item("k", "in a").unwrap();
    store.load("b").unwrap();
    store.set_item("k", "in b").unwrap();

    assert_eq!(store.entries("a")["k"], "in a");
    assert_eq!(store.entries("b")["k"], "in b");
    assert_eq!(store.len(), 2);
    assert_eq!(store.namespace().as_deref(), Some("b"));
}

#[test]
fn test_load_returns_snapshot() {
    let store = MemoryBackingStore::new();
    store.load("ns").unwrap();
    store.set_item("k", "v").unwrap();

    let loaded = store.load("ns").unwrap();

    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded["k"], "v");
}

#[test]
fn test_clear_empties_and_activates() {
    let store = MemoryBackingStore::new();
    store.load("ns").unwrap();
    store.set_item("k", "v").unwrap();
    store.load("other").unwrap();

    store.clear("ns").unwrap();

    assert_eq!(store.namespace().as_deref(), Some("ns"));
    assert!(store.load("ns").unwrap().is_empty());
}
