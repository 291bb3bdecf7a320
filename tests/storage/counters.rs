//! Integration tests for quantity counters
//!
//! Tests the increment contract against an in-memory store.

use cartstore_foundation::{Quantity, QuantityConfig};
use cartstore_storage::{KeyValueStore, MemoryStore, QuantityStore, increment};

fn value(store: &MemoryStore, key: &str) -> Option<String> {
    store.get(key).unwrap()
}

// =============================================================================
// Increment Contract
// =============================================================================

#[test]
fn fresh_key_stores_one() {
    let mut store = MemoryStore::new();
    increment(&mut store, "sku-1").unwrap();
    assert_eq!(value(&store, "sku-1").as_deref(), Some("1"));
}

#[test]
fn repeated_increment_stores_call_count() {
    let mut counter = QuantityStore::new(MemoryStore::new());
    for _ in 0..25 {
        counter.increment("sku-1").unwrap();
    }
    assert_eq!(value(counter.store(), "sku-1").as_deref(), Some("25"));
}

#[test]
fn keys_are_independent() {
    let mut counter = QuantityStore::new(MemoryStore::new());
    counter.increment("sku-1").unwrap();
    counter.increment("sku-2").unwrap();

    assert_eq!(value(counter.store(), "sku-1").as_deref(), Some("1"));
    assert_eq!(value(counter.store(), "sku-2").as_deref(), Some("1"));
}

#[test]
fn other_keys_are_untouched() {
    let mut store = MemoryStore::new();
    store.set("theme", "dark").unwrap();
    store.set("sku-2", "5").unwrap();
    let before = store.snapshot();

    let mut counter = QuantityStore::new(store);
    counter.increment("sku-1").unwrap();

    let after = counter.store().snapshot();
    assert_eq!(after.get("theme"), before.get("theme"));
    assert_eq!(after.get("sku-2"), before.get("sku-2"));
    assert_eq!(after.len(), before.len() + 1);
}

#[test]
fn malformed_value_does_not_fail() {
    let mut store = MemoryStore::new();
    store.set("sku-1", "abc").unwrap();
    let mut counter = QuantityStore::new(store);

    assert!(counter.increment("sku-1").is_ok());
    assert_eq!(counter.quantity("sku-1").unwrap(), Some(Quantity::ONE));
}

#[test]
fn malformed_value_does_not_fail_under_legacy() {
    let mut store = MemoryStore::new();
    store.set("sku-1", "abc").unwrap();
    let mut counter = QuantityStore::with_config(store, QuantityConfig::legacy());

    assert!(counter.increment("sku-1").is_ok());
    assert_eq!(value(counter.store(), "sku-1").as_deref(), Some("NaN"));
}

#[test]
fn increment_returns_unit() {
    let mut counter = QuantityStore::new(MemoryStore::new());
    let () = counter.increment("sku-1").unwrap();
}

// =============================================================================
// Store Handles
// =============================================================================

#[test]
fn counter_over_borrowed_store() {
    let mut store = MemoryStore::new();
    {
        let mut counter = QuantityStore::new(&mut store);
        counter.increment("sku-1").unwrap();
        counter.increment("sku-1").unwrap();
    }
    assert_eq!(value(&store, "sku-1").as_deref(), Some("2"));
}

#[test]
fn counter_over_boxed_store() {
    let boxed: Box<dyn KeyValueStore> = Box::new(MemoryStore::new());
    let mut counter = QuantityStore::new(boxed);
    counter.increment("sku-1").unwrap();
    assert_eq!(counter.quantity("sku-1").unwrap(), Some(Quantity::ONE));
}

#[test]
fn into_inner_returns_store() {
    let mut counter = QuantityStore::new(MemoryStore::new());
    counter.increment("sku-1").unwrap();
    let store = counter.into_inner();
    assert_eq!(store.len(), 1);
}
