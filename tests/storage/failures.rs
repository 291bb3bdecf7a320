//! Integration tests for storage failure propagation and store access
//!
//! Tests that store errors surface from counters, and that each increment
//! touches the store exactly as often as it should.

use std::cell::RefCell;

use cartstore_foundation::{Error, ErrorKind, QuantityConfig, Result};
use cartstore_storage::{KeyValueStore, MemoryStore, QuantityStore};

/// A store whose reads or writes can be switched off.
#[derive(Default)]
struct FlakyStore {
    inner: MemoryStore,
    fail_reads: bool,
    fail_writes: bool,
}

impl KeyValueStore for FlakyStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        if self.fail_reads {
            return Err(Error::storage_unavailable("reads disabled"));
        }
        self.inner.get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        if self.fail_writes {
            return Err(Error::storage_unavailable("writes disabled"));
        }
        self.inner.set(key, value)
    }
}

/// A store call, tagged with the key it addressed.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    Get(String),
    Set(String),
}

/// A store that records every call made against it.
#[derive(Default)]
struct CountingStore {
    inner: MemoryStore,
    calls: RefCell<Vec<Call>>,
}

impl CountingStore {
    fn seeded(key: &str, value: &str) -> Self {
        let mut store = Self::default();
        store.inner.set(key, value).unwrap();
        store
    }

    fn take_calls(&self) -> Vec<Call> {
        self.calls.take()
    }
}

impl KeyValueStore for CountingStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.calls.borrow_mut().push(Call::Get(key.to_string()));
        self.inner.get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.calls.borrow_mut().push(Call::Set(key.to_string()));
        self.inner.set(key, value)
    }
}

fn get_then_set(key: &str) -> Vec<Call> {
    vec![Call::Get(key.to_string()), Call::Set(key.to_string())]
}

// =============================================================================
// Store Access
// =============================================================================

#[test]
fn fresh_key_is_one_get_and_one_set() {
    let mut counter = QuantityStore::new(CountingStore::default());
    counter.increment("sku-1").unwrap();
    assert_eq!(counter.store().take_calls(), get_then_set("sku-1"));
}

#[test]
fn existing_count_is_one_get_and_one_set() {
    let mut counter = QuantityStore::new(CountingStore::seeded("sku-1", "4"));
    counter.increment("sku-1").unwrap();
    assert_eq!(counter.store().take_calls(), get_then_set("sku-1"));
}

#[test]
fn malformed_value_is_one_get_and_one_set() {
    for config in [QuantityConfig::default(), QuantityConfig::legacy()] {
        let mut counter =
            QuantityStore::with_config(CountingStore::seeded("sku-1", "abc"), config);
        counter.increment("sku-1").unwrap();
        assert_eq!(counter.store().take_calls(), get_then_set("sku-1"));
    }
}

#[test]
fn rejected_malformed_value_is_never_written() {
    let mut counter =
        QuantityStore::with_config(CountingStore::seeded("sku-1", "abc"), QuantityConfig::strict());
    assert!(counter.increment("sku-1").is_err());
    assert_eq!(
        counter.store().take_calls(),
        vec![Call::Get("sku-1".to_string())]
    );
}

#[test]
fn quantity_never_writes() {
    let counter = QuantityStore::new(CountingStore::seeded("sku-1", "2"));
    counter.quantity("sku-1").unwrap();
    assert_eq!(
        counter.store().take_calls(),
        vec![Call::Get("sku-1".to_string())]
    );
}

// =============================================================================
// Failure Propagation
// =============================================================================

#[test]
fn read_failure_propagates() {
    let mut counter = QuantityStore::new(FlakyStore {
        fail_reads: true,
        ..FlakyStore::default()
    });

    let err = counter.increment("sku-1").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::StorageUnavailable(_)));
    let ctx = err.context.unwrap();
    assert_eq!(ctx.operation.as_deref(), Some("increment"));
    assert_eq!(ctx.key.as_deref(), Some("sku-1"));
}

#[test]
fn write_failure_propagates_and_leaves_value() {
    let mut counter = QuantityStore::new(FlakyStore::default());
    counter.increment("sku-1").unwrap();

    counter.store_mut().fail_writes = true;
    let err = counter.increment("sku-1").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::StorageUnavailable(_)));

    counter.store_mut().fail_writes = false;
    counter.increment("sku-1").unwrap();
    assert_eq!(counter.store().get("sku-1").unwrap().as_deref(), Some("2"));
}

#[test]
fn quota_failure_keeps_previous_value() {
    let mut counter = QuantityStore::new(MemoryStore::with_quota(8));
    for _ in 0..9 {
        counter.increment("sku-1").unwrap();
    }

    // "sku-1" + "10" is 7 bytes, still fine; a second key is not.
    counter.increment("sku-1").unwrap();
    let err = counter.increment("sku-2").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::QuotaExceeded { limit: 8, .. }));
    assert_eq!(counter.store().get("sku-1").unwrap().as_deref(), Some("10"));
    assert_eq!(counter.store().get("sku-2").unwrap(), None);
}

#[test]
fn quantity_read_failure_has_context() {
    let counter = QuantityStore::new(FlakyStore {
        fail_reads: true,
        ..FlakyStore::default()
    });

    let err = counter.quantity("sku-9").unwrap_err();
    assert_eq!(err.context.unwrap().operation.as_deref(), Some("quantity"));
}
