//! Thread-safe quantity counters.

use std::sync::{Arc, Mutex, MutexGuard};

use cartstore_foundation::{Error, Quantity, QuantityConfig, Result};

use crate::kv::KeyValueStore;
use crate::quantity::QuantityStore;

/// A cloneable handle to a [`QuantityStore`] shared between threads.
///
/// Every increment runs its read and write under one lock, so concurrent
/// increments of the same key are never lost.
#[derive(Debug)]
pub struct SharedQuantityStore<S> {
    inner: Arc<Mutex<QuantityStore<S>>>,
}

impl<S> Clone for SharedQuantityStore<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: KeyValueStore> SharedQuantityStore<S> {
    /// Creates a shared counter over `store` with the default configuration.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self::from_counter(QuantityStore::new(store))
    }

    /// Creates a shared counter over `store` with the given configuration.
    #[must_use]
    pub fn with_config(store: S, config: QuantityConfig) -> Self {
        Self::from_counter(QuantityStore::with_config(store, config))
    }

    /// Wraps an existing counter.
    #[must_use]
    pub fn from_counter(counter: QuantityStore<S>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(counter)),
        }
    }

    /// Adds one to the quantity stored under `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock is poisoned or the increment fails.
    pub fn increment(&self, id: &str) -> Result<()> {
        self.lock()?.increment(id)
    }

    /// Reads the quantity stored under `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock is poisoned or the store fails to read.
    pub fn quantity(&self, id: &str) -> Result<Option<Quantity>> {
        self.lock()?.quantity(id)
    }

    /// Runs `f` against the underlying store while holding the lock.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock is poisoned.
    pub fn with_store<R>(&self, f: impl FnOnce(&S) -> R) -> Result<R> {
        Ok(f(self.lock()?.store()))
    }

    fn lock(&self) -> Result<MutexGuard<'_, QuantityStore<S>>> {
        self.inner.lock().map_err(|_| Error::lock_poisoned())
    }
}
