//! Cart quantity counters over a key-value store.
//!
//! An increment is one `get` and one `set` on the same key: a missing or
//! empty entry becomes `"1"`, a count `n` becomes `n + 1`, and anything
//! else is handled by the configured [`MalformedPolicy`].

use cartstore_foundation::{
    DEGRADED_VALUE, Error, MalformedPolicy, ParsedQuantity, Quantity, QuantityConfig, Result,
    parse_quantity,
};
use tracing::{debug, warn};

use crate::kv::KeyValueStore;

/// Counts cart line items in a key-value store.
///
/// Increments take `&mut self`, so a single `QuantityStore` can never
/// interleave two read-modify-write cycles. Use
/// [`crate::SharedQuantityStore`] to count from several threads.
#[derive(Debug, Clone, Default)]
pub struct QuantityStore<S> {
    store: S,
    config: QuantityConfig,
}

impl<S: KeyValueStore> QuantityStore<S> {
    /// Creates a counter over `store` with the default configuration.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self::with_config(store, QuantityConfig::default())
    }

    /// Creates a counter over `store` with the given configuration.
    #[must_use]
    pub fn with_config(store: S, config: QuantityConfig) -> Self {
        Self { store, config }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &QuantityConfig {
        &self.config
    }

    /// Returns the underlying store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns the underlying store mutably.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Consumes the counter, returning the underlying store.
    #[must_use]
    pub fn into_inner(self) -> S {
        self.store
    }

    /// Adds one to the quantity stored under `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails to read or write, or if the
    /// stored value is malformed and the policy is
    /// [`MalformedPolicy::Reject`].
    pub fn increment(&mut self, id: &str) -> Result<()> {
        increment_with(&mut self.store, id, &self.config)
    }

    /// Reads the quantity stored under `id`.
    ///
    /// Absent, empty and malformed entries all read as `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails to read.
    pub fn quantity(&self, id: &str) -> Result<Option<Quantity>> {
        let raw = self.store.get(id).map_err(|e| e.during("quantity", id))?;
        Ok(match parse_quantity(raw.as_deref()) {
            ParsedQuantity::Count(q) => Some(q),
            ParsedQuantity::Absent | ParsedQuantity::Malformed => None,
        })
    }
}

/// Adds one to the quantity stored under `id` using the default policy.
///
/// # Errors
///
/// Returns an error if the store fails to read or write.
pub fn increment<S: KeyValueStore + ?Sized>(store: &mut S, id: &str) -> Result<()> {
    increment_with(store, id, &QuantityConfig::default())
}

pub(crate) fn increment_with<S: KeyValueStore + ?Sized>(
    store: &mut S,
    id: &str,
    config: &QuantityConfig,
) -> Result<()> {
    let raw = store.get(id).map_err(|e| e.during("increment", id))?;

    let next = match parse_quantity(raw.as_deref()) {
        ParsedQuantity::Absent => Quantity::ONE.to_string(),
        ParsedQuantity::Count(current) => match current.checked_next() {
            Some(next) => next.to_string(),
            None => {
                warn!(key = id, "quantity saturated");
                current.to_string()
            }
        },
        ParsedQuantity::Malformed => {
            let raw = raw.unwrap_or_default();
            match config.malformed {
                MalformedPolicy::ResetToZero => {
                    warn!(key = id, raw = %raw, "malformed quantity reset");
                    Quantity::ONE.to_string()
                }
                MalformedPolicy::Degrade => {
                    warn!(key = id, raw = %raw, "malformed quantity degraded");
                    DEGRADED_VALUE.to_string()
                }
                MalformedPolicy::Reject => {
                    return Err(Error::malformed_quantity(id, raw).during("increment", id));
                }
            }
        }
    };

    store.set(id, &next).map_err(|e| e.during("increment", id))?;
    debug!(key = id, value = %next, "incremented quantity");
    Ok(())
}
