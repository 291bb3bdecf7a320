//! In-memory key-value store.
//!
//! Entries live in a persistent ordered map, so snapshots are O(1) and
//! share structure with the live store.

use cartstore_foundation::{Error, Result};
use im::OrdMap;

use crate::kv::KeyValueStore;

/// An in-memory store with optional byte quota accounting.
///
/// Usage is counted as the sum of key and value lengths in bytes, the
/// same rule browsers apply to local storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: OrdMap<String, String>,
    /// Bytes currently used by keys and values.
    used: usize,
    quota: Option<usize>,
}

impl MemoryStore {
    /// Creates an empty store without a quota.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store that refuses writes past `bytes`.
    #[must_use]
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            quota: Some(bytes),
            ..Self::default()
        }
    }

    /// Creates a store pre-populated with `entries`.
    ///
    /// Existing entries are accepted even if they already exceed the quota;
    /// only later writes that grow usage are refused.
    #[must_use]
    pub fn from_entries(entries: OrdMap<String, String>, quota: Option<usize>) -> Self {
        let used = entries.iter().map(|(k, v)| entry_size(k, v)).sum();
        Self {
            entries,
            used,
            quota,
        }
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the store holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the bytes used by keys and values.
    #[must_use]
    pub fn used_bytes(&self) -> usize {
        self.used
    }

    /// Returns the configured quota.
    #[must_use]
    pub fn quota(&self) -> Option<usize> {
        self.quota
    }

    /// Returns the entry map.
    #[must_use]
    pub fn entries(&self) -> &OrdMap<String, String> {
        &self.entries
    }

    /// Returns an independent copy of the current entries.
    #[must_use]
    pub fn snapshot(&self) -> OrdMap<String, String> {
        self.entries.clone()
    }

    /// Puts `key` back to `previous` without quota checks.
    ///
    /// Used to undo a write whose durable half failed.
    pub(crate) fn restore(&mut self, key: &str, previous: Option<String>) {
        let removed = match previous {
            Some(value) => {
                self.used += entry_size(key, &value);
                self.entries.insert(key.to_string(), value)
            }
            None => self.entries.remove(key),
        };
        if let Some(old) = removed {
            self.used -= entry_size(key, &old);
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let old_size = self.entries.get(key).map_or(0, |v| entry_size(key, v));
        let required = self.used - old_size + entry_size(key, value);

        if let Some(limit) = self.quota {
            if required > limit && required > self.used {
                return Err(Error::quota_exceeded(key, limit, required));
            }
        }

        self.entries.insert(key.to_string(), value.to_string());
        self.used = required;
        Ok(())
    }
}

fn entry_size(key: &str, value: &str) -> usize {
    key.len() + value.len()
}
