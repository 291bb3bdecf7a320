//! Configuration for quantity updates and persistent stores.

use std::path::PathBuf;

use crate::{Error, Result};

/// Byte quota a store gets unless told otherwise (5 MiB, the usual
/// per-origin browser allowance).
pub const DEFAULT_QUOTA_BYTES: usize = 5 * 1024 * 1024;

/// What an increment does when the stored value is not a count.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum MalformedPolicy {
    /// Treat the value as zero; the entry becomes `"1"`.
    #[default]
    ResetToZero,
    /// Store `"NaN"` for every malformed value, negatives and overflowing
    /// digit runs included.
    Degrade,
    /// Fail with [`crate::ErrorKind::MalformedQuantity`] and write nothing.
    Reject,
}

/// Configuration for quantity increments.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QuantityConfig {
    /// Handling of stored values that do not decode as a count.
    pub malformed: MalformedPolicy,
}

impl QuantityConfig {
    /// Creates a configuration that refuses to touch malformed entries.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            malformed: MalformedPolicy::Reject,
        }
    }

    /// Creates a configuration that degrades malformed entries to `"NaN"`.
    #[must_use]
    pub fn legacy() -> Self {
        Self {
            malformed: MalformedPolicy::Degrade,
        }
    }

    /// Builder method to set the malformed-value policy.
    #[must_use]
    pub fn with_malformed(mut self, policy: MalformedPolicy) -> Self {
        self.malformed = policy;
        self
    }
}

/// Configuration for an origin-scoped persistent store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreConfig {
    /// Directory holding one file per origin.
    pub root: PathBuf,
    /// The execution origin the store belongs to.
    pub origin: String,
    /// Maximum bytes of keys plus values, `None` for unlimited.
    pub quota_bytes: Option<usize>,
}

impl StoreConfig {
    /// Creates a configuration with the default quota.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, origin: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            origin: origin.into(),
            quota_bytes: Some(DEFAULT_QUOTA_BYTES),
        }
    }

    /// Builder method to set the byte quota.
    #[must_use]
    pub fn with_quota(mut self, bytes: usize) -> Self {
        self.quota_bytes = Some(bytes);
        self
    }

    /// Builder method to remove the byte quota.
    #[must_use]
    pub fn unlimited(mut self) -> Self {
        self.quota_bytes = None;
        self
    }

    /// Checks the configuration for values no store can work with.
    ///
    /// # Errors
    ///
    /// Returns an error if the origin is empty or the quota is zero.
    pub fn validate(&self) -> Result<()> {
        if self.origin.is_empty() {
            return Err(Error::invalid_config("origin must not be empty"));
        }
        if self.quota_bytes == Some(0) {
            return Err(Error::invalid_config("quota must be greater than zero"));
        }
        Ok(())
    }

    /// Returns the file this origin's entries live in.
    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.root.join(format!("{}.msgpack", sanitize_origin(&self.origin)))
    }
}

/// Maps an origin onto a file stem. Distinct origins may collide here,
/// so stores stamp their files with the full origin.
fn sanitize_origin(origin: &str) -> String {
    origin
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect()
}
