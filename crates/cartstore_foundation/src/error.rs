//! Error types for cartstore.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.

use std::fmt;

use thiserror::Error;

/// The main error type for cartstore operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Records the operation and key the error surfaced from.
    ///
    /// Keeps any context that is already attached.
    #[must_use]
    pub fn during(self, operation: &str, key: &str) -> Self {
        if self.context.is_some() {
            return self;
        }
        self.with_context(ErrorContext::new().with_operation(operation).with_key(key))
    }

    /// Creates a quota exceeded error.
    #[must_use]
    pub fn quota_exceeded(key: impl Into<String>, limit: usize, required: usize) -> Self {
        Self::new(ErrorKind::QuotaExceeded {
            key: key.into(),
            limit,
            required,
        })
    }

    /// Creates a storage unavailable error.
    #[must_use]
    pub fn storage_unavailable(reason: impl Into<String>) -> Self {
        Self::new(ErrorKind::StorageUnavailable(reason.into()))
    }

    /// Creates an I/O error.
    #[must_use]
    pub fn io(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::IoError(message.into()))
    }

    /// Creates a serialization error.
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::SerializationError(message.into()))
    }

    /// Creates a malformed quantity error.
    #[must_use]
    pub fn malformed_quantity(key: impl Into<String>, raw: impl Into<String>) -> Self {
        Self::new(ErrorKind::MalformedQuantity {
            key: key.into(),
            raw: raw.into(),
        })
    }

    /// Creates a lock poisoned error.
    #[must_use]
    pub fn lock_poisoned() -> Self {
        Self::new(ErrorKind::LockPoisoned)
    }

    /// Creates an invalid configuration error.
    #[must_use]
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidConfig(message.into()))
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// A write would push the store past its byte quota.
    #[error("quota exceeded writing '{key}': {required} bytes needed, limit is {limit}")]
    QuotaExceeded {
        /// The key being written.
        key: String,
        /// The configured quota in bytes.
        limit: usize,
        /// The usage the write would have produced.
        required: usize,
    },

    /// The backing storage cannot be used.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(String),

    /// Serialization or deserialization error.
    #[error("serialization error: {0}")]
    SerializationError(String),

    /// A stored quantity could not be parsed and the policy rejects it.
    #[error("malformed quantity for '{key}': {raw:?}")]
    MalformedQuantity {
        /// The key holding the malformed value.
        key: String,
        /// The raw stored value.
        raw: String,
    },

    /// A thread panicked while holding the store lock.
    #[error("store lock poisoned")]
    LockPoisoned,

    /// Configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// The store operation that failed (`increment`, `quantity`, `flush`).
    pub operation: Option<String>,
    /// The key the operation was working on.
    pub key: Option<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the operation name.
    #[must_use]
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }

    /// Sets the key.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.operation, &self.key) {
            (Some(op), Some(key)) => write!(f, "in {op} of '{key}'"),
            (Some(op), None) => write!(f, "in {op}"),
            (None, Some(key)) => write!(f, "at '{key}'"),
            (None, None) => Ok(()),
        }
    }
}
