//! Core types, errors, quantity parsing, and configuration for cartstore.
//!
//! This crate provides:
//! - [`Quantity`] - A cart line item count
//! - [`parse_quantity`] - Lenient decoding of stored quantity strings
//! - [`Error`] - Rich error types with context
//! - [`QuantityConfig`] and [`StoreConfig`] - Builder-style configuration

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod error;
pub mod quantity;

pub use config::{DEFAULT_QUOTA_BYTES, MalformedPolicy, QuantityConfig, StoreConfig};
pub use error::{Error, ErrorContext, ErrorKind};
pub use quantity::{DEGRADED_VALUE, ParsedQuantity, Quantity, parse_quantity};

/// Result type alias using the cartstore [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
