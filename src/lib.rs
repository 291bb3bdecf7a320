//! cartstore - Persistent per-item quantity counters
//!
//! This crate re-exports all layers of cartstore for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 1: cartstore_storage    - Key-value stores, quantity counters
//! Layer 0: cartstore_foundation - Core types (Quantity, Error, config)
//! ```

pub use cartstore_foundation as foundation;
pub use cartstore_storage as storage;
