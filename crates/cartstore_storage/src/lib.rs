//! Key-value stores and cart quantity counters for cartstore.
//!
//! This crate provides:
//! - [`KeyValueStore`] - The synchronous string store counters run against
//! - [`MemoryStore`] - In-memory store with an optional byte quota
//! - [`FileStore`] - Origin-scoped store persisted as `MessagePack`
//! - [`QuantityStore`] - Read-increment-write counters over any store
//! - [`SharedQuantityStore`] - Thread-safe counters with no lost updates

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod file;
pub mod kv;
pub mod memory;
pub mod quantity;
pub mod shared;

pub use file::FileStore;
pub use kv::KeyValueStore;
pub use memory::MemoryStore;
pub use quantity::{QuantityStore, increment};
pub use shared::SharedQuantityStore;
