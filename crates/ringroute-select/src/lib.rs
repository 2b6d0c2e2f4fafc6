//! Shard client selection layered on the placement ring.
//!
//! This crate provides:
//!
//! - [`ShardSelector`] — resolves a key to its shard through the ring, then
//!   hands out the backend handle to use for a write or a read.
//! - [`ShardPool`] — the primary handle and read replicas of one shard.
//! - [`ReadPolicy`] — how reads pick among a shard's handles.
//!
//! Shard resolution always goes through the ring unchanged. Replica choice is
//! a second, independent step and never feeds back into it.

mod error;
mod pool;
mod selector;


pub use error::SelectError;
pub use pool::{BackendHandle, ReadPolicy, ShardPool};
pub use selector::{Route, ShardSelector};
