//! Consistent hashing ring for deterministic key-to-node routing.
//!
//! This crate implements a ring that maps arbitrary byte keys to named nodes
//! so that independent implementations agree on every routing decision.
//!
//! Each node is placed on a 32-bit ring at `R` virtual points. A point is the
//! first four bytes (big-endian) of `md5("<name>:<i>")`. A key is placed at
//! `crc32(key)` and owned by the first point at or after it, wrapping to the
//! smallest point past the end of the ring.
//!
//! - [`Ring`] — immutable ring built once from an ordered node list.
//! - [`SharedRing`] — atomically swappable handle for rebuild-on-change.
//! - [`server_hash`] / [`key_hash`] — the two hash functions of the contract.

mod error;
mod hash;
mod ring;
mod shared;

pub use error::RingError;
pub use hash::{key_hash, server_hash, virtual_key};
pub use ring::{DEFAULT_REPLICAS, Ring};
pub use shared::SharedRing;
