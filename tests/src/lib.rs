//! Shared test harness for ringroute integration tests.
//!
//! Provides [`ReferenceRouter`], a second router written independently of
//! `ringroute-placement`: it keeps `(point, owner)` pairs, hashes through the
//! streaming MD5 and CRC-32 APIs, and finds the owner with a linear scan.
//! Agreement between the two on a large corpus is the parity check.

use std::collections::HashMap;

use ringroute_placement::{DEFAULT_REPLICAS, Ring};
use ringroute_types::Node;

/// Shard names used throughout the parity tests.
pub const CACHE_SHARDS: [&str; 3] = ["cache-a", "cache-b", "cache-c"];

/// Independent, deliberately simple ring router.
pub struct ReferenceRouter {
    /// Sorted points, duplicates retained.
    points: Vec<u32>,
    /// Point -> owner; later shards overwrite earlier ones.
    owners: HashMap<u32, String>,
}

impl ReferenceRouter {
    /// Place `replicas` points per shard, in shard order.
    pub fn new(shards: &[&str], replicas: usize) -> Self {
        let mut points = Vec::new();
        let mut owners = HashMap::new();
        for shard in shards {
            for i in 0..replicas {
                let mut ctx = md5::Context::new();
                ctx.consume(shard.as_bytes());
                ctx.consume(b":");
                ctx.consume(i.to_string().as_bytes());
                let digest = ctx.compute();
                let point = u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]);
                owners.insert(point, shard.to_string());
                points.push(point);
            }
        }
        points.sort();
        Self { points, owners }
    }

    /// Owner of `key`, or `None` on an empty ring.
    pub fn route(&self, key: &[u8]) -> Option<&str> {
        let mut hasher = crc32fast::Hasher::new();
        hasher.update(key);
        let hash = hasher.finalize();

        let point = self
            .points
            .iter()
            .find(|&&p| p >= hash)
            .or_else(|| self.points.first())?;
        self.owners.get(point).map(String::as_str)
    }

    /// Number of points placed.
    pub fn point_count(&self) -> usize {
        self.points.len()
    }
}

/// The three-shard ring with default replicas.
pub fn cache_ring() -> Ring<()> {
    Ring::build(CACHE_SHARDS.map(Node::named), DEFAULT_REPLICAS).expect("valid ring")
}

/// Generate `count` distinct keys of the form `key-<i>`.
pub fn numbered_keys(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("key-{i}")).collect()
}
