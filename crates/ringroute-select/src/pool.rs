//! Per-shard handle pools and read policies.

use std::sync::Arc;

use serde::Deserialize;

/// Seed for the replica-choice CRC. Any value other than the ring's key hash
/// state works; it only needs to stay fixed.
const REPLICA_SEED: u32 = 0x5bd1_e995;

/// A backend handle that holds releasable resources.
pub trait BackendHandle: Send + Sync {
    /// Release the underlying resources (connections, sockets).
    fn close(&self);
}

/// How reads choose among a shard's handles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadPolicy {
    /// Reads go to the primary, like writes.
    #[default]
    Primary,
    /// Reads go to a replica chosen by a seeded hash of the key.
    ///
    /// The same key always reads from the same replica while the pool is
    /// unchanged. Falls back to the primary when the shard has no replicas.
    ReplicaHash,
    /// Reads rotate over the primary and all replicas.
    RoundRobin,
}

/// Primary and read-replica handles for one shard.
#[derive(Debug)]
pub struct ShardPool<C> {
    primary: Arc<C>,
    replicas: Vec<Arc<C>>,
}

impl<C> ShardPool<C> {
    /// A pool with only a primary.
    pub fn new(primary: C) -> Self {
        Self::with_replicas(primary, Vec::new())
    }

    /// A pool with a primary and read replicas.
    pub fn with_replicas(primary: C, replicas: Vec<C>) -> Self {
        Self {
            primary: Arc::new(primary),
            replicas: replicas.into_iter().map(Arc::new).collect(),
        }
    }

    /// The handle that takes writes.
    pub fn primary(&self) -> &Arc<C> {
        &self.primary
    }

    /// Read-replica handles.
    pub fn replicas(&self) -> &[Arc<C>] {
        &self.replicas
    }

    /// Number of handles (primary plus replicas).
    pub fn len(&self) -> usize {
        1 + self.replicas.len()
    }

    /// A pool always has a primary.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// All handles, primary first.
    pub fn handles(&self) -> impl Iterator<Item = &Arc<C>> {
        std::iter::once(&self.primary).chain(self.replicas.iter())
    }

    /// Pick the handle a read of `key` should use.
    ///
    /// `tick` drives [`ReadPolicy::RoundRobin`] and is ignored otherwise.
    pub(crate) fn pick_read(&self, key: &[u8], policy: ReadPolicy, tick: usize) -> &Arc<C> {
        match policy {
            ReadPolicy::Primary => &self.primary,
            ReadPolicy::ReplicaHash => {
                if self.replicas.is_empty() {
                    return &self.primary;
                }
                let slot = replica_slot(key, self.replicas.len());
                &self.replicas[slot]
            }
            ReadPolicy::RoundRobin => match tick % self.len() {
                0 => &self.primary,
                n => &self.replicas[n - 1],
            },
        }
    }
}

impl<C> Clone for ShardPool<C> {
    fn clone(&self) -> Self {
        Self {
            primary: self.primary.clone(),
            replicas: self.replicas.clone(),
        }
    }
}

/// Replica index for `key` among `count` replicas.
fn replica_slot(key: &[u8], count: usize) -> usize {
    let mut hasher = crc32fast::Hasher::new_with_initial(REPLICA_SEED);
    hasher.update(key);
    hasher.finalize() as usize % count
}
