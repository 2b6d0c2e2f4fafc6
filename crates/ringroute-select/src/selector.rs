//! Key-to-backend selection.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use ringroute_placement::{Ring, SharedRing};
use ringroute_types::{Node, NodeName};
use tracing::{debug, info};

use crate::error::SelectError;
use crate::pool::{BackendHandle, ReadPolicy, ShardPool};

/// Outcome of routing one key: the shard it belongs to and the handle to use.
#[derive(Debug)]
pub struct Route<C> {
    /// Shard the ring resolved for the key.
    pub shard: NodeName,
    /// Backend handle chosen within that shard.
    pub handle: Arc<C>,
}

/// Selects backend handles for keys.
///
/// Holds the placement ring for the service. Construct it once at startup and
/// share it by reference; membership changes go through
/// [`ShardSelector::rebuild`], which swaps the ring atomically.
pub struct ShardSelector<C> {
    /// Ring of shard pools.
    ring: SharedRing<ShardPool<C>>,
    /// How reads pick within a pool.
    policy: ReadPolicy,
    /// Round-robin position shared across all shards.
    cursor: AtomicUsize,
}

impl<C> ShardSelector<C> {
    /// Build a selector over `shards` with `replicas` virtual points per shard.
    pub fn new(
        shards: impl IntoIterator<Item = Node<ShardPool<C>>>,
        replicas: usize,
        policy: ReadPolicy,
    ) -> Result<Self, SelectError> {
        let ring = SharedRing::build(shards, replicas)?;
        Ok(Self::from_ring(ring, policy))
    }

    /// Wrap an existing shared ring.
    pub fn from_ring(ring: SharedRing<ShardPool<C>>, policy: ReadPolicy) -> Self {
        debug!(?policy, "shard selector ready");
        Self {
            ring,
            policy,
            cursor: AtomicUsize::new(0),
        }
    }

    /// The shared ring backing this selector.
    pub fn ring(&self) -> &SharedRing<ShardPool<C>> {
        &self.ring
    }

    /// The read policy in effect.
    pub fn policy(&self) -> ReadPolicy {
        self.policy
    }

    /// Name of the shard owning `key`.
    pub fn shard_for(&self, key: &[u8]) -> Result<NodeName, SelectError> {
        let ring = self.ring.snapshot();
        let node = ring.resolve(key).ok_or(SelectError::NoBackend)?;
        Ok(node.name.clone())
    }

    /// Route a write: always the primary of the owning shard.
    pub fn for_write(&self, key: &[u8]) -> Result<Route<C>, SelectError> {
        let ring = self.ring.snapshot();
        let node = ring.resolve(key).ok_or(SelectError::NoBackend)?;
        Ok(Route {
            shard: node.name.clone(),
            handle: node.payload.primary().clone(),
        })
    }

    /// Route a read: the owning shard, then a handle chosen by the read policy.
    pub fn for_read(&self, key: &[u8]) -> Result<Route<C>, SelectError> {
        let ring = self.ring.snapshot();
        let node = ring.resolve(key).ok_or(SelectError::NoBackend)?;
        let tick = match self.policy {
            ReadPolicy::RoundRobin => self.cursor.fetch_add(1, Ordering::Relaxed),
            _ => 0,
        };
        Ok(Route {
            shard: node.name.clone(),
            handle: node.payload.pick_read(key, self.policy, tick).clone(),
        })
    }

    /// Replace the shard set. In-flight lookups keep the ring they started with.
    ///
    /// Returns the ring that was replaced. On error the current ring stays.
    pub fn rebuild(
        &self,
        shards: impl IntoIterator<Item = Node<ShardPool<C>>>,
        replicas: usize,
    ) -> Result<Arc<Ring<ShardPool<C>>>, SelectError> {
        Ok(self.ring.rebuild(shards, replicas)?)
    }
}

impl<C: BackendHandle> ShardSelector<C> {
    /// Close every handle on the current ring and drop the selector.
    pub fn close(self) {
        let ring = self.ring.snapshot();
        let mut closed = 0usize;
        for node in ring.nodes() {
            for handle in node.payload.handles() {
                handle.close();
                closed += 1;
            }
            debug!(shard = %node.name, "closed shard handles");
        }
        info!(shards = ring.node_count(), handles = closed, "shard selector closed");
    }
}

impl<C> std::fmt::Debug for ShardSelector<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShardSelector")
            .field("ring", &self.ring)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
