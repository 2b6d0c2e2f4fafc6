//! Atomically replaceable ring handle.
//!
//! The ring itself is immutable. Membership changes build a complete new ring
//! off to the side and publish it with a single pointer swap, so concurrent
//! lookups see either the old ring or the new one, never a partial build.

use std::sync::Arc;

use arc_swap::ArcSwap;
use ringroute_types::Node;
use tracing::info;

use crate::error::RingError;
use crate::ring::Ring;

/// Shared, lock-free handle to the current [`Ring`].
///
/// Cloning the handle shares the same underlying ring slot. Readers take a
/// snapshot with [`SharedRing::snapshot`]; writers replace the ring with
/// [`SharedRing::publish`] or [`SharedRing::rebuild`].
pub struct SharedRing<P> {
    current: Arc<ArcSwap<Ring<P>>>,
}

impl<P> SharedRing<P> {
    /// Wrap an already-built ring.
    pub fn new(ring: Ring<P>) -> Self {
        Self {
            current: Arc::new(ArcSwap::from_pointee(ring)),
        }
    }

    /// Build a ring and wrap it.
    pub fn build(
        nodes: impl IntoIterator<Item = Node<P>>,
        replicas: usize,
    ) -> Result<Self, RingError> {
        Ok(Self::new(Ring::build(nodes, replicas)?))
    }

    /// Return the ring currently published.
    ///
    /// The snapshot stays valid (and unchanged) even if a new ring is
    /// published while it is held.
    pub fn snapshot(&self) -> Arc<Ring<P>> {
        self.current.load_full()
    }

    /// Replace the current ring, returning the previous one.
    pub fn publish(&self, ring: Ring<P>) -> Arc<Ring<P>> {
        info!(
            nodes = ring.node_count(),
            points = ring.point_count(),
            "publishing ring"
        );
        self.current.swap(Arc::new(ring))
    }

    /// Build a new ring from `nodes` and publish it.
    ///
    /// On error the current ring stays in place.
    pub fn rebuild(
        &self,
        nodes: impl IntoIterator<Item = Node<P>>,
        replicas: usize,
    ) -> Result<Arc<Ring<P>>, RingError> {
        let ring = Ring::build(nodes, replicas)?;
        Ok(self.publish(ring))
    }
}

impl<P> Clone for SharedRing<P> {
    fn clone(&self) -> Self {
        Self {
            current: self.current.clone(),
        }
    }
}

impl<P> std::fmt::Debug for SharedRing<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ring = self.current.load();
        f.debug_struct("SharedRing")
            .field("nodes", &ring.node_count())
            .field("points", &ring.point_count())
            .finish_non_exhaustive()
    }
}
