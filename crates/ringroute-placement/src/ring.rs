//! Consistent hashing ring implementation.

use std::collections::{BTreeMap, HashMap};

use ringroute_types::{Node, NodeName};
use tracing::{debug, warn};

use crate::error::RingError;
use crate::hash::{key_hash, server_hash, virtual_key};

/// Virtual points per node when the caller has no preference.
pub const DEFAULT_REPLICAS: usize = 160;

/// Size of the circular keyspace.
const KEYSPACE: u64 = 1 << 32;

/// Immutable consistent hashing ring.
///
/// Each node is mapped to `replicas` virtual points on a u32 ring. A key is
/// owned by the first point at or after its hash, wrapping around to the
/// smallest point when the hash lies past the last one.
///
/// Two virtual points that hash to the same value keep both entries in the
/// sorted point list, but the owner table only remembers the node inserted
/// last. This matches the reference routers and must not be "fixed".
#[derive(Debug, Clone)]
pub struct Ring<P> {
    /// All virtual points, ascending, duplicates retained.
    points: Vec<u32>,
    /// Point -> index into `nodes`. Later insertions overwrite earlier ones.
    owners: HashMap<u32, usize>,
    /// Nodes in construction order.
    nodes: Vec<Node<P>>,
    /// Virtual points per node.
    replicas: usize,
}

impl<P> Ring<P> {
    /// Build a ring from an ordered node list.
    ///
    /// Nodes are placed in input order; for each node, point `i` is
    /// `server_hash("<name>:<i>")` for `i` in `0..replicas`. An empty node
    /// list is valid and yields a ring on which every lookup finds nothing.
    pub fn build(
        nodes: impl IntoIterator<Item = Node<P>>,
        replicas: usize,
    ) -> Result<Self, RingError> {
        if replicas == 0 {
            return Err(RingError::InvalidReplicas(replicas));
        }

        let nodes: Vec<Node<P>> = nodes.into_iter().collect();
        let too_many = RingError::TooManyPoints {
            nodes: nodes.len(),
            replicas,
        };
        let total = nodes
            .len()
            .checked_mul(replicas)
            .ok_or_else(|| too_many.clone())?;

        let mut points: Vec<u32> = Vec::new();
        let mut owners: HashMap<u32, usize> = HashMap::new();
        points.try_reserve(total).map_err(|_| too_many.clone())?;
        owners.try_reserve(total).map_err(|_| too_many)?;

        for (idx, node) in nodes.iter().enumerate() {
            for i in 0..replicas {
                let point = server_hash(&virtual_key(node.name.as_str(), i));
                owners.insert(point, idx);
                points.push(point);
            }
        }

        points.sort_unstable();

        let ring = Self {
            points,
            owners,
            nodes,
            replicas,
        };

        let collisions = ring.collisions();
        if collisions > 0 {
            warn!(
                collisions,
                "virtual point collisions on ring, later nodes own the shared points"
            );
        }
        debug!(
            nodes = ring.node_count(),
            points = ring.point_count(),
            replicas,
            "built ring"
        );

        Ok(ring)
    }

    /// Resolve the node owning `key`, or `None` if the ring is empty.
    pub fn resolve(&self, key: &[u8]) -> Option<&Node<P>> {
        self.resolve_hash(key_hash(key))
    }

    /// Resolve the node owning `key`, reporting an empty ring as an error.
    pub fn try_resolve(&self, key: &[u8]) -> Result<&Node<P>, RingError> {
        self.resolve(key).ok_or(RingError::EmptyRing)
    }

    /// Resolve the node owning an already-computed key hash.
    pub fn resolve_hash(&self, hash: u32) -> Option<&Node<P>> {
        let point = self.successor(hash)?;
        self.owner_of(point)
    }

    /// Find the first point `>= hash`, wrapping to the smallest point.
    fn successor(&self, hash: u32) -> Option<u32> {
        if self.points.is_empty() {
            return None;
        }

        // Lower bound: index of the first point not less than `hash`.
        let idx = self.points.partition_point(|&p| p < hash);
        let idx = if idx == self.points.len() { 0 } else { idx };
        Some(self.points[idx])
    }

    /// Return the node owning an exact point on the ring.
    pub fn owner_of(&self, point: u32) -> Option<&Node<P>> {
        self.owners.get(&point).map(|&idx| &self.nodes[idx])
    }

    /// Sorted virtual points (duplicates retained).
    pub fn points(&self) -> &[u32] {
        &self.points
    }

    /// Total number of virtual points, `replicas * node_count()`.
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Number of nodes the ring was built from.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Virtual points per node.
    pub fn replicas(&self) -> usize {
        self.replicas
    }

    /// Whether the ring holds no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of virtual points whose owner entry was overwritten.
    pub fn collisions(&self) -> usize {
        self.points.len() - self.owners.len()
    }

    /// Nodes in construction order.
    pub fn nodes(&self) -> &[Node<P>] {
        &self.nodes
    }

    /// Length of the keyspace arc each node owns, out of `2^32`.
    ///
    /// Point `p[i]` owns `(p[i-1], p[i]]`; the smallest point also owns the
    /// wrap-around arc past the largest point. Nodes sharing a name are
    /// reported together.
    pub fn ownership(&self) -> BTreeMap<&NodeName, u64> {
        let mut arcs: BTreeMap<&NodeName, u64> =
            self.nodes.iter().map(|n| (&n.name, 0)).collect();

        let (Some(&first), Some(&last)) = (self.points.first(), self.points.last()) else {
            return arcs;
        };

        let mut prev: Option<u32> = None;
        for &point in &self.points {
            let arc = match prev {
                Some(p) => u64::from(point - p),
                None => KEYSPACE - u64::from(last) + u64::from(first),
            };
            if let Some(node) = self.owner_of(point) {
                *arcs.entry(&node.name).or_insert(0) += arc;
            }
            prev = Some(point);
        }

        arcs
    }

    /// Tear the ring down, handing the nodes back to the caller.
    ///
    /// Payloads holding external resources can then be released.
    pub fn into_nodes(self) -> Vec<Node<P>> {
        self.nodes
    }
}
