//! Error types for ring construction and lookup.

/// Errors produced by the ring.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RingError {
    /// The replica (virtual point) count must be at least 1.
    #[error("invalid replica count {0}: must be at least 1")]
    InvalidReplicas(usize),

    /// `replicas * nodes` does not fit in memory.
    #[error("ring too large: {nodes} nodes with {replicas} replicas each")]
    TooManyPoints {
        /// Number of nodes requested.
        nodes: usize,
        /// Replicas per node requested.
        replicas: usize,
    },

    /// Lookup on a ring that holds no points.
    #[error("no node available: ring is empty")]
    EmptyRing,
}
