//! Error types for shard selection.

use ringroute_placement::RingError;

/// Errors produced while selecting a backend for a key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectError {
    /// The ring has no nodes, so no backend can serve the key.
    #[error("no backend available")]
    NoBackend,

    /// Building the ring failed.
    #[error("ring error: {0}")]
    Ring(#[from] RingError),
}
