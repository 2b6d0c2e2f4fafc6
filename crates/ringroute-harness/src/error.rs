//! Error types for the parity harness.

/// Errors that can occur while producing or comparing artifacts.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    /// An I/O error occurred reading or writing an artifact.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// An artifact was not valid JSON or had the wrong shape.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The two reports were routed across different shard sets.
    #[error("shard sets differ: {left:?} vs {right:?}")]
    ShardMismatch {
        /// Shard names recorded in the left report.
        left: Vec<String>,
        /// Shard names recorded in the right report.
        right: Vec<String>,
    },
}
