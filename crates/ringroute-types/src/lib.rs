//! Shared types for ringroute.
//!
//! This crate defines the types used across the workspace:
//! node identity ([`NodeName`], [`Node`]) and the JSON artifact documents
//! exchanged with other router implementations ([`KeysPayload`],
//! [`AssignmentReport`], [`ReportMeta`], [`ShardSet`], [`Assignment`]).

use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Node identity
// ---------------------------------------------------------------------------

/// Unique name of a backend node (e.g. `"cache-a"`).
///
/// The name is the only input to a node's virtual point positions, so two
/// routers agree on placement exactly when they agree on node names.
#[derive(Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeName(String);

impl NodeName {
    /// Create a node name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Return the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeName {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for NodeName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl AsRef<str> for NodeName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for NodeName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for NodeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeName({})", self.0)
    }
}

/// A named backend node carrying an opaque payload.
///
/// The payload is whatever the caller associates with the node, typically a
/// connection handle. The router never inspects it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node<P> {
    /// Unique identity of the node.
    pub name: NodeName,
    /// Caller-owned resource for this node.
    pub payload: P,
}

impl<P> Node<P> {
    /// Create a node from a name and payload.
    pub fn new(name: impl Into<NodeName>, payload: P) -> Self {
        Self {
            name: name.into(),
            payload,
        }
    }
}

impl Node<()> {
    /// Create a node that carries no payload.
    pub fn named(name: impl Into<NodeName>) -> Self {
        Self::new(name, ())
    }
}

// ---------------------------------------------------------------------------
// Artifact documents
// ---------------------------------------------------------------------------

/// Key corpus document: `{"keys": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeysPayload {
    /// Keys in corpus order.
    pub keys: Vec<String>,
}

/// One routed key in an assignment report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    /// The key exactly as it was hashed.
    pub key: String,
    /// Name of the resolved shard, or the empty string if no node was available.
    pub shard: String,
}

impl Assignment {
    /// Return the resolved shard, or `None` for an unresolved key.
    pub fn resolved(&self) -> Option<&str> {
        if self.shard.is_empty() {
            None
        } else {
            Some(&self.shard)
        }
    }
}

/// Shard set recorded in a report's meta block.
///
/// Some producers record a name-to-address map, others only the names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ShardSet {
    /// Shard name to backend address.
    Addressed(BTreeMap<String, String>),
    /// Shard names only.
    Names(Vec<String>),
}

impl ShardSet {
    /// Return the shard names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = match self {
            Self::Addressed(map) => map.keys().map(String::as_str).collect(),
            Self::Names(names) => names.iter().map(String::as_str).collect(),
        };
        names.sort_unstable();
        names
    }
}

impl Default for ShardSet {
    fn default() -> Self {
        Self::Addressed(BTreeMap::new())
    }
}

/// Describes how an assignment report was produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportMeta {
    /// Human-readable algorithm name.
    pub algorithm: String,
    /// Shards the report was routed across.
    pub shards: ShardSet,
    /// Virtual points per node.
    pub replicas: usize,
    /// Hash applied to keys.
    pub hash_for: String,
    /// Hash applied to virtual node keys.
    pub server_hash: String,
    /// Path of the keys artifact the report was computed from.
    pub key_source: String,
}

/// Full assignment artifact: `{"meta": {...}, "assignments": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentReport {
    /// How the report was produced.
    pub meta: ReportMeta,
    /// Routed keys in corpus order.
    pub assignments: Vec<Assignment>,
}
