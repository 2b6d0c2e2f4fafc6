//! TOML configuration for the `ringroute` CLI.
//!
//! Every section is optional. With no config file the router uses the
//! three-shard layout (`cache-a`, `cache-b`, `cache-c` on ports 6381-6383)
//! with 160 virtual points each.

use std::path::{Path, PathBuf};

use ringroute_harness::CorpusConfig;
use ringroute_placement::DEFAULT_REPLICAS;
use ringroute_select::{ReadPolicy, ShardPool};
use ringroute_types::Node;
use serde::Deserialize;

use crate::backend::Backend;

/// Top-level configuration, parsed from TOML.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Shard layout and ring parameters.
    pub ring: RingSection,
    /// Key corpus generation.
    pub corpus: CorpusSection,
    /// Default artifact paths.
    pub artifacts: ArtifactsSection,
    /// Logging configuration.
    pub log: LogSection,
}

/// `[ring]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RingSection {
    /// Virtual points per shard.
    pub replicas: usize,
    /// How reads pick among a shard's primary and read replicas.
    pub read_policy: ReadPolicy,
    /// Shards in ring construction order.
    pub shards: Vec<ShardSection>,
}

impl Default for RingSection {
    fn default() -> Self {
        Self {
            replicas: DEFAULT_REPLICAS,
            read_policy: ReadPolicy::default(),
            shards: vec![
                ShardSection::new("cache-a", "127.0.0.1:6381"),
                ShardSection::new("cache-b", "127.0.0.1:6382"),
                ShardSection::new("cache-c", "127.0.0.1:6383"),
            ],
        }
    }
}

/// One `[[ring.shards]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ShardSection {
    /// Shard name; the only input to its ring positions.
    pub name: String,
    /// Primary backend address.
    pub addr: String,
    /// Read-replica backend addresses.
    #[serde(default)]
    pub read_replicas: Vec<String>,
}

impl ShardSection {
    fn new(name: &str, addr: &str) -> Self {
        Self {
            name: name.to_string(),
            addr: addr.to_string(),
            read_replicas: Vec::new(),
        }
    }
}

/// `[corpus]` section.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CorpusSection {
    /// Number of keys to generate.
    pub count: Option<usize>,
    /// RNG seed.
    pub seed: Option<u64>,
    /// Fraction of keys carrying a `{tag}`.
    pub hash_tag_ratio: Option<f64>,
}

/// `[artifacts]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ArtifactsSection {
    /// Keys artifact path.
    pub keys: PathBuf,
    /// Assignment report path.
    pub output: PathBuf,
}

impl Default for ArtifactsSection {
    fn default() -> Self {
        Self {
            keys: PathBuf::from("artifacts/keys.json"),
            output: PathBuf::from("artifacts/rust_assignments.json"),
        }
    }
}

/// `[log]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LogSection {
    /// Log level filter (e.g. `"info"`, `"debug"`, `"warn"`).
    pub level: String,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl CliConfig {
    /// Load config from a TOML file, or use defaults if no path given.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(p) => {
                let content = std::fs::read_to_string(p)?;
                let config: CliConfig = toml::from_str(&content)?;
                Ok(config)
            }
            None => Ok(Self::default()),
        }
    }

    /// Parse config from a TOML string (used in tests).
    #[cfg(test)]
    pub fn from_toml(s: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Shard nodes with their backend pools, in ring construction order.
    pub fn shard_nodes(&self) -> Vec<Node<ShardPool<Backend>>> {
        self.ring
            .shards
            .iter()
            .map(|s| {
                let pool = ShardPool::with_replicas(
                    Backend::new(&s.addr),
                    s.read_replicas.iter().map(|a| Backend::new(a)).collect(),
                );
                Node::new(s.name.as_str(), pool)
            })
            .collect()
    }

    /// Effective corpus parameters (config values over built-in defaults).
    pub fn corpus(&self) -> CorpusConfig {
        let defaults = CorpusConfig::default();
        CorpusConfig {
            count: self.corpus.count.unwrap_or(defaults.count),
            seed: self.corpus.seed.unwrap_or(defaults.seed),
            hash_tag_ratio: self
                .corpus
                .hash_tag_ratio
                .unwrap_or(defaults.hash_tag_ratio),
        }
    }
}
