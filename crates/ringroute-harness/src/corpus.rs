//! Deterministic key corpus generation.
//!
//! Keys mimic cache traffic: user records, sessions, order items, and
//! hash-tagged keys (`{user:42}:cart`). Hash tags are generated on purpose so
//! parity runs show that no router extracts them before hashing.
//!
//! The corpus is a pure function of [`CorpusConfig`] for a given `rand`
//! release; the artifact on disk, not the seed, is what other routers consume.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// Fields used after a hash tag.
const TAGGED_FIELDS: &[&str] = &["profile", "cart", "settings", "orders", "sessions"];

/// Parameters for [`generate_keys`].
#[derive(Debug, Clone, PartialEq)]
pub struct CorpusConfig {
    /// Number of keys to generate.
    pub count: usize,
    /// RNG seed.
    pub seed: u64,
    /// Fraction of keys carrying a `{tag}`, in `0.0..=1.0`.
    pub hash_tag_ratio: f64,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            count: 10_000,
            seed: 0x5EED_CAFE,
            hash_tag_ratio: 0.1,
        }
    }
}

/// Generate `config.count` keys deterministically from `config.seed`.
pub fn generate_keys(config: &CorpusConfig) -> Vec<String> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let ratio = if config.hash_tag_ratio.is_finite() {
        config.hash_tag_ratio.clamp(0.0, 1.0)
    } else {
        0.0
    };

    let keys: Vec<String> = (0..config.count)
        .map(|_| {
            if rng.random_bool(ratio) {
                tagged_key(&mut rng)
            } else {
                plain_key(&mut rng)
            }
        })
        .collect();

    debug!(count = keys.len(), seed = config.seed, "generated key corpus");
    keys
}

fn plain_key(rng: &mut StdRng) -> String {
    match rng.random_range(0..3u8) {
        0 => {
            let id = rng.random_range(1..100_000u32);
            let suffix: u64 = rng.random();
            format!("user:{id}:{suffix:016x}")
        }
        1 => {
            let hi: u64 = rng.random();
            let lo: u64 = rng.random();
            format!("session:{hi:016x}{lo:016x}")
        }
        _ => {
            let id = rng.random_range(1..1_000_000u32);
            let item = rng.random_range(0..32u8);
            format!("order:{id}:item:{item}")
        }
    }
}

fn tagged_key(rng: &mut StdRng) -> String {
    let id = rng.random_range(1..10_000u32);
    let field = TAGGED_FIELDS[rng.random_range(0..TAGGED_FIELDS.len())];
    format!("{{user:{id}}}:{field}")
}
