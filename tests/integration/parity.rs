//! Integration test: cross-implementation parity.
//!
//! Routes generated corpora through the library ring and through the
//! independent reference router and requires zero disagreements.

use proptest::prelude::*;
use ringroute_harness::{CorpusConfig, generate_keys};
use ringroute_integration_tests::{CACHE_SHARDS, ReferenceRouter, cache_ring, numbered_keys};
use ringroute_placement::{DEFAULT_REPLICAS, Ring};
use ringroute_types::Node;

/// The literal acceptance scenario.
#[test]
fn test_literal_key_resolves_identically() {
    let ring = cache_ring();
    let reference = ReferenceRouter::new(&CACHE_SHARDS, DEFAULT_REPLICAS);

    let key = b"user:42:abcdef1234567890";
    assert_eq!(ring.resolve(key).unwrap().name.as_str(), "cache-a");
    assert_eq!(reference.route(key), Some("cache-a"));
}

/// Zero mismatches across a generated corpus of 10,000 keys.
#[test]
fn test_generated_corpus_full_parity() {
    let ring = cache_ring();
    let reference = ReferenceRouter::new(&CACHE_SHARDS, DEFAULT_REPLICAS);
    assert_eq!(ring.point_count(), reference.point_count());

    let keys = generate_keys(&CorpusConfig::default());
    assert_eq!(keys.len(), 10_000);

    let mismatches: Vec<&String> = keys
        .iter()
        .filter(|k| {
            ring.resolve(k.as_bytes()).map(|n| n.name.as_str()) != reference.route(k.as_bytes())
        })
        .collect();
    assert!(
        mismatches.is_empty(),
        "{} mismatches, first: {:?}",
        mismatches.len(),
        mismatches.first()
    );
}

/// Parity holds for other shard sets and replica counts too.
#[test]
fn test_parity_across_layouts() {
    let keys = numbered_keys(2_000);
    let layouts: &[(&[&str], usize)] = &[
        (&["solo"], 1),
        (&["cache-a", "cache-b"], 1),
        (&["cache-a", "cache-b", "cache-c"], 7),
        (&["redis-1", "redis-2", "redis-3", "redis-4", "redis-5"], 160),
        (&["dup", "dup", "other"], 20),
    ];

    for (shards, replicas) in layouts {
        let ring = Ring::build(shards.iter().map(|s| Node::named(*s)), *replicas).unwrap();
        let reference = ReferenceRouter::new(shards, *replicas);
        assert_eq!(ring.point_count(), shards.len() * replicas);

        for key in &keys {
            assert_eq!(
                ring.resolve(key.as_bytes()).map(|n| n.name.as_str()),
                reference.route(key.as_bytes()),
                "layout {shards:?}/{replicas}: {key}"
            );
        }
    }
}

/// Hash tags are hashed literally: keys sharing a `{tag}` spread across shards.
#[test]
fn test_hash_tagged_keys_not_colocated() {
    let ring = cache_ring();
    let fields = ["profile", "cart", "settings", "orders", "sessions", "prefs"];

    let mut shards = std::collections::BTreeSet::new();
    for field in fields {
        let key = format!("{{user:42}}:{field}");
        shards.insert(ring.resolve(key.as_bytes()).unwrap().name.to_string());
    }
    assert!(shards.len() > 1, "all tagged keys landed on {shards:?}");

    assert_eq!(
        ring.resolve(b"{user:42}:profile").unwrap().name.as_str(),
        "cache-c"
    );
    assert_eq!(
        ring.resolve(b"{user:42}:cart").unwrap().name.as_str(),
        "cache-b"
    );
}

/// Empty node list: every key is unresolved in both routers.
#[test]
fn test_empty_ring_parity() {
    let ring = Ring::<()>::build(Vec::new(), DEFAULT_REPLICAS).unwrap();
    let reference = ReferenceRouter::new(&[], DEFAULT_REPLICAS);
    for key in numbered_keys(100) {
        assert!(ring.resolve(key.as_bytes()).is_none());
        assert!(reference.route(key.as_bytes()).is_none());
    }
}

proptest! {
    #[test]
    fn prop_arbitrary_bytes_parity(key in proptest::collection::vec(any::<u8>(), 0..128)) {
        let ring = cache_ring();
        let reference = ReferenceRouter::new(&CACHE_SHARDS, DEFAULT_REPLICAS);
        prop_assert_eq!(
            ring.resolve(&key).map(|n| n.name.as_str()),
            reference.route(&key)
        );
    }
}
