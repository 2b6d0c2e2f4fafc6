//! Integration test: artifact pipeline.
//!
//! keys.json -> assignment reports from two routers -> parity comparison,
//! all through files on disk as the cross-runtime harness does it.

use std::fs;

use ringroute_harness::{
    CorpusConfig, assign, compare, generate_keys, read_keys, read_report, report_meta, write_keys,
    write_report,
};
use ringroute_integration_tests::{CACHE_SHARDS, ReferenceRouter, cache_ring};
use ringroute_placement::DEFAULT_REPLICAS;
use ringroute_types::{Assignment, AssignmentReport, ReportMeta, ShardSet};

fn reference_report(keys: &[String], algorithm: &str) -> AssignmentReport {
    let reference = ReferenceRouter::new(&CACHE_SHARDS, DEFAULT_REPLICAS);
    AssignmentReport {
        meta: ReportMeta {
            algorithm: algorithm.to_string(),
            shards: ShardSet::Names(CACHE_SHARDS.iter().map(|s| s.to_string()).collect()),
            replicas: DEFAULT_REPLICAS,
            ..ReportMeta::default()
        },
        assignments: keys
            .iter()
            .map(|k| Assignment {
                key: k.clone(),
                shard: reference.route(k.as_bytes()).unwrap_or_default().to_string(),
            })
            .collect(),
    }
}

#[test]
fn test_full_pipeline_through_files() {
    let dir = tempfile::tempdir().unwrap();
    let keys_path = dir.path().join("artifacts/keys.json");
    let ours_path = dir.path().join("artifacts/rust_assignments.json");
    let theirs_path = dir.path().join("artifacts/reference_assignments.json");

    let keys = generate_keys(&CorpusConfig::default());
    write_keys(&keys_path, &keys).unwrap();

    let keys = read_keys(&keys_path).unwrap();
    let ring = cache_ring();
    let meta = report_meta(&ring, &keys_path.display().to_string(), |_| String::new());
    write_report(&ours_path, &assign(&ring, &keys, meta)).unwrap();
    write_report(&theirs_path, &reference_report(&keys, "reference")).unwrap();

    let ours = read_report(&ours_path).unwrap();
    let theirs = read_report(&theirs_path).unwrap();
    let parity = compare(&ours, &theirs).unwrap();

    assert!(parity.is_full_match(), "{parity}");
    assert_eq!(parity.total, 10_000);
    assert_eq!(parity.match_rate(), 1.0);
}

/// A report in the shape other runtimes emit (shard list, extra meta fields).
#[test]
fn test_foreign_report_shape_is_comparable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("go_assignments.json");
    fs::write(
        &path,
        r#"{
  "meta": {
    "algorithm": "go-redis Ring with custom ConsistentHash",
    "shards": ["cache-a", "cache-b", "cache-c"],
    "replicas": 160,
    "notes": "hash.Get receives raw keys",
    "key_source": "artifacts/keys.json"
  },
  "assignments": [
    {"key": "user:42:abcdef1234567890", "shard": "cache-a"},
    {"key": "foo", "shard": "cache-b"},
    {"key": "{user:42}:profile", "shard": "cache-c"}
  ]
}"#,
    )
    .unwrap();

    let theirs = read_report(&path).unwrap();
    let keys: Vec<String> = theirs.assignments.iter().map(|a| a.key.clone()).collect();
    let ring = cache_ring();
    let meta = report_meta(&ring, "artifacts/keys.json", |_| "addr".to_string());
    let ours = assign(&ring, &keys, meta);

    let parity = compare(&ours, &theirs).unwrap();
    assert!(parity.is_full_match(), "{parity}");
}

/// A router using "last point <= hash" is caught by the comparison.
#[test]
fn test_floor_rule_router_is_detected() {
    let ring = cache_ring();
    let keys: Vec<String> = (0..2_000).map(|i| format!("key-{i}")).collect();
    let meta = report_meta(&ring, "keys.json", |_| String::new());
    let ours = assign(&ring, &keys, meta);

    let points = ring.points();
    let floor = AssignmentReport {
        meta: ReportMeta::default(),
        assignments: keys
            .iter()
            .map(|k| {
                let hash = ringroute_placement::key_hash(k.as_bytes());
                let idx = points.partition_point(|&p| p <= hash);
                let point = if idx == 0 { points[points.len() - 1] } else { points[idx - 1] };
                Assignment {
                    key: k.clone(),
                    shard: ring.owner_of(point).unwrap().name.to_string(),
                }
            })
            .collect(),
    };

    let parity = compare(&ours, &floor).unwrap();
    assert!(!parity.is_full_match());
    assert!(
        parity.mismatches.len() > 500,
        "only {} mismatches",
        parity.mismatches.len()
    );
}
