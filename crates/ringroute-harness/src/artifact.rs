//! JSON artifacts shared with other router implementations.
//!
//! Two documents are exchanged: the key corpus (`{"keys": [...]}`) and the
//! assignment report (`{"meta": {...}, "assignments": [...]}`), written with
//! two-space indentation.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use ringroute_placement::Ring;
use ringroute_types::{Assignment, AssignmentReport, KeysPayload, ReportMeta, ShardSet};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::HarnessError;

/// Algorithm name recorded in reports produced by this crate.
pub const ALGORITHM: &str = "ruby-compatible hash ring";

/// Read a keys artifact.
pub fn read_keys(path: &Path) -> Result<Vec<String>, HarnessError> {
    let bytes = fs::read(path)?;
    let payload: KeysPayload = serde_json::from_slice(&bytes)?;
    debug!(path = %path.display(), count = payload.keys.len(), "read keys");
    Ok(payload.keys)
}

/// Write a keys artifact, creating parent directories as needed.
pub fn write_keys(path: &Path, keys: &[String]) -> Result<(), HarnessError> {
    let payload = KeysPayload {
        keys: keys.to_vec(),
    };
    write_json(path, &payload)?;
    info!(path = %path.display(), count = keys.len(), "wrote keys");
    Ok(())
}

/// Read an assignment report.
pub fn read_report(path: &Path) -> Result<AssignmentReport, HarnessError> {
    let bytes = fs::read(path)?;
    let report: AssignmentReport = serde_json::from_slice(&bytes)?;
    debug!(
        path = %path.display(),
        algorithm = %report.meta.algorithm,
        count = report.assignments.len(),
        "read assignment report"
    );
    Ok(report)
}

/// Write an assignment report, creating parent directories as needed.
pub fn write_report(path: &Path, report: &AssignmentReport) -> Result<(), HarnessError> {
    write_json(path, report)?;
    info!(
        path = %path.display(),
        count = report.assignments.len(),
        "wrote assignment report"
    );
    Ok(())
}

/// Describe `ring` in a report meta block.
///
/// `address` renders each node's payload as the address recorded for it.
pub fn report_meta<P>(
    ring: &Ring<P>,
    key_source: &str,
    address: impl Fn(&P) -> String,
) -> ReportMeta {
    let shards: BTreeMap<String, String> = ring
        .nodes()
        .iter()
        .map(|n| (n.name.to_string(), address(&n.payload)))
        .collect();

    ReportMeta {
        algorithm: ALGORITHM.to_string(),
        shards: ShardSet::Addressed(shards),
        replicas: ring.replicas(),
        hash_for: "crc32".to_string(),
        server_hash: "md5 upper 32 bits".to_string(),
        key_source: key_source.to_string(),
    }
}

/// Route every key through `ring` and collect the assignments.
///
/// Keys are hashed exactly as given. A key that cannot be resolved (empty
/// ring) is recorded with an empty shard name.
pub fn assign<P>(ring: &Ring<P>, keys: &[String], meta: ReportMeta) -> AssignmentReport {
    let assignments: Vec<Assignment> = keys
        .iter()
        .map(|key| Assignment {
            key: key.clone(),
            shard: ring
                .resolve(key.as_bytes())
                .map(|n| n.name.to_string())
                .unwrap_or_default(),
        })
        .collect();

    let unresolved = assignments.iter().filter(|a| a.resolved().is_none()).count();
    if unresolved > 0 {
        warn!(unresolved, "keys left unassigned: ring is empty");
    }

    AssignmentReport { meta, assignments }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), HarnessError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let encoded = serde_json::to_vec_pretty(value)?;
    fs::write(path, encoded)?;
    Ok(())
}
