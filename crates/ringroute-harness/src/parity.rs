//! Key-by-key comparison of two assignment reports.

use std::collections::{HashMap, HashSet};
use std::fmt;

use ringroute_types::AssignmentReport;
use tracing::debug;

use crate::error::HarnessError;

/// A key routed to different shards by the two reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    /// The key.
    pub key: String,
    /// Shard in the left report.
    pub left: String,
    /// Shard in the right report.
    pub right: String,
}

/// Result of comparing two assignment reports.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParityReport {
    /// Algorithm recorded by the left report.
    pub left_algorithm: String,
    /// Algorithm recorded by the right report.
    pub right_algorithm: String,
    /// Left assignments whose key also appears on the right.
    pub total: usize,
    /// Of those, how many resolved to the same shard.
    pub matched: usize,
    /// Keys resolved differently.
    pub mismatches: Vec<Mismatch>,
    /// Keys present only in the left report.
    pub missing_in_right: Vec<String>,
    /// Keys present only in the right report.
    pub missing_in_left: Vec<String>,
}

impl ParityReport {
    /// Fraction of compared keys that matched. An empty comparison is `1.0`.
    pub fn match_rate(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.matched as f64 / self.total as f64
        }
    }

    /// Whether both reports route every key identically and cover the same keys.
    pub fn is_full_match(&self) -> bool {
        self.mismatches.is_empty()
            && self.missing_in_left.is_empty()
            && self.missing_in_right.is_empty()
    }
}

impl fmt::Display for ParityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "left:       {}", self.left_algorithm)?;
        writeln!(f, "right:      {}", self.right_algorithm)?;
        writeln!(
            f,
            "matched:    {}/{} ({:.2}%)",
            self.matched,
            self.total,
            self.match_rate() * 100.0
        )?;
        writeln!(f, "mismatches: {}", self.mismatches.len())?;
        if !self.missing_in_left.is_empty() || !self.missing_in_right.is_empty() {
            writeln!(
                f,
                "only left:  {}, only right: {}",
                self.missing_in_right.len(),
                self.missing_in_left.len()
            )?;
        }
        for m in self.mismatches.iter().take(10) {
            writeln!(f, "  {} -> {} vs {}", m.key, m.left, m.right)?;
        }
        if self.mismatches.len() > 10 {
            writeln!(f, "  ... and {} more", self.mismatches.len() - 10)?;
        }
        Ok(())
    }
}

/// Compare two reports key by key.
///
/// Fails if both reports record a shard set and the sets differ, since the
/// comparison would then be meaningless.
pub fn compare(
    left: &AssignmentReport,
    right: &AssignmentReport,
) -> Result<ParityReport, HarnessError> {
    let left_shards = left.meta.shards.names();
    let right_shards = right.meta.shards.names();
    if !left_shards.is_empty() && !right_shards.is_empty() && left_shards != right_shards {
        return Err(HarnessError::ShardMismatch {
            left: left_shards.into_iter().map(String::from).collect(),
            right: right_shards.into_iter().map(String::from).collect(),
        });
    }

    let right_by_key: HashMap<&str, &str> = right
        .assignments
        .iter()
        .map(|a| (a.key.as_str(), a.shard.as_str()))
        .collect();

    let mut report = ParityReport {
        left_algorithm: left.meta.algorithm.clone(),
        right_algorithm: right.meta.algorithm.clone(),
        ..ParityReport::default()
    };

    let mut left_keys: HashSet<&str> = HashSet::with_capacity(left.assignments.len());
    for a in &left.assignments {
        left_keys.insert(a.key.as_str());
        let Some(&other) = right_by_key.get(a.key.as_str()) else {
            report.missing_in_right.push(a.key.clone());
            continue;
        };

        report.total += 1;
        if a.shard == other {
            report.matched += 1;
        } else {
            report.mismatches.push(Mismatch {
                key: a.key.clone(),
                left: a.shard.clone(),
                right: other.to_string(),
            });
        }
    }

    report.missing_in_left = right
        .assignments
        .iter()
        .filter(|a| !left_keys.contains(a.key.as_str()))
        .map(|a| a.key.clone())
        .collect();

    debug!(
        total = report.total,
        matched = report.matched,
        mismatches = report.mismatches.len(),
        "compared assignment reports"
    );

    Ok(report)
}
