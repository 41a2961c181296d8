//! Convergence estimator: lexical-overlap heuristic over one round.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::transcript::TranscriptEntry;

/// Default convergence threshold.
pub const DEFAULT_CONVERGENCE_THRESHOLD: f64 = 0.7;

/// Decides whether a round's entries agree closely enough to stop.
///
/// Each entry's content is lower-cased and split on whitespace. A token is
/// *shared* when it occurs as a substring of more than one entry's content.
/// Convergence holds when `shared / universe > threshold`.
///
/// This is lexical, not semantic: paraphrased agreement is not detected, and
/// because containment is substring-based, short tokens ("a", "is") count as
/// shared whenever they appear inside any longer word of another entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConvergenceEstimator {
    pub threshold: f64,
}

impl ConvergenceEstimator {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// Whether the entries have converged. Pure.
    pub fn estimate(&self, entries: &[TranscriptEntry]) -> bool {
        overlap_ratio(entries) > self.threshold
    }
}

impl Default for ConvergenceEstimator {
    fn default() -> Self {
        Self::new(DEFAULT_CONVERGENCE_THRESHOLD)
    }
}

/// `|shared| / |universe|`; 0.0 when there are no tokens at all.
pub fn overlap_ratio(entries: &[TranscriptEntry]) -> f64 {
    let contents: Vec<String> = entries.iter().map(|e| e.content.to_lowercase()).collect();

    let universe: HashSet<&str> = contents
        .iter()
        .flat_map(|c| c.split_whitespace())
        .collect();
    if universe.is_empty() {
        return 0.0;
    }

    let shared = universe
        .iter()
        .filter(|token| contents.iter().filter(|c| c.contains(*token)).count() > 1)
        .count();

    shared as f64 / universe.len() as f64
}
