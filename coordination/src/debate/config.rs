//! Debate configuration and synthesizer selection policy.

use serde::{Deserialize, Serialize};

use super::convergence::DEFAULT_CONVERGENCE_THRESHOLD;
use crate::error::DebateError;

/// Default round budget (initial round included).
pub const DEFAULT_MAX_ROUNDS: u32 = 3;

/// Which responder synthesizes the final answer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SynthesizerPolicy {
    /// The responder at registration index 0.
    #[default]
    First,
    /// A responder by name; falls back to index 0 when absent.
    Named(String),
}

impl SynthesizerPolicy {
    /// Index into `names` of the synthesizer. `names` must be non-empty.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> usize {
        match self {
            Self::First => 0,
            Self::Named(wanted) => names
                .iter()
                .position(|n| n.as_ref() == wanted)
                .unwrap_or_else(|| {
                    tracing::warn!(
                        synthesizer = %wanted,
                        "named synthesizer not in active set; using first responder"
                    );
                    0
                }),
        }
    }
}

/// Configuration for the debate engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebateConfig {
    /// Total rounds including the initial independent round. Must be >= 1.
    pub max_rounds: u32,
    /// Overlap ratio that must be strictly exceeded to stop early. In (0, 1].
    pub convergence_threshold: f64,
    /// Synthesizer selection.
    pub synthesizer: SynthesizerPolicy,
}

impl Default for DebateConfig {
    fn default() -> Self {
        Self {
            max_rounds: DEFAULT_MAX_ROUNDS,
            convergence_threshold: DEFAULT_CONVERGENCE_THRESHOLD,
            synthesizer: SynthesizerPolicy::default(),
        }
    }
}

impl DebateConfig {
    pub fn with_max_rounds(mut self, max_rounds: u32) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.convergence_threshold = threshold;
        self
    }

    pub fn with_synthesizer(mut self, policy: SynthesizerPolicy) -> Self {
        self.synthesizer = policy;
        self
    }

    pub fn validate(&self) -> Result<(), DebateError> {
        if self.max_rounds == 0 {
            return Err(DebateError::InvalidConfig(
                "max_rounds must be at least 1".to_string(),
            ));
        }
        if !(self.convergence_threshold > 0.0 && self.convergence_threshold <= 1.0) {
            return Err(DebateError::InvalidConfig(format!(
                "convergence_threshold must be in (0, 1], got {}",
                self.convergence_threshold
            )));
        }
        Ok(())
    }
}
