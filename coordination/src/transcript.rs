//! Transcript types: entries, rounds, and the debate outcome.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Number of content characters each reasoning-trace line keeps.
pub const TRACE_PREVIEW_CHARS: usize = 100;

/// One responder's contribution to one round. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    /// Name of the authoring responder.
    pub agent: String,
    /// Generated text (after capability-call resolution).
    pub content: String,
    /// Round index (0 = initial independent round).
    pub round: u32,
    /// When the entry was recorded.
    pub created_at: DateTime<Utc>,
}

impl TranscriptEntry {
    pub fn new(agent: impl Into<String>, content: impl Into<String>, round: u32) -> Self {
        Self {
            agent: agent.into(),
            content: content.into(),
            round,
            created_at: Utc::now(),
        }
    }

    /// Render as `"<agent>: <content>"`.
    pub fn render(&self) -> String {
        format!("{}: {}", self.agent, self.content)
    }
}

/// Render entries as `"<agent>: <content>"` blocks separated by a blank line.
pub fn render_entries<'a, I>(entries: I) -> String
where
    I: IntoIterator<Item = &'a TranscriptEntry>,
{
    entries
        .into_iter()
        .map(TranscriptEntry::render)
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// A synchronized batch of entries sharing one round index, in responder
/// registration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Round {
    pub index: u32,
    pub entries: Vec<TranscriptEntry>,
}

impl Round {
    pub fn new(index: u32, entries: Vec<TranscriptEntry>) -> Self {
        Self { index, entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Names of the responders that contributed, in order.
    pub fn agents(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.agent.as_str()).collect()
    }
}

/// Result of one `run_debate` call. Owned by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebateOutcome {
    /// Unique id of this debate run.
    pub debate_id: Uuid,
    /// The original prompt.
    pub prompt: String,
    /// Synthesized answer from the designated responder.
    pub final_answer: String,
    /// Human-readable summary of all rounds.
    pub reasoning: String,
    /// True iff the debate stopped before exhausting its round budget.
    pub consensus: bool,
    /// Round index at which convergence was signaled, if ever.
    pub converged_at: Option<u32>,
    /// Name of the responder that synthesized the final answer.
    pub synthesizer: String,
    /// Every round, in order.
    pub rounds: Vec<Round>,
}

impl DebateOutcome {
    pub fn round_count(&self) -> usize {
        self.rounds.len()
    }

    /// All entries, round-then-registration order.
    pub fn entries(&self) -> impl Iterator<Item = &TranscriptEntry> {
        self.rounds.iter().flat_map(|r| r.entries.iter())
    }

    pub fn total_entries(&self) -> usize {
        self.rounds.iter().map(Round::len).sum()
    }

    /// Compact summary line.
    pub fn summary_line(&self) -> String {
        let status = if self.consensus {
            "CONSENSUS"
        } else {
            "NO-CONSENSUS"
        };
        format!(
            "[{}] {} rounds | {} messages | synthesizer={}",
            status,
            self.round_count(),
            self.total_entries(),
            self.synthesizer
        )
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Build the diagnostic reasoning trace: one block per round, each entry's
/// agent name and the first [`TRACE_PREVIEW_CHARS`] characters of its content.
pub fn reasoning_trace(rounds: &[Round]) -> String {
    let mut trace = String::from("Debate Process:\n\n");
    for (i, round) in rounds.iter().enumerate() {
        trace.push_str(&format!("Round {}:\n", i + 1));
        for entry in &round.entries {
            let preview: String = entry.content.chars().take(TRACE_PREVIEW_CHARS).collect();
            trace.push_str(&format!("- {}: {}...\n", entry.agent, preview));
        }
        trace.push('\n');
    }
    trace
}
