//! Running a debate under a deadline and rendering the outcome for humans.

use std::fmt::Write as _;
use std::time::Duration;

use anyhow::{bail, Result};
use chrono::Local;
use coordination::{DebateEngine, DebateOutcome};

/// Characters of each entry shown in the round listing.
pub const ROUND_PREVIEW_CHARS: usize = 200;

/// Run one debate, failing if it does not finish within `deadline`.
///
/// The engine has no deadline of its own; dropping the future on timeout
/// abandons any in-flight model calls.
pub async fn run_with_deadline(
    engine: &DebateEngine,
    prompt: &str,
    deadline: Duration,
) -> Result<DebateOutcome> {
    match tokio::time::timeout(deadline, engine.run_debate(prompt)).await {
        Ok(outcome) => Ok(outcome?),
        Err(_) => bail!("debate timed out after {}s", deadline.as_secs()),
    }
}

/// Human-readable report: every round, the final answer, and stats.
pub fn render_outcome(outcome: &DebateOutcome) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "DEBATE RESULTS");
    let _ = writeln!(out, "{}", "-".repeat(40));

    for (i, round) in outcome.rounds.iter().enumerate() {
        let _ = writeln!(out, "\nRound {}:", i + 1);
        for entry in &round.entries {
            let time = entry.created_at.with_timezone(&Local).format("%H:%M:%S");
            let preview: String = entry.content.chars().take(ROUND_PREVIEW_CHARS).collect();
            let _ = writeln!(out, "\n  {} ({}):", entry.agent, time);
            let _ = writeln!(out, "    {}...", preview);
        }
    }

    let _ = writeln!(out, "\nFINAL ANSWER ({}):", outcome.synthesizer);
    let _ = writeln!(out, "{}", "-".repeat(40));
    let _ = writeln!(out, "{}", outcome.final_answer);

    let _ = writeln!(out, "\nDebate Stats:");
    let _ = writeln!(out, "  Rounds: {}", outcome.round_count());
    let _ = writeln!(
        out,
        "  Consensus Reached: {}",
        if outcome.consensus { "yes" } else { "no" }
    );
    let _ = writeln!(out, "  Total Messages: {}", outcome.total_entries());
    out
}
