//! Debate engine. Drives responders through the round state machine.
//!
//! Round 0 fans out to every responder concurrently and joins on all of
//! them; a single failure fails the debate. Critique rounds run responders
//! one after another against a snapshot of the previous round. The engine is
//! the only writer of the transcript.

use futures::future::try_join_all;
use tracing::{debug, info};
use uuid::Uuid;

use super::config::DebateConfig;
use super::convergence::{overlap_ratio, ConvergenceEstimator};
use crate::error::DebateError;
use crate::responder::{Responder, ResponderIdentity};
use crate::transcript::{reasoning_trace, DebateOutcome, Round, TranscriptEntry};

/// Orchestrates multi-round debates over an owned responder set.
///
/// `run_debate` borrows the engine immutably, so the responder set cannot
/// change while a debate is in flight; `add_responder` / `remove_responder`
/// take effect from the next debate.
#[derive(Debug)]
pub struct DebateEngine {
    responders: Vec<Responder>,
    config: DebateConfig,
    estimator: ConvergenceEstimator,
}

impl DebateEngine {
    /// Create an engine with the default configuration.
    pub fn new(responders: Vec<Responder>) -> Result<Self, DebateError> {
        Self::with_config(responders, DebateConfig::default())
    }

    /// Create an engine with a custom configuration.
    pub fn with_config(
        responders: Vec<Responder>,
        config: DebateConfig,
    ) -> Result<Self, DebateError> {
        config.validate()?;
        if responders.is_empty() {
            return Err(DebateError::NoResponders);
        }

        let mut engine = Self {
            responders: Vec::with_capacity(responders.len()),
            estimator: ConvergenceEstimator::new(config.convergence_threshold),
            config,
        };
        for responder in responders {
            engine.add_responder(responder)?;
        }
        Ok(engine)
    }

    pub fn config(&self) -> &DebateConfig {
        &self.config
    }

    /// Append a responder; it participates from the next debate on.
    pub fn add_responder(&mut self, responder: Responder) -> Result<(), DebateError> {
        if self.responders.iter().any(|r| r.name() == responder.name()) {
            return Err(DebateError::DuplicateResponder(responder.name().to_string()));
        }
        debug!(responder = %responder.name(), "responder added");
        self.responders.push(responder);
        Ok(())
    }

    /// Remove the responder with `name`. Returns whether one was removed.
    pub fn remove_responder(&mut self, name: &str) -> bool {
        let before = self.responders.len();
        self.responders.retain(|r| r.name() != name);
        let removed = self.responders.len() < before;
        if removed {
            debug!(responder = %name, "responder removed");
        }
        removed
    }

    /// Identities of the active responders, in registration order.
    pub fn list_responders(&self) -> Vec<&ResponderIdentity> {
        self.responders.iter().map(Responder::identity).collect()
    }

    pub fn len(&self) -> usize {
        self.responders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.responders.is_empty()
    }

    /// Run one full debate on `prompt`.
    pub async fn run_debate(&self, prompt: &str) -> Result<DebateOutcome, DebateError> {
        if self.responders.is_empty() {
            return Err(DebateError::NoResponders);
        }

        let debate_id = Uuid::new_v4();
        let max_rounds = self.config.max_rounds;
        info!(
            %debate_id,
            responders = self.responders.len(),
            max_rounds,
            "debate starting"
        );

        let mut rounds = vec![self.run_initial_round(prompt).await?];
        let mut converged_at = None;

        for index in 1..max_rounds {
            let round = {
                let previous = &rounds[rounds.len() - 1].entries;
                self.run_critique_round(index, previous, prompt).await?
            };

            let ratio = overlap_ratio(&round.entries);
            let converged = self.estimator.estimate(&round.entries);
            debug!(round = index, ratio, converged, "convergence evaluated");
            rounds.push(round);

            if converged {
                info!(round = index, ratio, "convergence reached");
                converged_at = Some(index);
                break;
            }
        }

        let consensus = (rounds.len() as u32) < max_rounds;

        let names: Vec<&str> = self.responders.iter().map(Responder::name).collect();
        let synthesizer = &self.responders[self.config.synthesizer.select(names.as_slice())];
        let all_entries: Vec<TranscriptEntry> =
            rounds.iter().flat_map(|r| r.entries.iter().cloned()).collect();

        info!(
            synthesizer = %synthesizer.name(),
            entries = all_entries.len(),
            "synthesizing final answer"
        );
        let final_answer = synthesizer
            .synthesize(&all_entries, prompt)
            .await
            .map_err(|e| DebateError::model(synthesizer.name(), e))?;

        let outcome = DebateOutcome {
            debate_id,
            prompt: prompt.to_string(),
            final_answer,
            reasoning: reasoning_trace(&rounds),
            consensus,
            converged_at,
            synthesizer: synthesizer.name().to_string(),
            rounds,
        };
        info!(%debate_id, summary = %outcome.summary_line(), "debate complete");
        Ok(outcome)
    }

    /// Round 0: every responder answers independently and concurrently.
    /// Entries are recorded in registration order regardless of completion order.
    async fn run_initial_round(&self, prompt: &str) -> Result<Round, DebateError> {
        let responses = try_join_all(self.responders.iter().map(|responder| async move {
            responder
                .generate_response(prompt, None)
                .await
                .map_err(|e| DebateError::model(responder.name(), e))
        }))
        .await?;

        let entries = self
            .responders
            .iter()
            .zip(responses)
            .map(|(responder, content)| TranscriptEntry::new(responder.name(), content, 0))
            .collect::<Vec<_>>();

        info!(round = 0, entries = entries.len(), "initial round complete");
        Ok(Round::new(0, entries))
    }

    /// Critique round: responders run sequentially against the same snapshot.
    async fn run_critique_round(
        &self,
        index: u32,
        previous: &[TranscriptEntry],
        prompt: &str,
    ) -> Result<Round, DebateError> {
        let mut entries = Vec::with_capacity(self.responders.len());
        for responder in &self.responders {
            let content = responder
                .critique(previous, prompt)
                .await
                .map_err(|e| DebateError::model(responder.name(), e))?;
            entries.push(TranscriptEntry::new(responder.name(), content, index));
        }

        info!(round = index, entries = entries.len(), "critique round complete");
        Ok(Round::new(index, entries))
    }
}
