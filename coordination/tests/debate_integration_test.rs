//! Debate integration tests: full debates over deterministic model stubs.
//!
//! Tests verify:
//! - Round count and consensus under the round budget and threshold
//! - Round 0 composition and registration ordering under concurrency
//! - Critique context excludes the critic's own entries
//! - Model failures abort the debate
//! - Responder set mutations between debates

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use coordination::{
    Capability, CapabilityDescriptor, CapabilityError, CapabilityRegistry, DebateConfig,
    DebateEngine, DebateError, ModelBinding, ModelError, Responder, ResponderIdentity,
    SynthesizerPolicy,
};

// ── Stub models ────────────────────────────────────────────────────

/// Always returns the same text.
struct FixedModel(String);

#[async_trait]
impl ModelBinding for FixedModel {
    async fn generate(&self, _persona: &str, _instructions: &str) -> Result<String, ModelError> {
        Ok(self.0.clone())
    }
}

/// Returns the fixed text after a delay.
struct DelayedModel {
    text: String,
    delay: Duration,
}

#[async_trait]
impl ModelBinding for DelayedModel {
    async fn generate(&self, _persona: &str, _instructions: &str) -> Result<String, ModelError> {
        tokio::time::sleep(self.delay).await;
        Ok(self.text.clone())
    }
}

/// Always fails.
struct FailingModel;

#[async_trait]
impl ModelBinding for FailingModel {
    async fn generate(&self, _persona: &str, _instructions: &str) -> Result<String, ModelError> {
        Err(ModelError::RequestFailed("connection refused".into()))
    }
}

/// Answers its first `healthy_calls` requests, then fails. Counts every call.
struct FailsAfter {
    text: String,
    healthy_calls: usize,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl ModelBinding for FailsAfter {
    async fn generate(&self, _persona: &str, _instructions: &str) -> Result<String, ModelError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.healthy_calls {
            Ok(self.text.clone())
        } else {
            Err(ModelError::RateLimited("quota exhausted".into()))
        }
    }
}

/// Returns a fixed text and records every instruction it receives.
struct RecordingModel {
    text: String,
    seen: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl ModelBinding for RecordingModel {
    async fn generate(&self, _persona: &str, instructions: &str) -> Result<String, ModelError> {
        self.seen
            .lock()
            .expect("recording lock poisoned")
            .push(instructions.to_string());
        Ok(self.text.clone())
    }
}

struct Echo;

#[async_trait]
impl Capability for Echo {
    async fn invoke(&self, argument: &str) -> Result<String, CapabilityError> {
        Ok(argument.to_string())
    }
}

fn fixed(name: &str, text: &str) -> Responder {
    Responder::new(
        ResponderIdentity::new(name, "Analyst", format!("You are {name}.")),
        Box::new(FixedModel(text.to_string())),
    )
}

/// Three responders whose outputs share no tokens.
fn divergent_panel() -> Vec<Responder> {
    vec![
        fixed("Alpha", "apples grow slowly"),
        fixed("Beta", "zebras run fast"),
        fixed("Gamma", "quartz melts hot"),
    ]
}

// ── Scenarios ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_unreachable_threshold_exhausts_round_budget() {
    let config = DebateConfig::default()
        .with_max_rounds(3)
        .with_threshold(0.99);
    let engine = DebateEngine::with_config(divergent_panel(), config).unwrap();

    let outcome = engine.run_debate("Which is best?").await.unwrap();

    assert_eq!(outcome.round_count(), 3);
    assert!(!outcome.consensus);
    assert_eq!(outcome.converged_at, None);
    assert_eq!(outcome.total_entries(), 9);
    for (i, round) in outcome.rounds.iter().enumerate() {
        assert_eq!(round.index, i as u32);
        assert_eq!(round.agents(), vec!["Alpha", "Beta", "Gamma"]);
        assert!(round.entries.iter().all(|e| e.round == i as u32));
    }
}

#[tokio::test]
async fn test_identical_outputs_converge_after_first_critique() {
    let engine = DebateEngine::new(vec![
        fixed("Alpha", "use a hashmap with fast lookups"),
        fixed("Beta", "use a hashmap with fast lookups"),
    ])
    .unwrap();

    let outcome = engine.run_debate("Pick a structure").await.unwrap();

    assert_eq!(outcome.round_count(), 2);
    assert!(outcome.consensus);
    assert_eq!(outcome.converged_at, Some(1));
}

#[tokio::test]
async fn test_convergence_on_last_round_is_not_consensus() {
    let config = DebateConfig::default().with_max_rounds(2);
    let engine = DebateEngine::with_config(
        vec![fixed("Alpha", "same words"), fixed("Beta", "same words")],
        config,
    )
    .unwrap();

    let outcome = engine.run_debate("q").await.unwrap();

    assert_eq!(outcome.round_count(), 2);
    assert_eq!(outcome.converged_at, Some(1));
    assert!(!outcome.consensus);
}

#[tokio::test]
async fn test_single_round_budget_skips_critique() {
    let config = DebateConfig::default().with_max_rounds(1);
    let engine = DebateEngine::with_config(divergent_panel(), config).unwrap();

    let outcome = engine.run_debate("q").await.unwrap();

    assert_eq!(outcome.round_count(), 1);
    assert_eq!(outcome.rounds[0].len(), 3);
    assert!(!outcome.consensus);
}

#[tokio::test]
async fn test_round_count_within_budget() {
    for max_rounds in 1..=4 {
        let config = DebateConfig::default().with_max_rounds(max_rounds);
        let engine = DebateEngine::with_config(divergent_panel(), config).unwrap();
        let outcome = engine.run_debate("q").await.unwrap();
        assert!(outcome.round_count() >= 1);
        assert!(outcome.round_count() <= max_rounds as usize);
    }
}

#[tokio::test]
async fn test_initial_round_keeps_registration_order() {
    let slow_first = Responder::new(
        ResponderIdentity::new("Slow", "Analyst", "You are slow."),
        Box::new(DelayedModel {
            text: "slow answer".into(),
            delay: Duration::from_millis(60),
        }),
    );
    let fast_second = Responder::new(
        ResponderIdentity::new("Fast", "Analyst", "You are fast."),
        Box::new(DelayedModel {
            text: "fast answer".into(),
            delay: Duration::from_millis(1),
        }),
    );
    let config = DebateConfig::default().with_max_rounds(1);
    let engine = DebateEngine::with_config(vec![slow_first, fast_second], config).unwrap();

    let outcome = engine.run_debate("q").await.unwrap();

    let round0 = &outcome.rounds[0];
    assert_eq!(round0.agents(), vec!["Slow", "Fast"]);
    assert_eq!(round0.entries[0].content, "slow answer");
    assert_eq!(round0.entries[1].content, "fast answer");
}

#[tokio::test]
async fn test_critique_context_excludes_own_entries() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let recorder = Responder::new(
        ResponderIdentity::new("Alpha", "Analyst", "You are Alpha."),
        Box::new(RecordingModel {
            text: "alpha view".into(),
            seen: Arc::clone(&seen),
        }),
    );
    let config = DebateConfig::default()
        .with_max_rounds(2)
        .with_threshold(0.99)
        .with_synthesizer(SynthesizerPolicy::Named("Beta".into()));
    let engine =
        DebateEngine::with_config(vec![recorder, fixed("Beta", "beta view")], config).unwrap();

    engine.run_debate("Original?").await.unwrap();

    let seen = seen.lock().unwrap();
    // Round 0 answer, then one critique.
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0], "Original?");
    let critique = &seen[1];
    assert!(critique.contains("Original question: Original?"));
    assert!(critique.contains("Beta: beta view"));
    assert!(!critique.contains("Alpha: alpha view"));
}

#[tokio::test]
async fn test_synthesizer_sees_every_entry() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let recorder = Responder::new(
        ResponderIdentity::new("Alpha", "Analyst", "You are Alpha."),
        Box::new(RecordingModel {
            text: "alpha view".into(),
            seen: Arc::clone(&seen),
        }),
    );
    let config = DebateConfig::default()
        .with_max_rounds(2)
        .with_threshold(0.99);
    let engine =
        DebateEngine::with_config(vec![recorder, fixed("Beta", "beta view")], config).unwrap();

    let outcome = engine.run_debate("q").await.unwrap();

    assert_eq!(outcome.synthesizer, "Alpha");
    assert_eq!(outcome.final_answer, "alpha view");

    let seen = seen.lock().unwrap();
    let synthesis = seen.last().unwrap();
    assert!(synthesis.contains("All agents' responses from the debate:"));
    assert_eq!(synthesis.matches("Alpha: alpha view").count(), 2);
    assert_eq!(synthesis.matches("Beta: beta view").count(), 2);
}

#[tokio::test]
async fn test_named_synthesizer() {
    let config = DebateConfig::default()
        .with_max_rounds(1)
        .with_synthesizer(SynthesizerPolicy::Named("Gamma".into()));
    let engine = DebateEngine::with_config(divergent_panel(), config).unwrap();

    let outcome = engine.run_debate("q").await.unwrap();

    assert_eq!(outcome.synthesizer, "Gamma");
    assert_eq!(outcome.final_answer, "quartz melts hot");
}

#[tokio::test]
async fn test_missing_named_synthesizer_falls_back_to_first() {
    let config = DebateConfig::default()
        .with_max_rounds(1)
        .with_synthesizer(SynthesizerPolicy::Named("Nobody".into()));
    let engine = DebateEngine::with_config(divergent_panel(), config).unwrap();

    let outcome = engine.run_debate("q").await.unwrap();

    assert_eq!(outcome.synthesizer, "Alpha");
}

#[tokio::test]
async fn test_initial_round_failure_aborts_debate() {
    let failing = Responder::new(
        ResponderIdentity::new("Broken", "Analyst", "You are broken."),
        Box::new(FailingModel),
    );
    let engine = DebateEngine::new(vec![fixed("Alpha", "fine"), failing]).unwrap();

    let err = engine.run_debate("q").await.unwrap_err();

    match err {
        DebateError::Model { responder, source } => {
            assert_eq!(responder, "Broken");
            assert!(matches!(source, ModelError::RequestFailed(_)));
        }
        other => panic!("expected model error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_critique_round_failure_aborts_debate() {
    let beta_calls = Arc::new(AtomicUsize::new(0));
    let gamma_calls = Arc::new(AtomicUsize::new(0));
    let responders = vec![
        fixed("Alpha", "apples grow slowly"),
        Responder::new(
            ResponderIdentity::new("Beta", "Analyst", "You are Beta."),
            Box::new(FailsAfter {
                text: "zebras run fast".into(),
                healthy_calls: 1,
                calls: beta_calls.clone(),
            }),
        ),
        Responder::new(
            ResponderIdentity::new("Gamma", "Analyst", "You are Gamma."),
            Box::new(FailsAfter {
                text: "quartz melts hot".into(),
                healthy_calls: usize::MAX,
                calls: gamma_calls.clone(),
            }),
        ),
    ];
    let config = DebateConfig::default()
        .with_max_rounds(3)
        .with_threshold(0.99);
    let engine = DebateEngine::with_config(responders, config).unwrap();

    let result = engine.run_debate("q").await;

    let (responder, source) = match result {
        Err(DebateError::Model { responder, source }) => (responder, source),
        other => panic!("expected a model error from the critique round, got {other:?}"),
    };
    assert_eq!(responder, "Beta");
    assert!(matches!(source, ModelError::RateLimited(_)));
    // Beta failed on its round-1 critique; Gamma never got its turn in that round.
    assert_eq!(beta_calls.load(Ordering::SeqCst), 2);
    assert_eq!(gamma_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_synthesis_failure_aborts_debate() {
    let alpha_calls = Arc::new(AtomicUsize::new(0));
    let responders = vec![
        Responder::new(
            ResponderIdentity::new("Alpha", "Analyst", "You are Alpha."),
            Box::new(FailsAfter {
                text: "apples grow slowly".into(),
                healthy_calls: 1,
                calls: alpha_calls.clone(),
            }),
        ),
        fixed("Beta", "zebras run fast"),
    ];
    let engine =
        DebateEngine::with_config(responders, DebateConfig::default().with_max_rounds(1)).unwrap();

    let result = engine.run_debate("q").await;

    let (responder, source) = match result {
        Err(DebateError::Model { responder, source }) => (responder, source),
        other => panic!("expected a model error from synthesis, got {other:?}"),
    };
    assert_eq!(responder, "Alpha");
    assert!(matches!(source, ModelError::RateLimited(_)));
    assert_eq!(alpha_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_removal_between_debates() {
    let mut engine = DebateEngine::with_config(
        divergent_panel(),
        DebateConfig::default().with_max_rounds(1),
    )
    .unwrap();

    let first = engine.run_debate("q").await.unwrap();
    assert!(engine.remove_responder("Beta"));
    let second = engine.run_debate("q").await.unwrap();

    assert_eq!(first.rounds[0].len(), 3);
    assert_eq!(second.rounds[0].len(), 2);
    assert_eq!(first.rounds[0].agents(), vec!["Alpha", "Beta", "Gamma"]);
    assert_eq!(second.rounds[0].agents(), vec!["Alpha", "Gamma"]);
    assert_ne!(first.debate_id, second.debate_id);
}

#[tokio::test]
async fn test_empty_set_after_removal_fails() {
    let mut engine = DebateEngine::new(vec![fixed("Solo", "answer")]).unwrap();
    assert!(engine.remove_responder("Solo"));
    assert!(!engine.remove_responder("Solo"));

    let err = engine.run_debate("q").await.unwrap_err();
    assert!(matches!(err, DebateError::NoResponders));
}

#[tokio::test]
async fn test_added_responder_joins_next_debate() {
    let mut engine = DebateEngine::with_config(
        vec![fixed("Alpha", "one")],
        DebateConfig::default().with_max_rounds(1),
    )
    .unwrap();

    engine.add_responder(fixed("Beta", "two")).unwrap();
    let dup = engine.add_responder(fixed("Beta", "again")).unwrap_err();
    assert!(matches!(dup, DebateError::DuplicateResponder(ref n) if n == "Beta"));

    let names: Vec<&str> = engine
        .list_responders()
        .iter()
        .map(|i| i.name.as_str())
        .collect();
    assert_eq!(names, vec!["Alpha", "Beta"]);

    let outcome = engine.run_debate("q").await.unwrap();
    assert_eq!(outcome.rounds[0].agents(), vec!["Alpha", "Beta"]);
}

#[test]
fn test_construction_rejects_bad_input() {
    assert!(matches!(
        DebateEngine::new(Vec::new()).unwrap_err(),
        DebateError::NoResponders
    ));
    assert!(matches!(
        DebateEngine::new(vec![fixed("Alpha", "a"), fixed("Alpha", "b")]).unwrap_err(),
        DebateError::DuplicateResponder(_)
    ));
    assert!(matches!(
        DebateEngine::with_config(
            vec![fixed("Alpha", "a")],
            DebateConfig::default().with_max_rounds(0)
        )
        .unwrap_err(),
        DebateError::InvalidConfig(_)
    ));
}

#[tokio::test]
async fn test_capability_calls_resolved_inside_debate() {
    let registry = CapabilityRegistry::new()
        .with(CapabilityDescriptor::from_handler("echo", "Echo the argument", Echo))
        .unwrap();
    let identity = ResponderIdentity::new("Tooler", "Analyst", "You use tools.")
        .with_capabilities(["echo"]);
    let tooler = Responder::with_registry(
        identity,
        Box::new(FixedModel(
            "see [CAPABILITY_CALL: echo] hi [/CAPABILITY_CALL]".into(),
        )),
        &registry,
    )
    .unwrap();
    let engine =
        DebateEngine::with_config(vec![tooler], DebateConfig::default().with_max_rounds(1))
            .unwrap();

    let outcome = engine.run_debate("q").await.unwrap();

    assert_eq!(
        outcome.rounds[0].entries[0].content,
        "see [Tool Result from echo]: hi"
    );
    assert_eq!(outcome.final_answer, "see [Tool Result from echo]: hi");
}

#[tokio::test]
async fn test_reasoning_trace_lists_every_round() {
    let config = DebateConfig::default()
        .with_max_rounds(2)
        .with_threshold(0.99);
    let engine = DebateEngine::with_config(divergent_panel(), config).unwrap();

    let outcome = engine.run_debate("q").await.unwrap();

    assert!(outcome.reasoning.starts_with("Debate Process:"));
    assert!(outcome.reasoning.contains("Round 1:"));
    assert!(outcome.reasoning.contains("Round 2:"));
    assert!(outcome.reasoning.contains("- Gamma: quartz melts hot..."));
}
