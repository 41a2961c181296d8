//! Multi-Agent Debate Coordination Library
//!
//! This library provides:
//! - A debate engine that runs independent responders through an initial
//!   round, critique rounds, and a final synthesis
//! - A lexical convergence estimator for stopping debates early
//! - A capability-call protocol that lets model output invoke host tools
//!
//! Provider bindings, concrete tools, and the command-line surface live in
//! the `debate-agents` crate.
//!
//! # Usage
//!
//! ```ignore
//! let engine = DebateEngine::with_config(responders, DebateConfig::default())?;
//! let outcome = engine.run_debate("Is Rust a good fit for CLIs?").await?;
//! println!("{}", outcome.final_answer);
//! ```

#![allow(clippy::uninlined_format_args)]

pub mod capability;
pub mod debate;
pub mod error;
pub mod model;
pub mod responder;
pub mod transcript;

// Re-export key debate types
pub use debate::{
    overlap_ratio, ConvergenceEstimator, DebateConfig, DebateEngine, SynthesizerPolicy,
    DEFAULT_CONVERGENCE_THRESHOLD, DEFAULT_MAX_ROUNDS,
};

// Re-export capability types
pub use capability::{
    capability_instructions, resolve_capability_calls, Capability, CapabilityDescriptor,
    CapabilityRegistry,
};

// Re-export error types
pub use error::{CapabilityError, DebateError, ModelError};

pub use model::{ModelBinding, DEFAULT_TEMPERATURE};
pub use responder::{Responder, ResponderIdentity};
pub use transcript::{DebateOutcome, Round, TranscriptEntry};
