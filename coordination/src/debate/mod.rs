//! Multi-round debate among independent responders.
//!
//! # Debate Flow
//!
//! ```text
//! Start → Round 0 (all responders, concurrent)
//!           │
//!           ▼
//!   ┌─ Critique round k (responders in order, snapshot of round k-1)
//!   │       │
//!   │       ├─ converged?  yes → Synthesis
//!   │       ├─ rounds left? yes ─┐
//!   └───────┼────────────────────┘
//!           └─ budget exhausted → Synthesis
//!
//! Synthesis → DebateOutcome
//! any responder failure → Err(DebateError::Model)
//! ```

pub mod config;
pub mod convergence;
pub mod engine;

pub use config::{DebateConfig, SynthesizerPolicy, DEFAULT_MAX_ROUNDS};
pub use convergence::{overlap_ratio, ConvergenceEstimator, DEFAULT_CONVERGENCE_THRESHOLD};
pub use engine::DebateEngine;
