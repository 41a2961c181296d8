//! Error taxonomy for debate orchestration.
//!
//! | Failure                      | Type                     | Fatal to a running debate |
//! |------------------------------|--------------------------|---------------------------|
//! | Model invocation             | `ModelError`             | yes (wrapped in `DebateError::Model`) |
//! | Unknown capability at runtime| inline `[Tool Error]` text | no |
//! | Capability execution         | `CapabilityError`        | no (rendered inline) |
//! | Configuration                | `DebateError` setup variants | surfaced before any debate runs |

use thiserror::Error;

/// Errors surfaced by a language-model binding.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("API key not configured for {0}")]
    MissingApiKey(String),

    #[error("Response parse error: {0}")]
    ParseError(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Unsupported provider: {0}")]
    Unsupported(String),
}

/// Errors surfaced by a capability invocation.
///
/// These never abort a debate: the protocol layer renders them inline as
/// `[Tool Error from <name>]: <message>`.
#[derive(Debug, Error)]
pub enum CapabilityError {
    #[error("{0}")]
    Failed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("path `{0}` escapes sandbox")]
    Sandbox(String),
}

impl CapabilityError {
    /// Build a `Failed` variant conveniently.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

/// Unified error type for debate setup and execution.
#[derive(Debug, Error)]
pub enum DebateError {
    // ── Configuration ─────────────────────────────────────────────────────
    /// The active responder set is empty.
    #[error("debate requires at least one responder")]
    NoResponders,

    /// Two responders share a name.
    #[error("responder `{0}` is already registered")]
    DuplicateResponder(String),

    /// A requested capability is absent from the registry.
    #[error("Unknown capability: {0}")]
    UnknownCapability(String),

    /// A capability with this name is already registered.
    #[error("capability `{0}` is already registered")]
    DuplicateCapability(String),

    /// Configuration values are out of range.
    #[error("Configuration error: {0}")]
    InvalidConfig(String),

    // ── Runtime ───────────────────────────────────────────────────────────
    /// A responder's model call failed; aborts the debate.
    #[error("responder `{responder}` failed: {source}")]
    Model {
        responder: String,
        #[source]
        source: ModelError,
    },
}

impl DebateError {
    /// Whether this error was raised while setting up rather than running a debate.
    pub fn is_configuration(&self) -> bool {
        !matches!(self, Self::Model { .. })
    }

    pub(crate) fn model(responder: impl Into<String>, source: ModelError) -> Self {
        Self::Model {
            responder: responder.into(),
            source,
        }
    }
}
