//! Language-model binding abstraction.
//!
//! A responder depends only on this trait. Provider variants (OpenAI,
//! Anthropic, Gemini, test stubs) each implement the single `generate`
//! operation; transport is entirely their concern.

use async_trait::async_trait;

use crate::error::ModelError;

/// Sampling temperature every provider binding uses.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// One underlying language model.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ModelBinding: Send + Sync {
    /// Generate text from a persona (system) instruction and a user instruction.
    async fn generate(&self, persona: &str, instructions: &str) -> Result<String, ModelError>;
}
