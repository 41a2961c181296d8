//! Responder: one language model behind a fixed persona and an optional,
//! immutable set of capabilities.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::capability::{
    capability_instructions, resolve_capability_calls, CapabilityDescriptor, CapabilityRegistry,
};
use crate::error::{DebateError, ModelError};
use crate::model::ModelBinding;
use crate::transcript::{render_entries, TranscriptEntry};

/// Stable identity of a responder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponderIdentity {
    /// Unique name for the lifetime of a debate.
    pub name: String,
    /// Free-form role label (e.g. "Tax Law Specialist").
    pub role: String,
    /// Persona (system) instructions.
    pub persona: String,
    /// Names of the bound capabilities.
    #[serde(default)]
    pub capabilities: Vec<String>,
}

impl ResponderIdentity {
    pub fn new(
        name: impl Into<String>,
        role: impl Into<String>,
        persona: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            role: role.into(),
            persona: persona.into(),
            capabilities: Vec::new(),
        }
    }

    /// Request specific capabilities by name (resolved at construction).
    pub fn with_capabilities<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.capabilities = names.into_iter().map(Into::into).collect();
        self
    }
}

/// A debate participant.
pub struct Responder {
    identity: ResponderIdentity,
    model: Box<dyn ModelBinding>,
    capabilities: Vec<CapabilityDescriptor>,
}

impl std::fmt::Debug for Responder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Responder")
            .field("identity", &self.identity)
            .field("capabilities", &self.capabilities)
            .finish_non_exhaustive()
    }
}

impl Responder {
    /// Capability-free responder. Any capability names on the identity are
    /// dropped with a warning; use [`Responder::with_registry`] to bind them.
    pub fn new(mut identity: ResponderIdentity, model: Box<dyn ModelBinding>) -> Self {
        if !identity.capabilities.is_empty() {
            warn!(
                responder = %identity.name,
                dropped = ?identity.capabilities,
                "capabilities requested without a registry; ignoring them"
            );
            identity.capabilities.clear();
        }
        Self {
            identity,
            model,
            capabilities: Vec::new(),
        }
    }

    /// Responder bound to capabilities from `registry`.
    ///
    /// An empty `identity.capabilities` grants every registered capability.
    /// An unknown name fails construction.
    pub fn with_registry(
        mut identity: ResponderIdentity,
        model: Box<dyn ModelBinding>,
        registry: &CapabilityRegistry,
    ) -> Result<Self, DebateError> {
        let capabilities = registry.create_bound_set(Some(identity.capabilities.as_slice()))?;
        identity.capabilities = capabilities.iter().map(|c| c.name.clone()).collect();
        Ok(Self {
            identity,
            model,
            capabilities,
        })
    }

    pub fn name(&self) -> &str {
        &self.identity.name
    }

    pub fn role(&self) -> &str {
        &self.identity.role
    }

    pub fn identity(&self) -> &ResponderIdentity {
        &self.identity
    }

    pub fn capabilities(&self) -> &[CapabilityDescriptor] {
        &self.capabilities
    }

    pub fn has_capabilities(&self) -> bool {
        !self.capabilities.is_empty()
    }

    /// Persona instructions, extended with the capability manifest and call
    /// syntax when capabilities are bound.
    pub fn persona(&self) -> String {
        if self.capabilities.is_empty() {
            self.identity.persona.clone()
        } else {
            format!(
                "{}\n\n{}",
                self.identity.persona,
                capability_instructions(&self.capabilities)
            )
        }
    }

    /// Answer `prompt`, optionally in light of earlier entries.
    pub async fn generate_response(
        &self,
        prompt: &str,
        context: Option<&[TranscriptEntry]>,
    ) -> Result<String, ModelError> {
        let instructions = match context {
            Some(entries) if !entries.is_empty() => format!(
                "Previous discussion:\n{}\n\nNow respond to: {}",
                render_entries(entries),
                prompt
            ),
            _ => prompt.to_string(),
        };

        debug!(
            responder = %self.identity.name,
            prompt_chars = instructions.len(),
            "invoking model"
        );
        let raw = self.model.generate(&self.persona(), &instructions).await?;

        if self.capabilities.is_empty() {
            return Ok(raw);
        }
        Ok(resolve_capability_calls(&raw, &self.capabilities).await)
    }

    /// Critique the other responders' entries (own entries are filtered out).
    pub async fn critique(
        &self,
        entries: &[TranscriptEntry],
        original_prompt: &str,
    ) -> Result<String, ModelError> {
        let others = render_entries(entries.iter().filter(|e| e.agent != self.identity.name));
        self.generate_response(&critique_prompt(original_prompt, &others), None)
            .await
    }

    /// Produce the final answer from every entry of the debate.
    pub async fn synthesize(
        &self,
        entries: &[TranscriptEntry],
        original_prompt: &str,
    ) -> Result<String, ModelError> {
        let all = render_entries(entries);
        self.generate_response(&synthesis_prompt(original_prompt, &all), None)
            .await
    }
}

fn critique_prompt(original_prompt: &str, others: &str) -> String {
    format!(
        "\nOriginal question: {original_prompt}\n\n\
         Other agents' responses:\n{others}\n\n\
         Please critique these responses and provide your own perspective. Focus on:\n\
         1. What you agree with\n\
         2. What you disagree with and why\n\
         3. What might be missing\n\
         4. Your alternative or refined approach\n"
    )
}

fn synthesis_prompt(original_prompt: &str, all: &str) -> String {
    format!(
        "\nOriginal question: {original_prompt}\n\n\
         All agents' responses from the debate:\n{all}\n\n\
         Based on this discussion, provide a final synthesized answer that incorporates \
         the best insights from all perspectives. Be decisive and clear in your final \
         recommendation.\n"
    )
}
