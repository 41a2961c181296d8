//! Capabilities: named external actions a responder may invoke through the
//! text-embedded call protocol.
//!
//! The core treats every capability as opaque: one text argument in, text
//! (or a [`CapabilityError`]) out. Concrete file and search capabilities live
//! in the hosting crate.

pub mod protocol;
pub mod registry;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::CapabilityError;

pub use protocol::{capability_instructions, resolve_capability_calls};
pub use registry::CapabilityRegistry;

/// An invocable external action.
#[async_trait]
pub trait Capability: Send + Sync {
    /// Invoke with a single (already trimmed) text argument.
    async fn invoke(&self, argument: &str) -> Result<String, CapabilityError>;
}

/// Registry entry: a unique name, a description shown to models, and the
/// shared handler.
#[derive(Clone)]
pub struct CapabilityDescriptor {
    pub name: String,
    pub description: String,
    handler: Arc<dyn Capability>,
}

impl CapabilityDescriptor {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        handler: Arc<dyn Capability>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            handler,
        }
    }

    /// Convenience constructor taking the handler by value.
    pub fn from_handler<C>(name: impl Into<String>, description: impl Into<String>, handler: C) -> Self
    where
        C: Capability + 'static,
    {
        Self::new(name, description, Arc::new(handler))
    }

    pub async fn invoke(&self, argument: &str) -> Result<String, CapabilityError> {
        self.handler.invoke(argument).await
    }

    /// Manifest line: `- name: description`.
    pub fn manifest_line(&self) -> String {
        format!("- {}: {}", self.name, self.description)
    }
}

impl fmt::Debug for CapabilityDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapabilityDescriptor")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}
