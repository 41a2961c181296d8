//! Capability registry, built once by the host and passed by reference
//! to whatever builds responders.

use tracing::debug;

use super::CapabilityDescriptor;
use crate::error::DebateError;

/// Ordered set of named capabilities. Names are unique.
#[derive(Debug, Clone, Default)]
pub struct CapabilityRegistry {
    entries: Vec<CapabilityDescriptor>,
}

impl CapabilityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a capability. Fails if the name is already taken.
    pub fn register(&mut self, descriptor: CapabilityDescriptor) -> Result<(), DebateError> {
        if self.contains(&descriptor.name) {
            return Err(DebateError::DuplicateCapability(descriptor.name));
        }
        debug!(capability = %descriptor.name, "registered capability");
        self.entries.push(descriptor);
        Ok(())
    }

    /// Builder-style `register`.
    pub fn with(mut self, descriptor: CapabilityDescriptor) -> Result<Self, DebateError> {
        self.register(descriptor)?;
        Ok(self)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|d| d.name == name)
    }

    /// Look up a capability by exact name.
    pub fn resolve(&self, name: &str) -> Result<CapabilityDescriptor, DebateError> {
        self.entries
            .iter()
            .find(|d| d.name == name)
            .cloned()
            .ok_or_else(|| DebateError::UnknownCapability(name.to_string()))
    }

    /// Resolve the capability set for one responder.
    ///
    /// `None` or an empty list grants every registered capability. Otherwise
    /// each name is resolved in order and the first unknown name fails the
    /// whole call.
    pub fn create_bound_set<S: AsRef<str>>(
        &self,
        names: Option<&[S]>,
    ) -> Result<Vec<CapabilityDescriptor>, DebateError> {
        match names {
            None => Ok(self.entries.clone()),
            Some(names) if names.is_empty() => Ok(self.entries.clone()),
            Some(names) => names.iter().map(|n| self.resolve(n.as_ref())).collect(),
        }
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|d| d.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Human-readable `- name: description` listing.
    pub fn manifest(&self) -> String {
        self.entries
            .iter()
            .map(CapabilityDescriptor::manifest_line)
            .collect::<Vec<_>>()
            .join("\n")
    }
}
