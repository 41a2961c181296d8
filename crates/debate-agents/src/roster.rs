//! Roster files: who debates, on which provider, with which tools.
//!
//! ```toml
//! [debate]
//! max_rounds = 3
//! convergence_threshold = 0.7
//!
//! [[responders]]
//! name = "TaxExpert"
//! role = "Tax Law Specialist"
//! provider = "anthropic"
//! model = "claude-3-haiku-20240307"   # optional, provider default otherwise
//! system_prompt = "You are a tax law expert..."
//! tools = ["web_search"]              # optional; [] grants every tool
//! ```

use std::path::Path;

use anyhow::{bail, Context, Result};
use coordination::{
    CapabilityRegistry, DebateConfig, ModelBinding, ModelError, Responder, ResponderIdentity,
    SynthesizerPolicy,
};
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::providers::{build_model, ProviderKind};

/// Optional `[debate]` overrides. Unset fields keep the base configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DebateOverrides {
    pub max_rounds: Option<u32>,
    pub convergence_threshold: Option<f64>,
    pub synthesizer: Option<SynthesizerPolicy>,
}

impl DebateOverrides {
    pub fn apply(&self, config: &mut DebateConfig) {
        if let Some(rounds) = self.max_rounds {
            config.max_rounds = rounds;
        }
        if let Some(threshold) = self.convergence_threshold {
            config.convergence_threshold = threshold;
        }
        if let Some(policy) = &self.synthesizer {
            config.synthesizer = policy.clone();
        }
    }
}

/// One `[[responders]]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResponderSpec {
    pub name: String,
    pub role: String,
    pub provider: ProviderKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub system_prompt: String,
    /// Absent: no tools. Empty: every registered tool. Otherwise: these names.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<String>>,
}

impl ResponderSpec {
    pub fn identity(&self) -> ResponderIdentity {
        ResponderIdentity::new(&self.name, &self.role, &self.system_prompt)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Roster {
    #[serde(default)]
    pub debate: DebateOverrides,
    #[serde(default)]
    pub responders: Vec<ResponderSpec>,
}

impl Roster {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let roster: Roster = toml::from_str(content).context("invalid roster TOML")?;
        if roster.responders.is_empty() {
            bail!("roster defines no responders");
        }
        Ok(roster)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read roster {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("in roster {}", path.display()))
    }

    /// Distinct providers used, in first-use order.
    pub fn providers(&self) -> Vec<ProviderKind> {
        let mut kinds = Vec::new();
        for spec in &self.responders {
            if !kinds.contains(&spec.provider) {
                kinds.push(spec.provider);
            }
        }
        kinds
    }

    /// Force every responder onto `provider`, dropping per-responder models.
    pub fn with_provider(mut self, provider: ProviderKind) -> Self {
        for spec in &mut self.responders {
            if spec.provider != provider {
                spec.provider = provider;
                spec.model = None;
            }
        }
        self
    }

    /// Build responders with real provider bindings.
    pub fn build_responders(
        &self,
        config: &AppConfig,
        registry: &CapabilityRegistry,
    ) -> Result<Vec<Responder>> {
        self.build_responders_with(registry, |spec| {
            build_model(spec.provider, spec.model.as_deref(), config)
        })
    }

    /// Build responders, obtaining each model binding from `factory`.
    pub fn build_responders_with<F>(
        &self,
        registry: &CapabilityRegistry,
        mut factory: F,
    ) -> Result<Vec<Responder>>
    where
        F: FnMut(&ResponderSpec) -> Result<Box<dyn ModelBinding>, ModelError>,
    {
        self.responders
            .iter()
            .map(|spec| -> Result<Responder> {
                let model = factory(spec)
                    .with_context(|| format!("failed to create model for {}", spec.name))?;
                let responder = match &spec.tools {
                    None => Responder::new(spec.identity(), model),
                    Some(tools) => Responder::with_registry(
                        spec.identity().with_capabilities(tools.iter().cloned()),
                        model,
                        registry,
                    )
                    .with_context(|| format!("invalid tools for {}", spec.name))?,
                };
                Ok(responder)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[debate]
max_rounds = 4

[[responders]]
name = "TaxExpert"
role = "Tax Law Specialist"
provider = "anthropic"
system_prompt = "You are a tax law expert."

[[responders]]
name = "Researcher"
role = "Analyst"
provider = "gemini"
model = "gemini-1.5-pro"
system_prompt = "You research."
tools = ["web_search"]
"#;

    #[test]
    fn test_parse_sample() {
        let roster = Roster::from_toml_str(SAMPLE).unwrap();
        assert_eq!(roster.debate.max_rounds, Some(4));
        assert_eq!(roster.debate.convergence_threshold, None);
        assert_eq!(roster.responders.len(), 2);
        assert_eq!(roster.responders[0].tools, None);
        assert_eq!(roster.responders[1].provider, ProviderKind::Google);
        assert_eq!(roster.responders[1].model.as_deref(), Some("gemini-1.5-pro"));
        assert_eq!(
            roster.providers(),
            vec![ProviderKind::Anthropic, ProviderKind::Google]
        );
    }

    #[test]
    fn test_overrides_apply() {
        let roster = Roster::from_toml_str(SAMPLE).unwrap();
        let mut config = DebateConfig::default();
        roster.debate.apply(&mut config);
        assert_eq!(config.max_rounds, 4);
        assert!((config.convergence_threshold - 0.7).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_roster_rejected() {
        assert!(Roster::from_toml_str("[debate]\nmax_rounds = 2\n").is_err());
    }

    #[test]
    fn test_unknown_provider_rejected() {
        let toml = r#"
[[responders]]
name = "A"
role = "r"
provider = "mistral"
system_prompt = "p"
"#;
        assert!(Roster::from_toml_str(toml).is_err());
    }

    #[test]
    fn test_with_provider_drops_models() {
        let roster = Roster::from_toml_str(SAMPLE)
            .unwrap()
            .with_provider(ProviderKind::OpenAi);
        assert_eq!(roster.providers(), vec![ProviderKind::OpenAi]);
        assert!(roster.responders.iter().all(|s| s.model.is_none()));
    }
}
