//! Runtime configuration for provider keys, default models, and debate limits.
//!
//! ## Precedence (highest to lowest)
//!
//! 1. Command-line flags (applied by the binary)
//! 2. Environment variables, including a `.env` file loaded by [`AppConfig::load`]
//! 3. Built-in defaults
//!
//! | Variable                        | Default                    |
//! |---------------------------------|----------------------------|
//! | `OPENAI_API_KEY`                | unset                      |
//! | `ANTHROPIC_API_KEY`             | unset                      |
//! | `GOOGLE_API_KEY`                | unset                      |
//! | `DEBATE_OPENAI_MODEL`           | `gpt-3.5-turbo`            |
//! | `DEBATE_ANTHROPIC_MODEL`        | `claude-3-haiku-20240307`  |
//! | `DEBATE_GOOGLE_MODEL`           | `gemini-1.5-flash`         |
//! | `DEBATE_MAX_ROUNDS`             | `3`                        |
//! | `DEBATE_CONVERGENCE_THRESHOLD`  | `0.7`                      |
//! | `DEBATE_TIMEOUT_SECS`           | `300`                      |
//! | `DEBATE_LOCAL_FILES_DIR`        | `context/localFiles`       |

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use coordination::{DebateConfig, ModelError};

use crate::providers::ProviderKind;

const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";
const DEFAULT_ANTHROPIC_MODEL: &str = "claude-3-haiku-20240307";
const DEFAULT_GOOGLE_MODEL: &str = "gemini-1.5-flash";
/// Wall-clock budget for one whole debate.
const DEFAULT_TIMEOUT_SECS: u64 = 300;
const DEFAULT_LOCAL_FILES_DIR: &str = "context/localFiles";

const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";
const ENV_ANTHROPIC_API_KEY: &str = "ANTHROPIC_API_KEY";
const ENV_GOOGLE_API_KEY: &str = "GOOGLE_API_KEY";
const ENV_OPENAI_MODEL: &str = "DEBATE_OPENAI_MODEL";
const ENV_ANTHROPIC_MODEL: &str = "DEBATE_ANTHROPIC_MODEL";
const ENV_GOOGLE_MODEL: &str = "DEBATE_GOOGLE_MODEL";
const ENV_MAX_ROUNDS: &str = "DEBATE_MAX_ROUNDS";
const ENV_CONVERGENCE_THRESHOLD: &str = "DEBATE_CONVERGENCE_THRESHOLD";
const ENV_TIMEOUT_SECS: &str = "DEBATE_TIMEOUT_SECS";
const ENV_LOCAL_FILES_DIR: &str = "DEBATE_LOCAL_FILES_DIR";

/// Credentials and default model for one provider.
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    pub api_key: Option<String>,
    pub default_model: String,
    /// Environment variable the key is read from (for error messages).
    pub key_var: &'static str,
}

impl ProviderSettings {
    pub fn has_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }
}

/// Top-level application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub openai: ProviderSettings,
    pub anthropic: ProviderSettings,
    pub google: ProviderSettings,
    pub debate: DebateConfig,
    /// External deadline for one whole debate.
    pub timeout: Duration,
    /// Directory served by the local file tools.
    pub local_files_dir: PathBuf,
}

impl AppConfig {
    /// Load `.env` (if present), then read the process environment.
    pub fn load() -> Result<Self> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                tracing::warn!("Failed to load .env file: {e}");
            }
        }
        Self::from_env()
    }

    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut debate = DebateConfig::default();
        if let Some(rounds) = parse_var::<u32, _>(&lookup, ENV_MAX_ROUNDS)? {
            debate.max_rounds = rounds;
        }
        if let Some(threshold) = parse_var::<f64, _>(&lookup, ENV_CONVERGENCE_THRESHOLD)? {
            debate.convergence_threshold = threshold;
        }
        let timeout_secs =
            parse_var::<u64, _>(&lookup, ENV_TIMEOUT_SECS)?.unwrap_or(DEFAULT_TIMEOUT_SECS);

        Ok(Self {
            openai: ProviderSettings {
                api_key: non_empty(ENV_OPENAI_API_KEY),
                default_model: non_empty(ENV_OPENAI_MODEL)
                    .unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
                key_var: ENV_OPENAI_API_KEY,
            },
            anthropic: ProviderSettings {
                api_key: non_empty(ENV_ANTHROPIC_API_KEY),
                default_model: non_empty(ENV_ANTHROPIC_MODEL)
                    .unwrap_or_else(|| DEFAULT_ANTHROPIC_MODEL.to_string()),
                key_var: ENV_ANTHROPIC_API_KEY,
            },
            google: ProviderSettings {
                api_key: non_empty(ENV_GOOGLE_API_KEY),
                default_model: non_empty(ENV_GOOGLE_MODEL)
                    .unwrap_or_else(|| DEFAULT_GOOGLE_MODEL.to_string()),
                key_var: ENV_GOOGLE_API_KEY,
            },
            debate,
            timeout: Duration::from_secs(timeout_secs),
            local_files_dir: non_empty(ENV_LOCAL_FILES_DIR)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOCAL_FILES_DIR)),
        })
    }

    pub fn provider(&self, kind: ProviderKind) -> &ProviderSettings {
        match kind {
            ProviderKind::OpenAi => &self.openai,
            ProviderKind::Anthropic => &self.anthropic,
            ProviderKind::Google => &self.google,
        }
    }

    /// Fail unless every provider in `providers` has an API key.
    ///
    /// Only the providers a roster actually uses need keys.
    pub fn require_keys(&self, providers: &[ProviderKind]) -> Result<(), ModelError> {
        let mut missing: Vec<&str> = providers
            .iter()
            .map(|kind| self.provider(*kind))
            .filter(|settings| !settings.has_key())
            .map(|settings| settings.key_var)
            .collect();
        missing.sort_unstable();
        missing.dedup();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ModelError::MissingApiKey(missing.join(", ")))
        }
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).filter(|v| !v.trim().is_empty()) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .with_context(|| format!("invalid value for {key}: {raw:?}")),
    }
}
