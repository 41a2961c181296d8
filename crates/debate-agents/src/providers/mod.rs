//! Language-model bindings for the hosted chat APIs.
//!
//! Each provider is a thin `reqwest` client implementing
//! [`coordination::ModelBinding`]. Request bodies and response parsing are
//! pure functions so they can be tested without the network.

pub mod anthropic;
pub mod gemini;
pub mod openai;

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use coordination::{ModelBinding, ModelError};
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;

pub use anthropic::AnthropicModel;
pub use gemini::GeminiModel;
pub use openai::OpenAiModel;

/// Per-request HTTP timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Supported hosted providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    OpenAi,
    Anthropic,
    #[serde(alias = "gemini")]
    Google,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 3] = [Self::OpenAi, Self::Anthropic, Self::Google];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
            Self::Google => "google",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "anthropic" => Ok(Self::Anthropic),
            "google" | "gemini" => Ok(Self::Google),
            other => Err(ModelError::Unsupported(other.to_string())),
        }
    }
}

/// Build a model binding for `kind`.
///
/// `model_name` overrides the provider's configured default model.
pub fn build_model(
    kind: ProviderKind,
    model_name: Option<&str>,
    config: &AppConfig,
) -> Result<Box<dyn ModelBinding>, ModelError> {
    let settings = config.provider(kind);
    let api_key = settings
        .api_key
        .clone()
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| ModelError::MissingApiKey(settings.key_var.to_string()))?;
    let model = model_name
        .map(str::to_string)
        .unwrap_or_else(|| settings.default_model.clone());

    tracing::debug!(provider = %kind, model = %model, "building model binding");
    let binding: Box<dyn ModelBinding> = match kind {
        ProviderKind::OpenAi => Box::new(OpenAiModel::new(api_key, model)?),
        ProviderKind::Anthropic => Box::new(AnthropicModel::new(api_key, model)?),
        ProviderKind::Google => Box::new(GeminiModel::new(api_key, model)?),
    };
    Ok(binding)
}

pub(crate) fn http_client() -> Result<reqwest::Client, ModelError> {
    reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|e| ModelError::RequestFailed(format!("failed to create HTTP client: {e}")))
}

/// Send a JSON request and return the parsed body, mapping HTTP failures.
pub(crate) async fn send_json(
    request: reqwest::RequestBuilder,
    provider: &str,
) -> Result<serde_json::Value, ModelError> {
    let response = request
        .send()
        .await
        .map_err(|e| ModelError::RequestFailed(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let message = format!("{provider} API error ({status}): {body}");
        return Err(if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            ModelError::RateLimited(message)
        } else {
            ModelError::RequestFailed(message)
        });
    }

    response
        .json()
        .await
        .map_err(|e| ModelError::ParseError(e.to_string()))
}

/// Pull a required string out of a response document.
pub(crate) fn required_text<'a>(
    value: Option<&'a serde_json::Value>,
    provider: &str,
) -> Result<&'a str, ModelError> {
    value
        .and_then(serde_json::Value::as_str)
        .ok_or_else(|| ModelError::ParseError(format!("{provider} response missing content")))
}
