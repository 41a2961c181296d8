//! OpenAI chat-completions binding.

use async_trait::async_trait;
use coordination::{ModelBinding, ModelError, DEFAULT_TEMPERATURE};
use serde_json::{json, Value};

use super::{http_client, required_text, send_json};

const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";

pub struct OpenAiModel {
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl OpenAiModel {
    pub fn new(api_key: String, model: String) -> Result<Self, ModelError> {
        Ok(Self {
            api_key,
            model,
            client: http_client()?,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

/// Chat-completions request with the persona as the system message.
pub fn request_body(model: &str, persona: &str, instructions: &str) -> Value {
    json!({
        "model": model,
        "temperature": DEFAULT_TEMPERATURE,
        "messages": [
            {"role": "system", "content": persona},
            {"role": "user", "content": instructions}
        ]
    })
}

pub fn extract_content(response: &Value) -> Result<String, ModelError> {
    required_text(response.pointer("/choices/0/message/content"), "OpenAI").map(str::to_string)
}

#[async_trait]
impl ModelBinding for OpenAiModel {
    async fn generate(&self, persona: &str, instructions: &str) -> Result<String, ModelError> {
        let request = self
            .client
            .post(OPENAI_CHAT_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request_body(&self.model, persona, instructions));

        let response = send_json(request, "OpenAI").await?;
        extract_content(&response)
    }
}

impl std::fmt::Debug for OpenAiModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiModel")
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}
