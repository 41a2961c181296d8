//! Anthropic messages binding.

use async_trait::async_trait;
use coordination::{ModelBinding, ModelError, DEFAULT_TEMPERATURE};
use serde_json::{json, Value};

use super::{http_client, send_json};

const ANTHROPIC_MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 4096;

pub struct AnthropicModel {
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl AnthropicModel {
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

pub fn request_body(model: &str, persona: &str, instructions: &str) -> Value {
    json!({
        "model": model,
        "max_tokens": MAX_TOKENS,
        "temperature": DEFAULT_TEMPERATURE,
        "system": persona,
        "messages": [{
            "role": "user",
            "content": instructions
        }]
    })
}

/// Concatenate every `text` block of the response.
pub fn extract_content(response: &Value) -> Result<String, ModelError> {
    let blocks = response
        .get("content")
        .and_then(Value::as_array)
        .ok_or_else(|| ModelError::ParseError("Anthropic response missing content".into()))?;

    let text: Vec<&str> = blocks
        .iter()
        .filter(|b| b.get("type").and_then(Value::as_str).unwrap_or("text") == "text")
        .filter_map(|b| b.get("text").and_then(Value::as_str))
        .collect();

    if text.is_empty() {
        return Err(ModelError::ParseError(
            "Anthropic response has no text blocks".into(),
        ));
    }
    Ok(text.concat())
}

#[async_trait]
impl ModelBinding for AnthropicModel {
    async fn generate(&self, persona: &str, instructions: &str) -> Result<String, ModelError> {
        let request = self
            .client
            .post(ANTHROPIC_MESSAGES_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&request_body(&self.model, persona, instructions));

        let response = send_json(request, "Claude").await?;
        extract_content(&response)
    }
}

impl std::fmt::Debug for AnthropicModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnthropicModel")
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body() {
        let body = request_body("claude-3-haiku-20240307", "You are a CPA.", "Itemize?");
        assert_eq!(body["model"], "claude-3-haiku-20240307");
        assert_eq!(body["system"], "You are a CPA.");
        assert_eq!(body["max_tokens"], 4096);
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "Itemize?");
    }

    #[test]
    fn test_extract_content_joins_text_blocks() {
        let response = json!({
            "content": [
                {"type": "text", "text": "Take the "},
                {"type": "text", "text": "standard deduction."}
            ]
        });
        assert_eq!(extract_content(&response).unwrap(), "Take the standard deduction.");
    }

    #[test]
    fn test_extract_content_missing() {
        assert!(matches!(
            extract_content(&json!({"id": "msg_1"})),
            Err(ModelError::ParseError(_))
        ));
        assert!(matches!(
            extract_content(&json!({"content": []})),
            Err(ModelError::ParseError(_))
        ));
    }
}
