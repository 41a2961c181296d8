//! Google Gemini `generateContent` binding.

use async_trait::async_trait;
use coordination::{ModelBinding, ModelError, DEFAULT_TEMPERATURE};
use serde_json::{json, Value};

use super::{http_client, required_text, send_json};

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

pub struct GeminiModel {
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl GeminiModel {
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

    fn endpoint(&self) -> String {
        format!("{}/{}:generateContent", GEMINI_BASE_URL, self.model)
    }
}

pub fn request_body(persona: &str, instructions: &str) -> Value {
    json!({
        "systemInstruction": {
            "parts": [{"text": persona}]
        },
        "contents": [{
            "role": "user",
            "parts": [{"text": instructions}]
        }],
        "generationConfig": {
            "temperature": DEFAULT_TEMPERATURE
        }
    })
}

pub fn extract_content(response: &Value) -> Result<String, ModelError> {
    required_text(
        response.pointer("/candidates/0/content/parts/0/text"),
        "Gemini",
    )
    .map(str::to_string)
}

#[async_trait]
impl ModelBinding for GeminiModel {
    async fn generate(&self, persona: &str, instructions: &str) -> Result<String, ModelError> {
        let request = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body(persona, instructions));

        let response = send_json(request, "Gemini").await?;
        extract_content(&response)
    }
}

impl std::fmt::Debug for GeminiModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiModel")
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}
