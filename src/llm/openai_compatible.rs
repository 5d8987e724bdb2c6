use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

use super::interface::{ChatBackend, CompletionRequest, LlmError};

/// Client for any OpenAI-compatible server (LM Studio, Ollama, vLLM, ...).
/// One shared reqwest client; the base address is supplied per call because
/// the user can re-point the console at runtime.
#[derive(Debug, Clone)]
pub struct OpenAiCompatibleClient {
    client: Client,
}

#[derive(Debug, Serialize)]
struct ChatCompletionBody<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

impl OpenAiCompatibleClient {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    pub async fn health_check(&self, api_base: &str) -> Result<bool, LlmError> {
        let url = format!("{}/v1/models", api_base);
        let response = self.client.get(&url).send().await?;
        Ok(response.status().is_success())
    }
}

impl Default for OpenAiCompatibleClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatBackend for OpenAiCompatibleClient {
    async fn list_models(&self, api_base: &str) -> Result<Vec<String>, LlmError> {
        let url = format!("{}/v1/models", api_base);
        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(LlmError::Status(response.status().as_u16()));
        }

        // A success body without a `data` array is an empty listing, not an
        // error; entries missing an id are dropped.
        let body: Value = response.json().await?;
        let models = body
            .get("data")
            .and_then(|data| data.as_array())
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|entry| entry.get("id").and_then(|id| id.as_str()))
                    .filter(|id| !id.is_empty())
                    .map(|id| id.to_string())
                    .collect()
            })
            .unwrap_or_default();
        Ok(models)
    }

    async fn chat_completion(
        &self,
        api_base: &str,
        request: CompletionRequest,
    ) -> Result<String, LlmError> {
        let url = format!("{}/v1/chat/completions", api_base);
        let body = ChatCompletionBody {
            model: &request.model,
            messages: vec![ChatMessage {
                role: "user",
                content: &request.prompt,
            }],
            temperature: request.temperature,
        };

        let response = self.client.post(&url).json(&body).send().await?;
        if !response.status().is_success() {
            return Err(LlmError::Status(response.status().as_u16()));
        }

        // Missing choices/message/content collapses to an empty string; the
        // session treats that as "Empty translation returned."
        let body: Value = response.json().await?;
        let content = body
            .pointer("/choices/0/message/content")
            .and_then(|content| content.as_str())
            .unwrap_or("")
            .to_string();
        Ok(content)
    }
}
