use async_trait::async_trait;
use thiserror::Error;

/// Parameters for a single chat completion attempt
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub model: String,
    pub prompt: String,
    pub temperature: f32,
}

#[derive(Debug, Error)]
pub enum LlmError {
    /// Non-success HTTP status from the server
    #[error("HTTP {0}")]
    Status(u16),

    /// Network failure or undecodable body
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

/// Interface to the OpenAI-compatible server. The console controller only
/// talks to this trait, so it can be exercised against a mock backend.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// List model identifiers via `GET <base>/v1/models`
    async fn list_models(&self, api_base: &str) -> Result<Vec<String>, LlmError>;

    /// Issue `POST <base>/v1/chat/completions` and return the content of
    /// the first choice, untrimmed (may be empty)
    async fn chat_completion(
        &self,
        api_base: &str,
        request: CompletionRequest,
    ) -> Result<String, LlmError>;
}
