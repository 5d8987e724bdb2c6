pub mod interface;
pub mod openai_compatible;

pub use interface::{ChatBackend, CompletionRequest, LlmError};
pub use openai_compatible::OpenAiCompatibleClient;
