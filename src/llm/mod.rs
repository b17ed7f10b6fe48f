mod openai;

pub use openai::OpenAiClient;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("completion request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("generation backend returned HTTP {code}: {message}")]
    Backend { code: u16, message: String },
    #[error("could not decode completion response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("generation backend returned no choices")]
    EmptyChoices,
}

#[derive(Clone, Debug)]
pub struct CompletionConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub timeout: Duration,
}

/// Chat-completion seam for the summarization call: one system instruction,
/// one user message, one synchronous answer.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, system: &str, user: &str) -> Result<String, CompletionError>;
}
