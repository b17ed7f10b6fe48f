use std::error::Error as StdError;

use async_trait::async_trait;
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};

use super::{CompletionClient, CompletionConfig, CompletionError};

pub struct OpenAiClient {
    http: HttpClient,
    url: String,
    model: String,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatCompletionMessage<'a>>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatCompletionMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatCompletionChoice>,
}

#[derive(Deserialize)]
struct ChatCompletionChoice {
    message: ChatCompletionChoiceMessage,
}

#[derive(Deserialize)]
struct ChatCompletionChoiceMessage {
    content: String,
}

impl OpenAiClient {
    pub fn from_config(config: &CompletionConfig) -> Result<Self, Box<dyn StdError + Send + Sync>> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", config.api_key))
                .map_err(|e| format!("Invalid API key format: {}", e))?,
        );

        let http = HttpClient::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;
        let url = format!(
            "{}/v1/chat/completions",
            config.base_url.trim_end_matches('/')
        );

        Ok(Self {
            http,
            url,
            model: config.model.clone(),
            temperature: config.temperature,
        })
    }

    #[cfg(test)]
    pub(crate) fn with_base_url(base_url: &str) -> Self {
        use std::time::Duration;

        Self::from_config(&CompletionConfig {
            api_key: "test-key".to_string(),
            base_url: base_url.to_string(),
            model: "gpt-4".to_string(),
            temperature: 0.7,
            timeout: Duration::from_secs(5),
        })
        .expect("test client")
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, system: &str, user: &str) -> Result<String, CompletionError> {
        let request = ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatCompletionMessage {
                    role: "system",
                    content: system,
                },
                ChatCompletionMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: self.temperature,
        };

        let response = self.http.post(&self.url).json(&request).send().await?;
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            let snippet: String = text.chars().take(200).collect();
            return Err(CompletionError::Backend {
                code: status.as_u16(),
                message: snippet,
            });
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&text)?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .ok_or(CompletionError::EmptyChoices)?
            .message
            .content;
        debug!("Completion returned {} chars", content.len());
        Ok(content)
    }
}
