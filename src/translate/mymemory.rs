use std::error::Error as StdError;
use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::Client as HttpClient;
use serde::Deserialize;
use serde_json::Value;
use url::Url;

use super::{TranslationClient, TranslationError};

/// Client for a MyMemory-style translation API: one GET per chunk, the
/// language pair passed as `from|to`. The backend reports its own status
/// code inside HTTP-200 bodies, which is classified here.
pub struct MyMemoryClient {
    http: HttpClient,
    url: String,
}

#[derive(Deserialize)]
struct TranslateResponse {
    #[serde(rename = "responseData", default)]
    data: Option<ResponseData>,
    #[serde(rename = "responseStatus", default)]
    status: Option<Value>,
    #[serde(rename = "responseDetails", default)]
    details: Option<Value>,
}

#[derive(Deserialize)]
struct ResponseData {
    #[serde(rename = "translatedText", default)]
    translated_text: Option<String>,
}

impl MyMemoryClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, Box<dyn StdError + Send + Sync>> {
        let parsed = Url::parse(base_url)
            .map_err(|e| format!("Invalid translation endpoint '{}': {}", base_url, e))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(format!("Translation endpoint must be http(s), got '{}'", base_url).into());
        }

        let http = HttpClient::builder().timeout(timeout).build()?;
        let url = format!("{}/get", base_url.trim_end_matches('/'));
        Ok(Self { http, url })
    }

    #[cfg(test)]
    pub(crate) fn with_base_url(base_url: &str) -> Self {
        Self::new(base_url, Duration::from_secs(5)).expect("test client")
    }
}

/// The backend's in-body status is a number in some replies and a numeric
/// string in others.
fn body_status(status: &Option<Value>) -> Option<u16> {
    match status {
        Some(Value::Number(n)) => n.as_u64().map(|code| code as u16),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    }
}

#[async_trait]
impl TranslationClient for MyMemoryClient {
    async fn translate_chunk(
        &self,
        chunk: &str,
        from: &str,
        to: &str,
    ) -> Result<String, TranslationError> {
        let langpair = format!("{}|{}", from, to);
        let response = self
            .http
            .get(&self.url)
            .query(&[("q", chunk), ("langpair", langpair.as_str())])
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            let snippet: String = text.chars().take(200).collect();
            return Err(TranslationError::Backend {
                code: status.as_u16(),
                message: snippet,
            });
        }

        let parsed: TranslateResponse = serde_json::from_str(&text)?;
        if let Some(code) = body_status(&parsed.status) {
            if code != 200 {
                let message = parsed
                    .details
                    .map(|details| details.to_string())
                    .unwrap_or_else(|| "no details".to_string());
                return Err(TranslationError::Denied { code, message });
            }
        }

        let translated = parsed
            .data
            .and_then(|data| data.translated_text)
            .ok_or(TranslationError::Empty)?;
        debug!("Translated {} chars to '{}'", chunk.chars().count(), to);
        Ok(translated)
    }
}
