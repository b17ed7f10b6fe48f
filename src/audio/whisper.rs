use std::error::Error as StdError;
use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::multipart;
use reqwest::Client as HttpClient;
use serde::Deserialize;
use url::Url;

use super::{probe_wav, TranscribeError, Transcriber};

pub struct HttpTranscriber {
    http: HttpClient,
    url: String,
}

#[derive(Deserialize)]
struct WhisperResponse {
    text: String,
}

impl HttpTranscriber {
    pub fn new(url: &str, timeout: Duration) -> Result<Self, Box<dyn StdError + Send + Sync>> {
        let parsed =
            Url::parse(url).map_err(|e| format!("Invalid speech endpoint '{}': {}", url, e))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(format!("Speech endpoint must be http(s), got '{}'", url).into());
        }

        let http = HttpClient::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            url: url.to_string(),
        })
    }

    #[cfg(test)]
    pub(crate) fn with_base_url(base_url: &str) -> Self {
        Self::new(&format!("{}/transcribe", base_url), Duration::from_secs(5))
            .expect("test client")
    }
}

#[async_trait]
impl Transcriber for HttpTranscriber {
    async fn transcribe(&self, wav: &[u8]) -> Result<String, TranscribeError> {
        let spec = probe_wav(wav)?;
        debug!(
            "Transcribing {} bytes ({} ch @ {} Hz)",
            wav.len(),
            spec.channels,
            spec.sample_rate
        );

        let part = multipart::Part::bytes(wav.to_vec())
            .file_name("upload.wav")
            .mime_str("audio/wav")?;
        let form = multipart::Form::new().part("file", part);

        let response = self.http.post(&self.url).multipart(form).send().await?;
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            let snippet: String = text.chars().take(200).collect();
            return Err(TranscribeError::Backend {
                code: status.as_u16(),
                message: snippet,
            });
        }

        let parsed: WhisperResponse = serde_json::from_str(&text)?;
        Ok(parsed.text)
    }
}
