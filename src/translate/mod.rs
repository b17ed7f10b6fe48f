mod mymemory;

pub use mymemory::MyMemoryClient;

use async_trait::async_trait;
use thiserror::Error;

/// Per-request character limit of the translation backend. Longer texts are
/// split into pieces of this size and translated one by one.
pub const CHUNK_SIZE: usize = 500;

#[derive(Debug, Error)]
pub enum TranslationError {
    #[error("translation request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("translation backend returned HTTP {code}: {message}")]
    Backend { code: u16, message: String },
    #[error("could not decode translation response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("translation backend refused the request ({code}): {message}")]
    Denied { code: u16, message: String },
    #[error("translation backend returned no translated text")]
    Empty,
}

/// Translates one chunk of at most `CHUNK_SIZE` characters.
#[async_trait]
pub trait TranslationClient: Send + Sync {
    async fn translate_chunk(
        &self,
        chunk: &str,
        from: &str,
        to: &str,
    ) -> Result<String, TranslationError>;
}

/// Splits `text` into pieces of at most `CHUNK_SIZE` characters.
///
/// Boundaries are character-based, so a piece never splits a UTF-8 scalar,
/// but it can split mid-word; that is the backend's length limit, not ours.
pub fn split_chunks(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(CHUNK_SIZE)
        .map(|chunk| chunk.iter().collect())
        .collect()
}

/// Translates `text` from `from` into `to`, chunk by chunk, failing on the
/// first chunk the backend rejects. Chunks are rejoined with single spaces,
/// so whitespace at chunk boundaries does not round-trip exactly.
pub async fn translate_text(
    client: &dyn TranslationClient,
    text: &str,
    from: &str,
    to: &str,
) -> Result<String, TranslationError> {
    let mut translated = Vec::new();
    for chunk in split_chunks(text) {
        translated.push(client.translate_chunk(&chunk, from, to).await?);
    }
    Ok(translated.join(" "))
}
