mod whisper;

pub use whisper::HttpTranscriber;

use std::io::Cursor;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TranscribeError {
    #[error("audio is not a readable WAV file: {0}")]
    InvalidAudio(#[from] hound::Error),
    #[error("speech request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("speech backend returned HTTP {code}: {message}")]
    Backend { code: u16, message: String },
    #[error("could not decode speech response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Speech-to-text seam. Production posts the audio to an external
/// whisper-style HTTP service; tests substitute fakes.
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, wav: &[u8]) -> Result<String, TranscribeError>;
}

/// Checks that `bytes` parse as a WAV container before they are shipped to
/// the speech backend, and returns the container's format header.
pub fn probe_wav(bytes: &[u8]) -> Result<hound::WavSpec, hound::Error> {
    let reader = hound::WavReader::new(Cursor::new(bytes))?;
    Ok(reader.spec())
}

#[cfg(test)]
pub(crate) fn sample_wav() -> Vec<u8> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 16_000,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
        for i in 0i32..1600 {
            writer.write_sample(((i % 64) * 100) as i16).unwrap();
        }
        writer.finalize().unwrap();
    }
    cursor.into_inner()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_accepts_generated_wav() {
        let spec = probe_wav(&sample_wav()).unwrap();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, 16_000);
    }

    #[test]
    fn probe_rejects_garbage() {
        assert!(probe_wav(b"definitely not a wav").is_err());
        assert!(probe_wav(&[]).is_err());
    }
}
