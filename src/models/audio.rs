use serde::{Deserialize, Serialize};

use super::chat::ResponseStatus;

/// Body of the audio upload response. An empty `text` with a success status
/// means the backend recognized no speech; an error status means the
/// transcription itself failed.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TranscriptionResponse {
    pub text: String,
    pub status: ResponseStatus,
}
