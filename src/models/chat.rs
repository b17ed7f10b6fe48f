use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

fn default_target_language() -> String {
    "fr".to_string()
}

/// Canonical chat request body. Older clients still send the form shape
/// (`LegacyChatForm`); it is adapted into this type at the extractor edge.
#[derive(Clone, Debug, Deserialize)]
pub struct ChatRequest {
    pub query: String,
    #[serde(default = "default_target_language")]
    pub target_language: String,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    #[error("query must not be empty")]
    EmptyQuery,
    #[error("start_date {start} is after end_date {end}")]
    InvertedDateRange { start: NaiveDate, end: NaiveDate },
}

impl ChatRequest {
    /// Boundary validation: a non-blank query and a coherent date range.
    pub fn validate(&self) -> Result<(), RequestError> {
        if self.query.trim().is_empty() {
            return Err(RequestError::EmptyQuery);
        }
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if start > end {
                return Err(RequestError::InvertedDateRange { start, end });
            }
        }
        Ok(())
    }
}

/// Legacy form-encoded chat body (`message`/`language` fields).
#[derive(Clone, Debug, Deserialize)]
pub struct LegacyChatForm {
    pub message: String,
    #[serde(default = "default_target_language")]
    pub language: String,
}

impl From<LegacyChatForm> for ChatRequest {
    fn from(form: LegacyChatForm) -> Self {
        Self {
            query: form.message,
            target_language: form.language,
            start_date: None,
            end_date: None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Error,
}

impl ResponseStatus {
    /// Error wins: a response is degraded as soon as any step failed.
    pub fn and(self, other: ResponseStatus) -> ResponseStatus {
        if self == ResponseStatus::Error || other == ResponseStatus::Error {
            ResponseStatus::Error
        } else {
            ResponseStatus::Success
        }
    }
}

impl std::fmt::Display for ResponseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResponseStatus::Success => f.write_str("success"),
            ResponseStatus::Error => f.write_str("error"),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    pub status: ResponseStatus,
    pub source_count: usize,
    pub detected_language: String,
}

/// One archive document as the search backend returns it. Missing fields are
/// filled with a placeholder, never rejected.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Article {
    pub date: String,
    pub title: String,
    pub content: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FeedbackAck {
    pub status: ResponseStatus,
    pub message: String,
}
