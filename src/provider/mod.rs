//! # Upstream Providers
//!
//! The analyzer depends on two remote services: a speech-to-text provider that
//! turns the uploaded recording into text, and a language-model provider that
//! produces the assessment. Both are expressed as traits so the request
//! pipeline only ever sees `Arc<dyn SpeechToText>` / `Arc<dyn LanguageModel>`
//! handles built once at startup.
//!
//! ## Implementations:
//! - **groq**: Groq's OpenAI-compatible REST API (one client serves both traits)
//! - **mock**: counting fakes used by the handler and pipeline tests

pub mod groq;

#[cfg(test)]
pub mod mock;

pub use groq::GroqClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Failure reported by a provider adapter.
///
/// The variants tell the pipeline *where* the call broke down so that it can
/// decide between an upstream-service failure and a stage-specific one.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// Transport failure, non-success status or an error body from the API.
    #[error("{0}")]
    Api(String),

    /// The provider answered but the body could not be interpreted.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The outbound request could not be assembled.
    #[error("invalid request: {0}")]
    Request(String),
}

/// Everything a speech-to-text provider needs for one transcription.
#[derive(Debug, Clone)]
pub struct TranscriptionRequest {
    pub filename: String,
    pub content_type: String,
    pub audio: Vec<u8>,
    pub model: String,
    pub language: String,
}

#[async_trait]
pub trait SpeechToText: Send + Sync {
    /// Transcribe the whole recording in one call and return plain text.
    async fn transcribe(&self, request: TranscriptionRequest) -> Result<String, ProviderError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// A single chat completion request: model id plus ordered messages.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Return the text of the first generated choice.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_message_serializes_lowercase_role() {
        let json = serde_json::to_value(ChatMessage::system("rules")).unwrap();
        assert_eq!(json["role"], "system");
        assert_eq!(json["content"], "rules");

        let json = serde_json::to_value(ChatMessage::user("hi")).unwrap();
        assert_eq!(json["role"], "user");
    }

    #[test]
    fn test_provider_error_display() {
        let err = ProviderError::Api("status 401 Unauthorized: bad key".to_string());
        assert_eq!(err.to_string(), "status 401 Unauthorized: bad key");

        let err = ProviderError::InvalidResponse("no choices".to_string());
        assert_eq!(err.to_string(), "invalid response: no choices");
    }
}
