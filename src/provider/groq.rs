//! # Groq Provider
//!
//! Talks to Groq's OpenAI-compatible REST API:
//! - `POST {base_url}/audio/transcriptions` - multipart upload, `response_format=text`
//! - `POST {base_url}/chat/completions` - JSON chat completion
//!
//! A single `GroqClient` implements both [`SpeechToText`] and [`LanguageModel`];
//! the underlying `reqwest::Client` pools connections and is safe to share
//! across actix workers.

use crate::config::ProviderConfig;
use crate::provider::{
    ChatMessage, CompletionRequest, LanguageModel, ProviderError, SpeechToText,
    TranscriptionRequest,
};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{multipart, Client, Response};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub struct GroqClient {
    client: Client,
    api_key: String,
    base_url: String,
}

#[derive(Serialize)]
struct ChatCompletionBody<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Error envelope returned by the API on non-2xx responses.
#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

impl GroqClient {
    /// Build the client from the provider section of the configuration.
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build HTTP client for Groq")?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Turn a non-success response into `ProviderError::Api`, preferring the
    /// API's own error message over the raw body.
    async fn check_status(response: Response) -> Result<Response, ProviderError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(ProviderError::Api(describe_api_error(status, &body)))
    }
}

fn describe_api_error(status: reqwest::StatusCode, body: &str) -> String {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) => format!("status {}: {}", status, parsed.error.message),
        Err(_) if body.trim().is_empty() => format!("status {}", status),
        Err(_) => format!("status {}: {}", status, body.trim()),
    }
}

fn first_choice_content(response: ChatCompletionResponse) -> Result<String, ProviderError> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::InvalidResponse("response contained no choices".to_string()))?;

    choice
        .message
        .content
        .ok_or_else(|| ProviderError::InvalidResponse("first choice has no message content".to_string()))
}

#[async_trait]
impl SpeechToText for GroqClient {
    async fn transcribe(&self, request: TranscriptionRequest) -> Result<String, ProviderError> {
        let audio_len = request.audio.len();

        let mut file_part = multipart::Part::bytes(request.audio).file_name(request.filename);
        if !request.content_type.is_empty() {
            file_part = file_part
                .mime_str(&request.content_type)
                .map_err(|e| ProviderError::Request(format!("content type: {}", e)))?;
        }

        let form = multipart::Form::new()
            .text("model", request.model.clone())
            .text("response_format", "text")
            .text("language", request.language)
            .part("file", file_part);

        debug!(model = %request.model, bytes = audio_len, "Sending audio to Groq transcription API");

        let response = self
            .client
            .post(self.endpoint("audio/transcriptions"))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ProviderError::Api(format!("request: {}", e)))?;

        let transcript = Self::check_status(response)
            .await?
            .text()
            .await
            .map_err(|e| ProviderError::Api(format!("body: {}", e)))?;

        info!(chars = transcript.len(), "Groq transcription completed");
        Ok(transcript)
    }
}

#[async_trait]
impl LanguageModel for GroqClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError> {
        let body = ChatCompletionBody {
            model: &request.model,
            messages: &request.messages,
        };

        debug!(model = %request.model, messages = request.messages.len(), "Sending chat completion to Groq");

        let response = self
            .client
            .post(self.endpoint("chat/completions"))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Api(format!("request: {}", e)))?;

        let parsed: ChatCompletionResponse = Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        let content = first_choice_content(parsed)?;
        info!(chars = content.len(), "Groq chat completion finished");
        Ok(content)
    }
}
