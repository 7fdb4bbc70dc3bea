//! # Analysis Pipeline
//!
//! One request runs a strictly linear sequence:
//!
//! ```text
//! Validating -> Transcribing -> Analyzing -> Done
//! ```
//!
//! Each stage has exactly one failure exit, reported as an [`AnalysisError`]
//! and propagated with `?`, so later stages never run after an earlier one
//! fails. The HTTP layer is the only place these errors become status codes.

pub mod assessment;
pub mod transcription;

pub use assessment::assess;
pub use transcription::transcribe;

use crate::state::AppState;
use tracing::{info, warn};

/// Message returned when the declared content type is not audio.
pub const NOT_AUDIO_MESSAGE: &str = "File yang diunggah bukan file audio yang valid.";

/// Message returned when a provider handle was never initialized.
pub const PROVIDER_UNAVAILABLE_MESSAGE: &str = "Klien Groq tidak tersedia.";

/// Classified failure of one pipeline stage.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// The upload was rejected before any outbound call.
    #[error("{0}")]
    Validation(String),

    /// The speech-to-text stage produced nothing usable.
    #[error("{0}")]
    Transcription(String),

    /// A provider could not be reached, rejected the call, or is missing.
    #[error("{0}")]
    Provider(String),
}

/// The uploaded recording, as received from the multipart form.
#[derive(Debug, Clone)]
pub struct AudioUpload {
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl AudioUpload {
    /// Accept only parts whose declared content type mentions `audio`.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.content_type.contains("audio") {
            Ok(())
        } else {
            Err(AnalysisError::Validation(NOT_AUDIO_MESSAGE.to_string()))
        }
    }
}

/// Text returned by the speech-to-text stage. Never blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript(String);

impl Transcript {
    /// Wrap provider output, or `None` when it is empty after trimming.
    /// The text itself is kept exactly as the provider returned it.
    pub fn new(text: String) -> Option<Self> {
        if text.trim().is_empty() {
            None
        } else {
            Some(Self(text))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Validate the upload, transcribe it and assess the transcript.
pub async fn run(state: &AppState, upload: AudioUpload) -> Result<String, AnalysisError> {
    if let Err(e) = upload.validate() {
        warn!(content_type = %upload.content_type, filename = %upload.filename, "Rejected non-audio upload");
        return Err(e);
    }

    info!(
        filename = %upload.filename,
        content_type = %upload.content_type,
        bytes = upload.data.len(),
        "Starting analysis"
    );

    let config = &state.config;
    let transcript = transcribe(state.speech_to_text.as_deref(), &config.models, upload).await?;
    let analysis = assess(
        state.language_model.as_deref(),
        &config.models,
        &config.analysis,
        &transcript,
    )
    .await?;

    info!(chars = analysis.len(), "Analysis completed");
    Ok(analysis)
}
