//! Language-model stage: turns a transcript into the depression assessment.

use crate::analysis::{AnalysisError, Transcript, PROVIDER_UNAVAILABLE_MESSAGE};
use crate::config::{AnalysisConfig, ModelsConfig};
use crate::provider::{ChatMessage, CompletionRequest, LanguageModel, ProviderError};
use tracing::{debug, error};

/// User message carrying the transcript, quoted verbatim.
pub fn user_message(transcript: &Transcript) -> String {
    format!("Teks transkripsi:\n\"{}\"", transcript.as_str())
}

/// Ask the language model for an assessment of `transcript`.
///
/// The reply is returned untouched; the prompt forbids markdown but the
/// output is not checked for it.
pub async fn assess(
    provider: Option<&dyn LanguageModel>,
    models: &ModelsConfig,
    analysis: &AnalysisConfig,
    transcript: &Transcript,
) -> Result<String, AnalysisError> {
    let provider = provider.ok_or_else(|| {
        error!("Language-model provider is not initialized");
        AnalysisError::Provider(PROVIDER_UNAVAILABLE_MESSAGE.to_string())
    })?;

    let request = CompletionRequest {
        model: models.llm_model.clone(),
        messages: vec![
            ChatMessage::system(analysis.system_prompt.clone()),
            ChatMessage::user(user_message(transcript)),
        ],
    };

    debug!(model = %request.model, "Requesting assessment");

    provider.complete(&request).await.map_err(|e| {
        error!(error = %e, "Assessment call failed");
        match e {
            ProviderError::Api(cause) => {
                AnalysisError::Provider(format!("Error dari API Groq saat analisis: {}", cause))
            }
            other => AnalysisError::Provider(format!(
                "Terjadi kesalahan saat menganalisis teks: {}",
                other
            )),
        }
    })
}
