//! Speech-to-text stage.

use crate::analysis::{AnalysisError, AudioUpload, Transcript, PROVIDER_UNAVAILABLE_MESSAGE};
use crate::config::ModelsConfig;
use crate::provider::{ProviderError, SpeechToText, TranscriptionRequest};
use tracing::{debug, error, warn};

/// Message returned when the provider hears nothing in the recording.
pub const NO_SPEECH_MESSAGE: &str =
    "Tidak dapat mendeteksi suara dalam rekaman. Audio mungkin terlalu sunyi atau tidak jelas.";

/// Send the whole recording to the speech-to-text provider in one call.
///
/// Provider-level failures are upstream-service failures; a blank transcript
/// or a failure local to this stage is a transcription failure.
pub async fn transcribe(
    provider: Option<&dyn SpeechToText>,
    models: &ModelsConfig,
    upload: AudioUpload,
) -> Result<Transcript, AnalysisError> {
    let provider = provider.ok_or_else(|| {
        error!("Speech-to-text provider is not initialized");
        AnalysisError::Provider(PROVIDER_UNAVAILABLE_MESSAGE.to_string())
    })?;

    let request = TranscriptionRequest {
        filename: upload.filename,
        content_type: upload.content_type,
        audio: upload.data,
        model: models.transcription_model.clone(),
        language: models.transcription_language.clone(),
    };

    let text = match provider.transcribe(request).await {
        Ok(text) => text,
        Err(ProviderError::Api(cause)) => {
            error!(error = %cause, "Transcription API call failed");
            return Err(AnalysisError::Provider(format!(
                "Error dari API Groq saat transkripsi: {}",
                cause
            )));
        }
        Err(other) => {
            error!(error = %other, "Transcription failed");
            return Err(AnalysisError::Transcription(format!(
                "Gagal mentranskripsi audio: {}",
                other
            )));
        }
    };

    match Transcript::new(text) {
        Some(transcript) => {
            debug!(chars = transcript.as_str().len(), "Transcript received");
            Ok(transcript)
        }
        None => {
            warn!("Transcription returned no detectable speech");
            Err(AnalysisError::Transcription(NO_SPEECH_MESSAGE.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::provider::mock::{MockReply, MockSpeechToText};

    fn models() -> ModelsConfig {
        AppConfig::default().models
    }

    fn silence() -> AudioUpload {
        AudioUpload {
            filename: "silence.wav".to_string(),
            content_type: "audio/wav".to_string(),
            data: vec![0u8; 1024],
        }
    }

    #[tokio::test]
    async fn test_passes_fixed_model_and_language() {
        let provider = MockSpeechToText::with_text("saya merasa sedih");

        let transcript = transcribe(Some(&provider), &models(), silence()).await.unwrap();

        assert_eq!(transcript.as_str(), "saya merasa sedih");
        let request = provider.last_request().unwrap();
        assert_eq!(request.model, "whisper-large-v3-turbo");
        assert_eq!(request.language, "id");
        assert_eq!(request.filename, "silence.wav");
        assert_eq!(request.content_type, "audio/wav");
        assert_eq!(request.audio.len(), 1024);
    }

    #[tokio::test]
    async fn test_blank_transcript_is_no_speech() {
        let provider = MockSpeechToText::with_text("  \n ");

        let err = transcribe(Some(&provider), &models(), silence()).await.unwrap_err();

        match err {
            AnalysisError::Transcription(msg) => assert_eq!(msg, NO_SPEECH_MESSAGE),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_provider_is_upstream_failure() {
        let err = transcribe(None, &models(), silence()).await.unwrap_err();
        match err {
            AnalysisError::Provider(msg) => assert_eq!(msg, PROVIDER_UNAVAILABLE_MESSAGE),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_api_error_is_upstream_failure_with_cause() {
        let provider = MockSpeechToText::replying(MockReply::ApiError("status 500: boom".to_string()));

        let err = transcribe(Some(&provider), &models(), silence()).await.unwrap_err();

        match err {
            AnalysisError::Provider(msg) => {
                assert!(msg.starts_with("Error dari API Groq saat transkripsi"));
                assert!(msg.contains("status 500: boom"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_local_failure_is_transcription_failure() {
        let provider = MockSpeechToText::replying(MockReply::RequestError("bad mime".to_string()));

        let err = transcribe(Some(&provider), &models(), silence()).await.unwrap_err();

        match err {
            AnalysisError::Transcription(msg) => {
                assert!(msg.starts_with("Gagal mentranskripsi audio"));
                assert!(msg.contains("bad mime"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
