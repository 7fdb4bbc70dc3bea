//! # Application State
//!
//! Everything a request handler needs, built once in `main` and shared by all
//! actix workers through `web::Data<AppState>`.
//!
//! Nothing in here changes after startup: the configuration sits behind an
//! `Arc` and the provider handles are immutable trait objects. A provider is
//! `None` when its client could not be constructed; the pipeline reports that
//! as an upstream-service failure instead of panicking.

use crate::config::AppConfig;
use crate::provider::{LanguageModel, SpeechToText};
use std::sync::Arc;
use std::time::Instant;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub speech_to_text: Option<Arc<dyn SpeechToText>>,
    pub language_model: Option<Arc<dyn LanguageModel>>,
    /// When the server started, for the health report.
    pub start_time: Instant,
}

impl AppState {
    /// State with no providers attached yet.
    pub fn new(config: AppConfig) -> Self {
        Self {
            config: Arc::new(config),
            speech_to_text: None,
            language_model: None,
            start_time: Instant::now(),
        }
    }

    pub fn with_speech_to_text(mut self, provider: Arc<dyn SpeechToText>) -> Self {
        self.speech_to_text = Some(provider);
        self
    }

    pub fn with_language_model(mut self, provider: Arc<dyn LanguageModel>) -> Self {
        self.language_model = Some(provider);
        self
    }

    /// True when both pipeline stages have a provider.
    pub fn providers_ready(&self) -> bool {
        self.speech_to_text.is_some() && self.language_model.is_some()
    }

    pub fn get_uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
