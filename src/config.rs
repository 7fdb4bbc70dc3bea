//! # Configuration Management
//!
//! Loads the analyzer configuration from, in increasing priority:
//! 1. Built-in defaults (the `Default` impl below)
//! 2. An optional `config.toml` in the working directory
//! 3. Environment variables prefixed with `APP_`, nested keys joined by `__`
//!    (e.g. `APP_MODELS__LLM_MODEL=llama-3.3-70b-versatile`)
//! 4. The platform variables `HOST`, `PORT` and the credential `GROQ_API_KEY`
//!
//! The credential has no usable default. `validate()` refuses an empty key so
//! the server never starts in a state where every request would fail upstream.

use anyhow::Result;                     // Startup errors with context
use serde::{Deserialize, Serialize};    // Deserialize layered sources into structs
use std::env;                           // HOST / PORT / GROQ_API_KEY overrides
use std::fmt;                           // Hand-written Debug that redacts the key

/// Environment variable holding the Groq credential.
pub const API_KEY_ENV: &str = "GROQ_API_KEY";

pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_TRANSCRIPTION_MODEL: &str = "whisper-large-v3-turbo";
pub const DEFAULT_TRANSCRIPTION_LANGUAGE: &str = "id";
pub const DEFAULT_LLM_MODEL: &str = "openai/gpt-oss-20b";

/// Instruction sent as the system message of every analysis request.
pub const DEFAULT_SYSTEM_PROMPT: &str = "[RULES]
Always respond in Bahasa Indonesia.
DO NOT respond with markdown formatting.
IF there is no user_message or depression detected, respond with: 'Tidak ada indikasi depresi.'
[END RULES]
[INSTRUCTIONS]
Your job is to analyze the given user messages for signs of depression.
You will provide a detailed analysis based on the following criteria:
- Frequency of negative words and phrases.
- Presence of suicidal or self-harm thoughts.
- Emotional tone and intensity.
Your response should be clear, concise, and actionable.
[END INSTRUCTIONS]";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub provider: ProviderConfig,
    pub models: ModelsConfig,
    pub analysis: AnalysisConfig,
    pub upload: UploadConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Connection settings for the Groq API.
///
/// `Debug` is implemented by hand so the key never ends up in logs.
#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub api_key: String,
    pub base_url: String,
}

/// Model identifiers and the transcription language hint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelsConfig {
    pub transcription_model: String,
    /// ISO 639-1 code passed to the speech-to-text provider.
    pub transcription_language: String,
    pub llm_model: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub system_prompt: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Largest accepted `audio` part, in bytes.
    pub max_size_bytes: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8000,
            },
            provider: ProviderConfig {
                api_key: String::new(),
                base_url: DEFAULT_BASE_URL.to_string(),
            },
            models: ModelsConfig {
                transcription_model: DEFAULT_TRANSCRIPTION_MODEL.to_string(),
                transcription_language: DEFAULT_TRANSCRIPTION_LANGUAGE.to_string(),
                llm_model: DEFAULT_LLM_MODEL.to_string(),
            },
            analysis: AnalysisConfig {
                system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            },
            upload: UploadConfig {
                max_size_bytes: 50 * 1024 * 1024,
            },
        }
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &redact(&self.api_key))
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Mask a secret, keeping a short prefix as a hint.
fn redact(secret: &str) -> String {
    match secret.chars().count() {
        0 => String::new(),
        1..=4 => "***".to_string(),
        _ => format!("{}***", secret.chars().take(4).collect::<String>()),
    }
}

impl AppConfig {
    /// Load configuration from defaults, `config.toml` and the environment.
    ///
    /// ## What this does:
    /// 1. Seeds the builder with the compiled-in defaults
    /// 2. Merges `config.toml` if it exists
    /// 3. Merges `APP_*` variables (`APP_UPLOAD__MAX_SIZE_BYTES=1048576`)
    /// 4. Applies `HOST`, `PORT` and `GROQ_API_KEY` last
    ///
    /// ## Key Rust Concepts:
    /// - **Builder pattern**: each `add_source` call returns the builder
    /// - **`?` operator**: a malformed file or variable aborts startup early
    ///
    /// Loading does not check the key; `validate()` does.
    pub fn load() -> Result<Self> {
        let mut settings = config::Config::builder()
            .add_source(config::Config::try_from(&AppConfig::default())?)
            .add_source(config::File::with_name("config").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__"),
            );

        if let Ok(host) = env::var("HOST") {
            settings = settings.set_override("server.host", host)?;
        }

        if let Ok(port) = env::var("PORT") {
            settings = settings.set_override("server.port", port)?;
        }

        if let Ok(key) = env::var(API_KEY_ENV) {
            settings = settings.set_override("provider.api_key", key)?;
        }

        let config = settings.build()?.try_deserialize()?;
        Ok(config)
    }

    /// Reject configurations the server cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(anyhow::anyhow!("Server port cannot be 0"));
        }

        if self.provider.api_key.trim().is_empty() {
            return Err(anyhow::anyhow!(
                "Environment variable {} is not set; refusing to start",
                API_KEY_ENV
            ));
        }

        if self.provider.base_url.trim().is_empty() {
            return Err(anyhow::anyhow!("Provider base URL cannot be empty"));
        }

        if self.models.transcription_model.trim().is_empty() || self.models.llm_model.trim().is_empty() {
            return Err(anyhow::anyhow!("Model identifiers cannot be empty"));
        }

        if self.analysis.system_prompt.trim().is_empty() {
            return Err(anyhow::anyhow!("Analysis system prompt cannot be empty"));
        }

        if self.upload.max_size_bytes == 0 {
            return Err(anyhow::anyhow!("Upload size limit must be greater than 0"));
        }

        Ok(())
    }
}
