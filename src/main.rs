//! # Depression Analyzer - Application Entry Point
//!
//! An Actix-web server that accepts an audio upload, transcribes it with a
//! remote speech-to-text model and asks a remote language model for an
//! assessment of depression indicators.
//!
//! ## Application Architecture:
//! - **config**: Defaults, `config.toml` and environment variables
//! - **state**: Immutable shared state (config + provider handles)
//! - **provider**: Speech-to-text / language-model traits and the Groq client
//! - **analysis**: The validate → transcribe → assess pipeline
//! - **handlers**: HTTP routes
//! - **middleware**: Request logging
//! - **error**: Error classification and HTTP error responses

mod analysis;
mod config;
mod error;
mod handlers;
mod health;
mod middleware;
mod provider;
mod state;

use actix_cors::Cors;                   // Cross-origin requests from a separately hosted UI
use actix_web::{web, App, HttpServer};  // Web framework components
use anyhow::Result;                     // Simplified error handling for startup
use crate::config::AppConfig;
use crate::provider::{GroqClient, LanguageModel, SpeechToText};
use crate::state::AppState;
use std::sync::Arc;                     // Shared ownership of the provider handles
use tracing::{error, info};             // Structured logging macros
use tracing_actix_web::TracingLogger;   // Per-request span with a request id
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Application entry point.
///
/// ## What this does:
/// 1. Loads `.env` and initializes logging
/// 2. Loads and validates the configuration; a missing `GROQ_API_KEY` stops here
/// 3. Builds the Groq client once and stores it in `AppState`
/// 4. Starts the HTTP server with CORS, request spans and request logging
///
/// ## Key Rust Concepts:
/// - `#[actix_web::main]`: starts the async runtime the workers run on
/// - `Result<()>`: returning `Err` from `main` exits with a non-zero status
/// - `move` closure: each worker gets its own clone of the shared state
#[actix_web::main]
async fn main() -> Result<()> {
    // .ok(): running without a .env file is fine
    dotenv::dotenv().ok();

    init_tracing()?;

    let config = AppConfig::load()?;
    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return Err(e);
    }

    info!("Starting {} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    info!("Transcription model: {}", config.models.transcription_model);
    info!("LLM model: {}", config.models.llm_model);

    let app_state = build_state(config.clone());
    let bind_addr = format!("{}:{}", config.server.host, config.server.port);

    info!("Starting HTTP server on {}", bind_addr);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .wrap(middleware::RequestLogging)
            .wrap(cors)
            .wrap(TracingLogger::default())
            .configure(handlers::configure)
    })
    .bind(&bind_addr)?
    .run()
    .await?;

    info!("Server stopped gracefully");
    Ok(())
}

/// Initialize the tracing (logging) system.
///
/// ## What this does:
/// - Writes structured events to the console
/// - Reads the filter from `RUST_LOG`
/// - Falls back to "depression_analyzer=debug,actix_web=info"
///
/// ## Rust Concepts:
/// - **Layers**: the filter and the formatter are stacked on one registry
/// - **try_init()**: fails instead of panicking if a subscriber is already set
fn init_tracing() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "depression_analyzer=debug,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init()?;

    Ok(())
}

/// Build the shared state. A client that fails to construct leaves its
/// provider slots empty; requests then fail with 503 instead of the process
/// exiting.
fn build_state(config: AppConfig) -> AppState {
    let state = AppState::new(config);

    match GroqClient::new(&state.config.provider) {
        Ok(client) => {
            let client = Arc::new(client);
            let speech: Arc<dyn SpeechToText> = client.clone();
            let llm: Arc<dyn LanguageModel> = client;
            state.with_speech_to_text(speech).with_language_model(llm)
        }
        Err(e) => {
            error!("Failed to initialize Groq client: {:#}", e);
            state
        }
    }
}
