use crate::state::AppState;
use actix_web::{web, HttpResponse};
use serde_json::json;

/// Liveness report. `status` degrades when a provider handle is missing.
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let config = &state.config;
    let ready = state.providers_ready();

    HttpResponse::Ok().json(json!({
        "status": if ready { "healthy" } else { "degraded" },
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "uptime_seconds": state.get_uptime_seconds(),
        "service": {
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "host": config.server.host,
            "port": config.server.port
        },
        "models": {
            "transcription": {
                "model": config.models.transcription_model,
                "language": config.models.transcription_language,
                "available": state.speech_to_text.is_some()
            },
            "llm": {
                "model": config.models.llm_model,
                "available": state.language_model.is_some()
            }
        }
    }))
}
