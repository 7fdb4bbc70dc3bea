//! # HTTP Handlers
//!
//! Route table for the analyzer:
//! - `GET /` - landing page with the upload form
//! - `POST /analyze` - transcribe and assess an uploaded recording
//! - `GET /health`, `GET /api/v1/health` - liveness report

pub mod analyze;
pub mod index;

pub use analyze::*;
pub use index::*;

use crate::health;
use actix_web::web;

/// Register every route on an `App`. Shared by `main` and the handler tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index))
        .route("/analyze", web::post().to(analyze_audio))
        .route("/health", web::get().to(health::health_check))
        .service(web::scope("/api/v1").route("/health", web::get().to(health::health_check)));
}
