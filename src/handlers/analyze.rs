//! # Audio Analysis Endpoint
//!
//! ## Endpoint: `POST /analyze`
//!
//! ## Request:
//! Multipart form data with an audio file in the field named `audio`.
//!
//! ## Response:
//! ```json
//! {
//!   "analysis": "Tidak ada indikasi depresi.",
//!   "error": null
//! }
//! ```
//!
//! Failures use the error body described in `crate::error`:
//! 400 for rejected uploads or undetectable speech, 503 for provider
//! failures, 500 for anything else.

use crate::analysis::{self, AudioUpload};
use crate::error::{AppError, AppResult};
use crate::state::AppState;
use actix_multipart::{Field, Multipart};
use actix_web::{web, HttpResponse};
use futures_util::stream::StreamExt;
use futures_util::FutureExt;
use serde::{Deserialize, Serialize};
use std::panic::AssertUnwindSafe;
use tracing::{debug, error};

/// Name of the multipart field carrying the recording.
pub const AUDIO_FIELD: &str = "audio";

/// Body of a successful analysis. Exactly one field is non-null.
#[derive(Debug, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub analysis: Option<String>,
    pub error: Option<String>,
}

pub async fn analyze_audio(
    state: web::Data<AppState>,
    mut payload: Multipart,
) -> AppResult<HttpResponse> {
    let upload = read_audio_upload(&mut payload, state.config.upload.max_size_bytes).await?;

    // A panic in a provider adapter must not drop the connection without a body.
    let analysis = match AssertUnwindSafe(analysis::run(&state, upload))
        .catch_unwind()
        .await
    {
        Ok(result) => result?,
        Err(panic) => {
            let err = AppError::from_panic(panic.as_ref());
            error!(error = %err, "Analysis pipeline panicked");
            return Err(err);
        }
    };

    Ok(HttpResponse::Ok().json(AnalysisResponse {
        analysis: Some(analysis),
        error: None,
    }))
}

/// Pull the `audio` part out of the form. Other parts are drained and ignored.
async fn read_audio_upload(payload: &mut Multipart, max_size: usize) -> AppResult<AudioUpload> {
    let mut upload: Option<AudioUpload> = None;

    while let Some(item) = payload.next().await {
        let mut field = item?;

        if upload.is_some() || field.name() != Some(AUDIO_FIELD) {
            drain(&mut field).await?;
            continue;
        }

        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .filter(|name| !name.is_empty())
            .unwrap_or(AUDIO_FIELD)
            .to_string();
        let content_type = field
            .content_type()
            .map(|mime| mime.to_string())
            .unwrap_or_default();

        let data = read_field(&mut field, max_size).await?;
        debug!(filename = %filename, content_type = %content_type, bytes = data.len(), "Received audio upload");

        upload = Some(AudioUpload {
            filename,
            content_type,
            data,
        });
    }

    upload.ok_or_else(|| AppError::Validation("Tidak ada file audio yang diunggah.".to_string()))
}

async fn read_field(field: &mut Field, max_size: usize) -> AppResult<Vec<u8>> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.next().await {
        let chunk = chunk?;
        if bytes.len() + chunk.len() > max_size {
            return Err(AppError::Validation(format!(
                "Ukuran file melebihi batas {} byte.",
                max_size
            )));
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

async fn drain(field: &mut Field) -> AppResult<()> {
    while let Some(chunk) = field.next().await {
        chunk?;
    }
    Ok(())
}
