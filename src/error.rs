//! # Error Handling
//!
//! `AppError` is the only error type handlers return. actix-web calls
//! `ResponseError::error_response` on it, which is where classified failures
//! become HTTP status codes:
//!
//! | Variant         | Status | `error_type`          |
//! |-----------------|--------|-----------------------|
//! | `Validation`    | 400    | `validation_error`    |
//! | `Transcription` | 400    | `transcription_error` |
//! | `Provider`      | 503    | `provider_error`      |
//! | `Internal`      | 500    | `internal_error`      |
//!
//! Error bodies share the success shape, with `analysis` null:
//!
//! ```json
//! {
//!   "analysis": null,
//!   "error": "File yang diunggah bukan file audio yang valid.",
//!   "error_type": "validation_error",
//!   "timestamp": "2025-01-01T12:00:00Z"
//! }
//! ```

use crate::analysis::AnalysisError;
use actix_web::http::StatusCode;            // HTTP status codes (400, 503, 500)
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;                       // Building the JSON error body
use std::any::Any;                          // Panic payloads
use std::fmt;                               // Display for user-facing messages

/// Every failure a handler can report.
///
/// ## What this does:
/// - Carries the user-facing message for each failure class
/// - Picks the HTTP status and `error_type` through `ResponseError`
///
/// ## Key Rust Concepts:
/// - **Enum variants with data**: each class holds its own message
/// - **From trait**: `?` converts `AnalysisError` and multipart errors automatically
#[derive(Debug)]
pub enum AppError {
    /// Upload rejected before any outbound call
    Validation(String),

    /// Speech-to-text produced nothing usable
    Transcription(String),

    /// An upstream provider failed or is unavailable
    Provider(String),

    /// Anything not classified above; holds the original cause
    Internal(String),
}

impl AppError {
    /// Wrap a panic payload caught while serving a request.
    pub fn from_panic(payload: &(dyn Any + Send)) -> Self {
        let cause = if let Some(msg) = payload.downcast_ref::<&str>() {
            msg.to_string()
        } else if let Some(msg) = payload.downcast_ref::<String>() {
            msg.clone()
        } else {
            "panic".to_string()
        };
        AppError::Internal(cause)
    }

    fn error_type(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation_error",
            AppError::Transcription(_) => "transcription_error",
            AppError::Provider(_) => "provider_error",
            AppError::Internal(_) => "internal_error",
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(msg) | AppError::Transcription(msg) | AppError::Provider(msg) => {
                write!(f, "{}", msg)
            }
            AppError::Internal(cause) => write!(f, "Terjadi kesalahan tak terduga: {}", cause),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::Transcription(_) => StatusCode::BAD_REQUEST,
            AppError::Provider(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "analysis": null,
            "error": self.to_string(),
            "error_type": self.error_type(),
            "timestamp": chrono::Utc::now().to_rfc3339()
        }))
    }
}

impl From<AnalysisError> for AppError {
    fn from(err: AnalysisError) -> Self {
        match err {
            AnalysisError::Validation(msg) => AppError::Validation(msg),
            AnalysisError::Transcription(msg) => AppError::Transcription(msg),
            AnalysisError::Provider(msg) => AppError::Provider(msg),
        }
    }
}

/// A broken multipart body is the client's fault.
impl From<actix_multipart::MultipartError> for AppError {
    fn from(err: actix_multipart::MultipartError) -> Self {
        AppError::Validation(format!("Multipart error: {}", err))
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[test]
    fn test_status_mapping() {
        assert_eq!(AppError::Validation("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::Transcription("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::Provider("x".into()).status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            AppError::Internal("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_messages_pass_through_except_internal() {
        assert_eq!(AppError::Provider("Klien Groq tidak tersedia.".into()).to_string(), "Klien Groq tidak tersedia.");
        assert_eq!(
            AppError::Internal("disk full".into()).to_string(),
            "Terjadi kesalahan tak terduga: disk full"
        );
    }

    #[test]
    fn test_analysis_error_conversion() {
        let err: AppError = AnalysisError::Transcription("sunyi".into()).into();
        assert!(matches!(err, AppError::Transcription(ref m) if m == "sunyi"));

        let err: AppError = AnalysisError::Provider("down".into()).into();
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_from_panic_keeps_message() {
        let err = AppError::from_panic(&"index out of bounds");
        assert_eq!(err.to_string(), "Terjadi kesalahan tak terduga: index out of bounds");

        let err = AppError::from_panic(&String::from("poisoned"));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.error_type(), "internal_error");

        let err = AppError::from_panic(&42u32);
        assert_eq!(err.to_string(), "Terjadi kesalahan tak terduga: panic");
    }

    #[actix_web::test]
    async fn test_error_body_has_null_analysis() {
        let response = AppError::Validation("bukan audio".into()).error_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = to_bytes(response.into_body()).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(body["analysis"].is_null());
        assert_eq!(body["error"], "bukan audio");
        assert_eq!(body["error_type"], "validation_error");
        assert!(body["timestamp"].is_string());
    }
}
