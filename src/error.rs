use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Failure raised while decoding, transforming or encoding an image.
#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error("base64 decode failed: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("worker task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
    #[error("output of {width}x{height} exceeds the {limit} pixel limit")]
    TooLarge { width: u64, height: u64, limit: u64 },
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    /// `public` is what the client sees, `source` only reaches the log.
    #[error("{public}: {source}")]
    Processing {
        public: &'static str,
        #[source]
        source: ProcessingError,
    },
}

impl AppError {
    pub fn missing_image() -> Self {
        AppError::Validation("No image provided".to_string())
    }

    pub fn processing(public: &'static str, source: impl Into<ProcessingError>) -> Self {
        AppError::Processing { public, source: source.into() }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Processing { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = match &self {
            AppError::Validation(msg) => msg.clone(),
            AppError::Processing { public, source } => {
                tracing::error!("❌ {}: {}", public, source);
                public.to_string()
            }
        };
        (self.status(), Json(json!({ "error": message }))).into_response()
    }
}
