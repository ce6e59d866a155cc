use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::generation::labels::{labels, MissingInput};
use crate::generation::models::Lang;
use crate::layout::RenderError;
use crate::llm_client::{ArtifactKind, LlmError};

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`;
/// handlers that know the request language go through `localized` instead.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(MissingInput),

    #[error("Generation failed: {source}")]
    GenerationFailed {
        artifact: Option<ArtifactKind>,
        source: LlmError,
    },

    #[error("Render failure: {0}")]
    RenderFailure(#[from] RenderError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn generation(artifact: ArtifactKind, source: LlmError) -> Self {
        AppError::GenerationFailed {
            artifact: Some(artifact),
            source,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::GenerationFailed {
                source: LlmError::Timeout { .. },
                ..
            } => StatusCode::GATEWAY_TIMEOUT,
            AppError::GenerationFailed { .. } => StatusCode::BAD_GATEWAY,
            AppError::RenderFailure(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Converts into a response body whose text follows the request language.
    pub fn localized(self, lang: Lang) -> LocalizedError {
        let l = labels(lang);
        let status = self.status();

        let (error, message) = match &self {
            AppError::InvalidInput(missing) => {
                (l.invalid_input_error, l.missing_input(*missing).to_string())
            }
            AppError::GenerationFailed { artifact, source } => {
                tracing::error!(artifact = ?artifact, "Generation failed: {source}");
                let label = match source {
                    LlmError::Timeout { .. } => l.timeout_error,
                    _ => l.generation_error,
                };
                (label, source.to_string())
            }
            AppError::RenderFailure(e) => {
                tracing::error!("Render failure: {e}");
                (l.render_error, e.to_string())
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (l.internal_error, e.to_string())
            }
        };

        LocalizedError {
            status,
            error,
            message,
        }
    }
}

impl From<LlmError> for AppError {
    fn from(source: LlmError) -> Self {
        AppError::GenerationFailed {
            artifact: None,
            source,
        }
    }
}

#[derive(Debug)]
pub struct LocalizedError {
    pub status: StatusCode,
    pub error: &'static str,
    pub message: String,
}

impl IntoResponse for LocalizedError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.error,
            "message": self.message,
        }));

        (self.status, body).into_response()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.localized(Lang::default()).into_response()
    }
}
