use crate::models::DetectedHazard;
use crate::services::providers::ProviderError;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use service_core::error::AppError;
use thiserror::Error;

/// Client-facing message for gateway transport failures.
pub const TRANSPORT_FAILURE_MESSAGE: &str = "AI gateway request failed";

/// Failures surfaced by `POST /analyze-photo`.
///
/// Replies the model formats badly are not errors; see
/// [`crate::services::parser`].
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("AI analysis failed with status {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("AI gateway request failed: {0}")]
    Transport(String),

    #[error(transparent)]
    Request(#[from] AppError),
}

impl From<ProviderError> for AnalysisError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::NotConfigured(msg) => AnalysisError::Configuration(msg),
            ProviderError::ApiError { status, body } => AnalysisError::Upstream { status, body },
            ProviderError::NetworkError(msg) => AnalysisError::Transport(msg),
        }
    }
}

impl From<JsonRejection> for AnalysisError {
    fn from(rejection: JsonRejection) -> Self {
        AnalysisError::Request(AppError::from(rejection))
    }
}

impl From<validator::ValidationErrors> for AnalysisError {
    fn from(err: validator::ValidationErrors) -> Self {
        AnalysisError::Request(AppError::from(err))
    }
}

impl AnalysisError {
    pub fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            AnalysisError::Request(err) => err.status_and_message(),
            // Transport detail names the upstream host; it stays in the logs.
            AnalysisError::Transport(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                TRANSPORT_FAILURE_MESSAGE.to_string(),
            ),
            other => (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
        }
    }
}

/// Error body keeps the success shape's `hazards` key so clients can render
/// an empty result without special casing.
#[derive(Serialize)]
struct AnalysisErrorResponse {
    error: String,
    hazards: Vec<DetectedHazard>,
}

impl IntoResponse for AnalysisError {
    fn into_response(self) -> Response {
        let (status, error) = self.status_and_message();

        if status.is_server_error() {
            tracing::error!(error = %self, "Photo analysis failed");
        } else {
            tracing::warn!(error = %self, "Photo analysis request rejected");
        }

        (
            status,
            Json(AnalysisErrorResponse {
                error,
                hazards: Vec::new(),
            }),
        )
            .into_response()
    }
}
