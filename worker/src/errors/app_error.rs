use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::core::tts::TTSError;
use crate::livekit::LiveKitError;
use crate::playback::PlaybackError;
use crate::session::SessionError;

/// Errors surfaced by HTTP handlers, rendered as `{"error": "..."}`
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    InvalidSession(#[from] SessionError),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    ServiceUnavailable(String),

    /// A provider behind the worker failed
    #[error("{0}")]
    Upstream(String),

    #[error("{0}")]
    Internal(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidSession(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self, "Request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<TTSError> for AppError {
    fn from(err: TTSError) -> Self {
        match err {
            TTSError::InvalidInput(msg) => Self::BadRequest(msg),
            TTSError::ProviderError { .. } | TTSError::NetworkError(_) => {
                Self::Upstream(format!("TTS provider error: {err}"))
            }
            TTSError::InvalidConfiguration(_) | TTSError::InternalError(_) => {
                Self::Internal(err.to_string())
            }
        }
    }
}

impl From<LiveKitError> for AppError {
    fn from(err: LiveKitError) -> Self {
        match err {
            LiveKitError::MissingCredentials => Self::ServiceUnavailable(err.to_string()),
            LiveKitError::TokenGeneration(_) => Self::Internal(err.to_string()),
            _ => Self::Upstream(err.to_string()),
        }
    }
}

impl From<PlaybackError> for AppError {
    fn from(err: PlaybackError) -> Self {
        match err {
            PlaybackError::SessionActive(_) => Self::Conflict(err.to_string()),
            PlaybackError::ShuttingDown => Self::ServiceUnavailable(err.to_string()),
        }
    }
}
