use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Errors from the worker-secret check on protected routes
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Missing worker secret")]
    MissingSecret,

    #[error("Invalid Authorization header format")]
    InvalidAuthHeader,

    #[error("Invalid worker secret")]
    InvalidSecret,
}

pub type AuthResult<T> = Result<T, AuthError>;

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": self.to_string() })),
        )
            .into_response()
    }
}
