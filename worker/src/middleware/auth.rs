use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use subtle::ConstantTimeEq;

use crate::errors::auth_error::AuthError;
use crate::state::AppState;

/// Header carrying the shared worker secret
pub const WORKER_SECRET_HEADER: &str = "x-worker-secret";

/// Extract the presented secret from the request
///
/// Sources, in order:
/// 1. `x-worker-secret: <secret>`
/// 2. `Authorization: Bearer <secret>`
fn extract_secret(request: &Request) -> Result<String, AuthError> {
    if let Some(value) = request.headers().get(WORKER_SECRET_HEADER) {
        let secret = value.to_str().map_err(|_| AuthError::InvalidAuthHeader)?;
        return Ok(secret.trim().to_string());
    }

    if let Some(auth_header) = request.headers().get("authorization") {
        let auth_str = auth_header
            .to_str()
            .map_err(|_| AuthError::InvalidAuthHeader)?;

        if let Some(token) = auth_str.strip_prefix("Bearer ") {
            return Ok(token.trim().to_string());
        }
        return Err(AuthError::InvalidAuthHeader);
    }

    Err(AuthError::MissingSecret)
}

/// Compare secrets without leaking the match position through timing
pub fn secrets_match(presented: &str, expected: &str) -> bool {
    presented.as_bytes().ct_eq(expected.as_bytes()).into()
}

/// Reject requests that do not carry the configured worker secret
///
/// When no secret is configured every request passes.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let Some(expected) = state.config.worker_secret.as_deref() else {
        return Ok(next.run(request).await);
    };

    let method = request.method().to_string();
    let path = request.uri().path().to_string();

    let presented = match extract_secret(&request) {
        Ok(secret) => secret,
        Err(e) => {
            tracing::warn!(method = %method, path = %path, error = %e, "Rejected request");
            return Err(e);
        }
    };

    if !secrets_match(&presented, expected) {
        tracing::warn!(method = %method, path = %path, "Worker secret mismatch");
        return Err(AuthError::InvalidSecret);
    }

    tracing::debug!(method = %method, path = %path, "Worker secret accepted");
    Ok(next.run(request).await)
}
