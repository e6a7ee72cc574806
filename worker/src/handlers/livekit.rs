use axum::{
    extract::{State, rejection::JsonRejection},
    response::Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::errors::app_error::{AppError, AppResult};
use crate::livekit::{DEFAULT_TOKEN_TTL, LiveKitError, generate_join_token};
use crate::session::validate_name;
use crate::state::AppState;

/// Body of `POST /livekit/token`
#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    #[serde(default, alias = "roomName", alias = "room")]
    pub room_name: Option<String>,
    #[serde(default, alias = "identity", alias = "participantIdentity")]
    pub participant_identity: Option<String>,
    #[serde(default, alias = "participantName")]
    pub participant_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
    /// LiveKit server the token is valid for
    pub url: String,
    pub room_name: String,
    pub identity: String,
}

fn required(value: Option<String>, field: &'static str) -> AppResult<String> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::BadRequest(format!("{field} is required")))?;
    validate_name(field, &value)?;
    Ok(value)
}

/// Mint a join token so a participant can enter the same room as the worker
pub async fn generate_token(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TokenRequest>, JsonRejection>,
) -> AppResult<Json<TokenResponse>> {
    let Json(request) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let room_name = required(request.room_name, "room_name")?;
    let identity = required(request.participant_identity, "participant_identity")?;
    let display_name = request
        .participant_name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());

    let credentials = state
        .config
        .livekit_credentials()
        .ok_or(LiveKitError::MissingCredentials)?;

    let token = generate_join_token(
        &credentials,
        &room_name,
        &identity,
        display_name.as_deref(),
        DEFAULT_TOKEN_TTL,
    )?;

    info!(room = %room_name, identity = %identity, "Issued LiveKit token");

    Ok(Json(TokenResponse {
        token,
        url: state.config.livekit_url.clone(),
        room_name,
        identity,
    }))
}
