use axum::{
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::Json,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use crate::errors::app_error::{AppError, AppResult};
use crate::playback::{CancelResult, GreetingJob, SessionSnapshot};
use crate::session::StartSessionRequest;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct StartSessionResponse {
    pub status: &'static str,
    pub session_id: String,
    pub room_name: String,
}

#[derive(Debug, Serialize)]
pub struct CancelSessionResponse {
    pub status: &'static str,
    pub session_id: String,
}

/// Accept a session and start its greeting in the background
///
/// Responds with 202 as soon as the greeting is scheduled; playback progress
/// is available from `GET /sessions/{session_id}`.
pub async fn start_session(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<StartSessionRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<StartSessionResponse>)> {
    let Json(request) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let session = request.normalize(&state.config.session_defaults())?;

    let ctx = state.playback_context().ok_or_else(|| {
        AppError::ServiceUnavailable("LiveKit credentials not configured".to_string())
    })?;
    if session.greeting.is_some() && ctx.tts.is_none() {
        return Err(AppError::ServiceUnavailable(
            "TTS provider not configured".to_string(),
        ));
    }

    let response = StartSessionResponse {
        status: "accepted",
        session_id: session.session_id.clone(),
        room_name: session.room_name.clone(),
    };

    info!(
        session_id = %session.session_id,
        room = %session.room_name,
        identity = %session.identity,
        has_greeting = session.greeting.is_some(),
        "Session accepted"
    );

    let job = GreetingJob {
        session,
        spec: state.config.frame_spec(),
        timeout: state.config.playback_timeout(),
    };
    state.playbacks.spawn(ctx, job)?;

    Ok((StatusCode::ACCEPTED, Json(response)))
}

/// Current playback status of a session
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> AppResult<Json<SessionSnapshot>> {
    state
        .playbacks
        .status(&session_id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Session '{session_id}' not found")))
}

/// Stop a session's in-flight greeting
pub async fn cancel_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> AppResult<(StatusCode, Json<CancelSessionResponse>)> {
    match state.playbacks.cancel(&session_id) {
        CancelResult::Cancelled => Ok((
            StatusCode::ACCEPTED,
            Json(CancelSessionResponse {
                status: "cancelling",
                session_id,
            }),
        )),
        CancelResult::AlreadyFinished => Err(AppError::Conflict(format!(
            "Session '{session_id}' has already finished"
        ))),
        CancelResult::NotFound => Err(AppError::NotFound(format!(
            "Session '{session_id}' not found"
        ))),
    }
}
