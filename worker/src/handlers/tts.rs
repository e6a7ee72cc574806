use axum::{
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info};

use crate::core::tts::{SynthesisRequest, TTS_OUTPUT_CHANNELS};
use crate::errors::app_error::{AppError, AppResult};
use crate::state::AppState;

const CONTENT_TYPE: &str = "audio/pcm";

/// Body of `POST /tts`
#[derive(Debug, Deserialize)]
pub struct TtsRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default, alias = "voiceId")]
    pub voice_id: Option<String>,
}

/// Synthesize text and return the provider's raw 16-bit PCM
///
/// Response headers describe the audio: `X-Sample-Rate` and `X-Channels`.
pub async fn synthesize(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TtsRequest>, JsonRejection>,
) -> AppResult<Response> {
    let Json(request) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let text = request.text.trim();
    if text.is_empty() {
        return Err(AppError::BadRequest("text is required".to_string()));
    }

    let tts = state
        .tts
        .as_ref()
        .ok_or_else(|| AppError::ServiceUnavailable("TTS provider not configured".to_string()))?;

    let format = tts.output_format();
    let voice_id = request
        .voice_id
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    debug!(chars = text.chars().count(), format = %format, "Synthesizing");

    let synthesis = SynthesisRequest::new(text)
        .with_voice(voice_id)
        .with_output_format(format);
    let audio = tts.synthesize(&synthesis).await?;

    info!(bytes = audio.len(), format = %format, "Synthesis complete");

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE));
    headers.insert("x-sample-rate", HeaderValue::from(format.sample_rate()));
    headers.insert("x-channels", HeaderValue::from(TTS_OUTPUT_CHANNELS));

    Ok((StatusCode::OK, headers, audio).into_response())
}
