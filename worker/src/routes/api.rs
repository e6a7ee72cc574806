use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::handlers::{livekit, session, tts};
use crate::state::AppState;
use std::sync::Arc;

/// Create the API router with protected routes
///
/// Authentication is layered on by the caller once state is available.
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/start-session", post(session::start_session))
        .route("/session/start", post(session::start_session))
        .route(
            "/sessions/{session_id}",
            get(session::get_session).delete(session::cancel_session),
        )
        .route("/tts", post(tts::synthesize))
        .route("/livekit/token", post(livekit::generate_token))
        .layer(TraceLayer::new_for_http())
}
