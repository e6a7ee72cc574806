use std::sync::Arc;

use tracing::{info, warn};

use crate::config::WorkerConfig;
use crate::core::tts::{BoxedTTS, create_tts_provider};
use crate::livekit::{BoxedRoomConnector, LiveKitRoomConnector};
use crate::playback::{PlaybackContext, PlaybackTracker};

/// Shared state handed to every handler
pub struct AppState {
    pub config: WorkerConfig,
    /// `None` when no TTS API key is configured
    pub tts: Option<BoxedTTS>,
    /// `None` when LiveKit credentials are missing
    pub connector: Option<BoxedRoomConnector>,
    pub playbacks: Arc<PlaybackTracker>,
}

impl AppState {
    /// Build the state from configuration, creating the TTS provider and the
    /// LiveKit connector when their credentials are present.
    pub async fn new(config: WorkerConfig) -> Arc<Self> {
        let tts = match config.tts_config() {
            Some(tts_config) => match create_tts_provider(&config.tts_provider, tts_config) {
                Ok(provider) => {
                    info!(provider = %config.tts_provider, "TTS provider ready");
                    Some(provider)
                }
                Err(e) => {
                    warn!(error = %e, "TTS provider unavailable, greetings will be skipped");
                    None
                }
            },
            None => {
                warn!("No TTS API key configured, greetings cannot be synthesized");
                None
            }
        };

        let connector = match config.livekit_credentials() {
            Some(credentials) => {
                info!(url = %config.livekit_url, "LiveKit connector ready");
                Some(Arc::new(LiveKitRoomConnector::new(
                    config.livekit_url.clone(),
                    credentials,
                    config.audio.queue_size_ms,
                )) as BoxedRoomConnector)
            }
            None => {
                warn!("LiveKit credentials not configured, sessions cannot join rooms");
                None
            }
        };

        Self::with_components(config, tts, connector)
    }

    /// Build the state from explicit collaborators
    pub fn with_components(
        config: WorkerConfig,
        tts: Option<BoxedTTS>,
        connector: Option<BoxedRoomConnector>,
    ) -> Arc<Self> {
        Arc::new(Self {
            config,
            tts,
            connector,
            playbacks: Arc::new(PlaybackTracker::new()),
        })
    }

    /// Collaborators for a greeting run, if the worker can join rooms
    pub fn playback_context(&self) -> Option<PlaybackContext> {
        self.connector.as_ref().map(|connector| PlaybackContext {
            tts: self.tts.clone(),
            connector: Arc::clone(connector),
        })
    }
}
