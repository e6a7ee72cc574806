//! LiveKit room access: join tokens and the audio track greetings are played into.
//!
//! The rest of the worker only sees the [`RoomConnector`] and
//! [`PublishedAudioTrack`] traits, so playback can be driven against an
//! in-memory track in tests.

mod room;
mod token;

use std::fmt;

use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

pub use room::{
    BoxedRoomConnector, LiveKitAudioTrack, LiveKitRoomConnector, PublishedAudioTrack,
    RoomConnector, RoomTarget,
};
pub use token::{DEFAULT_TOKEN_TTL, generate_join_token};

/// Errors from LiveKit token generation and room operations
#[derive(Debug, Error)]
pub enum LiveKitError {
    #[error("LiveKit credentials not configured")]
    MissingCredentials,

    #[error("Failed to generate access token: {0}")]
    TokenGeneration(String),

    #[error("Failed to connect to room '{room}': {message}")]
    ConnectionFailed { room: String, message: String },

    #[error("Failed to publish audio track: {0}")]
    PublishFailed(String),

    #[error("Failed to leave room: {0}")]
    CloseFailed(String),
}

/// Result type for LiveKit operations
pub type LiveKitResult<T> = Result<T, LiveKitError>;

/// API key and secret used to sign join tokens
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct LiveKitCredentials {
    api_key: String,
    api_secret: String,
}

impl LiveKitCredentials {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub(crate) fn api_secret(&self) -> &str {
        &self.api_secret
    }
}

impl fmt::Debug for LiveKitCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiveKitCredentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"[REDACTED]")
            .finish()
    }
}
