//! Audio pipeline error types

use thiserror::Error;

/// Result type for framing and pacing operations
pub type AudioResult<T> = Result<T, AudioError>;

/// Error reported by a frame sink when it cannot accept a frame
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct SinkError(String);

impl SinkError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

/// Errors produced by the PCM framing and pacing pipeline
///
/// Empty input is deliberately absent: an empty buffer segments to zero
/// frames and plays to completion immediately.
#[derive(Debug, Error)]
pub enum AudioError {
    /// The frame spec derives zero samples per frame (or has a zero field)
    #[error("Invalid frame spec: {0}")]
    InvalidFrameSpec(String),

    /// The sink failed to accept a frame; remaining frames were not delivered
    #[error("Sink rejected frame {frame_index}: {source}")]
    SinkDelivery {
        frame_index: usize,
        #[source]
        source: SinkError,
    },

    /// Playback stopped because its cancellation token fired
    #[error("Playback cancelled after {frames_delivered} frames")]
    Cancelled { frames_delivered: usize },
}

impl AudioError {
    /// Number of frames that reached the sink before the error, when known
    pub fn frames_delivered(&self) -> Option<usize> {
        match self {
            Self::InvalidFrameSpec(_) => Some(0),
            Self::SinkDelivery { frame_index, .. } => Some(*frame_index),
            Self::Cancelled { frames_delivered } => Some(*frames_delivered),
        }
    }
}
