use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error types for TTS operations
#[derive(Debug, Error)]
pub enum TTSError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The request never produced an HTTP response (connect, TLS, timeout)
    #[error("Network error: {0}")]
    NetworkError(String),

    /// The provider answered with a non-success status
    #[error("Provider error ({status}): {message}")]
    ProviderError { status: u16, message: String },

    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Result type for TTS operations
pub type TTSResult<T> = Result<T, TTSError>;

/// Raw 16-bit little-endian PCM output formats offered by the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PcmOutputFormat {
    #[serde(rename = "pcm_16000")]
    Pcm16000,
    #[serde(rename = "pcm_22050")]
    Pcm22050,
    #[serde(rename = "pcm_24000")]
    Pcm24000,
    #[serde(rename = "pcm_44100")]
    Pcm44100,
    #[serde(rename = "pcm_48000")]
    Pcm48000,
}

impl PcmOutputFormat {
    /// Value of the `output_format` query parameter
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pcm16000 => "pcm_16000",
            Self::Pcm22050 => "pcm_22050",
            Self::Pcm24000 => "pcm_24000",
            Self::Pcm44100 => "pcm_44100",
            Self::Pcm48000 => "pcm_48000",
        }
    }

    #[inline]
    pub const fn sample_rate(&self) -> u32 {
        match self {
            Self::Pcm16000 => 16_000,
            Self::Pcm22050 => 22_050,
            Self::Pcm24000 => 24_000,
            Self::Pcm44100 => 44_100,
            Self::Pcm48000 => 48_000,
        }
    }

    /// Pick the format matching a sample rate
    ///
    /// # Errors
    /// Returns `TTSError::InvalidConfiguration` when no PCM format exists for the rate.
    pub fn from_sample_rate(sample_rate: u32) -> TTSResult<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|format| format.sample_rate() == sample_rate)
            .ok_or_else(|| {
                TTSError::InvalidConfiguration(format!(
                    "No PCM output format for {sample_rate} Hz. Supported rates: 16000, 22050, 24000, 44100, 48000"
                ))
            })
    }

    pub const fn all() -> &'static [Self] {
        &[
            Self::Pcm16000,
            Self::Pcm22050,
            Self::Pcm24000,
            Self::Pcm44100,
            Self::Pcm48000,
        ]
    }
}

impl std::fmt::Display for PcmOutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for TTS providers
#[derive(Debug, Clone)]
pub struct TTSConfig {
    /// Provider name (e.g. "elevenlabs")
    pub provider: String,
    pub api_key: String,
    /// Voice used when a request does not name one
    pub voice_id: Option<String>,
    pub model: String,
    /// Sample rate of the PCM the provider must return
    pub sample_rate: u32,
    /// Endpoint override; `None` uses the provider's public API
    pub base_url: Option<String>,
    pub request_timeout: Duration,
}

impl Default for TTSConfig {
    fn default() -> Self {
        Self {
            provider: "elevenlabs".to_string(),
            api_key: String::new(),
            voice_id: None,
            model: "eleven_turbo_v2_5".to_string(),
            sample_rate: 16_000,
            base_url: None,
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// One synthesis call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisRequest {
    pub text: String,
    /// Overrides the provider's configured voice
    pub voice_id: Option<String>,
    /// Overrides the format derived from the configured sample rate
    pub output_format: Option<PcmOutputFormat>,
}

impl SynthesisRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            voice_id: None,
            output_format: None,
        }
    }

    pub fn with_voice(mut self, voice_id: Option<String>) -> Self {
        self.voice_id = voice_id;
        self
    }

    pub fn with_output_format(mut self, format: PcmOutputFormat) -> Self {
        self.output_format = Some(format);
        self
    }
}

/// Channel count of every PCM buffer a provider returns
pub const TTS_OUTPUT_CHANNELS: u32 = 1;

/// Text-to-speech provider producing a complete raw PCM buffer per request
///
/// Implementations must return 16-bit little-endian mono PCM at the sample
/// rate of the requested [`PcmOutputFormat`].
#[async_trait]
pub trait BaseTTS: Send + Sync {
    /// Synthesize `request.text` and return the whole PCM payload
    async fn synthesize(&self, request: &SynthesisRequest) -> TTSResult<Bytes>;

    /// Format used when the request does not specify one
    fn output_format(&self) -> PcmOutputFormat;

    /// Provider metadata for diagnostics
    fn provider_info(&self) -> serde_json::Value;
}

/// Shared TTS provider handle
pub type BoxedTTS = Arc<dyn BaseTTS>;
