//! ElevenLabs TTS provider implementation.
//!
//! Greetings are synthesized with a single non-streaming REST call that
//! returns the complete utterance as raw 16-bit PCM, which is what the frame
//! segmenter consumes.
//!
//! # Example
//!
//! ```rust,ignore
//! use voice_room_worker::core::tts::{BaseTTS, ElevenLabsTTS, SynthesisRequest, TTSConfig};
//!
//! let tts = ElevenLabsTTS::new(TTSConfig {
//!     api_key: "your-elevenlabs-key".to_string(),
//!     voice_id: Some("21m00Tcm4TlvDq8ikWAM".to_string()),
//!     ..Default::default()
//! })?;
//!
//! let pcm = tts.synthesize(&SynthesisRequest::new("Hello, world!")).await?;
//! ```
//!
//! # API Reference
//!
//! - Synthesis: `POST https://api.elevenlabs.io/v1/text-to-speech/{voice_id}?output_format=pcm_16000`
//!
//! # Authentication
//!
//! ElevenLabs uses API key authentication via the `xi-api-key` header.

pub mod config;
pub mod provider;

pub use config::ElevenLabsTTSConfig;
pub use provider::{ElevenLabsRequestBuilder, ElevenLabsTTS};

// =============================================================================
// API Constants
// =============================================================================

/// ElevenLabs public API base URL.
pub const ELEVENLABS_TTS_URL: &str = "https://api.elevenlabs.io";

/// Authentication header name.
pub const API_KEY_HEADER: &str = "xi-api-key";

// =============================================================================
// Limits
// =============================================================================

/// Maximum characters per TTS request.
pub const MAX_TEXT_LENGTH: usize = 5000;

/// Upper bound on how much of an error body is kept in `ProviderError`.
pub const MAX_ERROR_BODY_CHARS: usize = 512;
