mod base;
pub mod elevenlabs;

pub use base::{
    BaseTTS, BoxedTTS, PcmOutputFormat, SynthesisRequest, TTS_OUTPUT_CHANNELS, TTSConfig,
    TTSError, TTSResult,
};
pub use elevenlabs::{ELEVENLABS_TTS_URL, ElevenLabsTTS};

use std::sync::Arc;

/// Factory function to create a TTS provider.
///
/// # Supported Providers
///
/// - `"elevenlabs"` or `"eleven-labs"` - ElevenLabs TTS API
///
/// # Example
///
/// ```rust,ignore
/// use voice_room_worker::core::tts::{create_tts_provider, TTSConfig};
///
/// let config = TTSConfig {
///     api_key: "your-api-key".to_string(),
///     voice_id: Some("21m00Tcm4TlvDq8ikWAM".to_string()),
///     ..Default::default()
/// };
///
/// let provider = create_tts_provider("elevenlabs", config)?;
/// ```
pub fn create_tts_provider(provider_type: &str, config: TTSConfig) -> TTSResult<BoxedTTS> {
    match provider_type.to_lowercase().as_str() {
        "elevenlabs" | "eleven-labs" | "eleven_labs" => Ok(Arc::new(ElevenLabsTTS::new(config)?)),
        _ => Err(TTSError::InvalidConfiguration(format!(
            "Unsupported TTS provider: {provider_type}. Supported providers: {}",
            get_supported_tts_providers().join(", ")
        ))),
    }
}

/// Canonical names accepted by [`create_tts_provider`]
pub fn get_supported_tts_providers() -> Vec<&'static str> {
    vec!["elevenlabs"]
}
