pub mod tts;

// Re-export commonly used types for convenience
pub use tts::{
    BaseTTS, BoxedTTS, ElevenLabsTTS, PcmOutputFormat, SynthesisRequest, TTSConfig, TTSError,
    TTSResult, create_tts_provider, get_supported_tts_providers,
};
