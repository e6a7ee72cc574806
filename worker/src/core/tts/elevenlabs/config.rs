//! ElevenLabs TTS configuration types.

use url::Url;

use super::ELEVENLABS_TTS_URL;
use crate::core::tts::base::{PcmOutputFormat, TTSConfig, TTSError, TTSResult};

/// ElevenLabs-specific TTS configuration.
///
/// Wraps the base `TTSConfig` with the resolved API base URL and the PCM
/// output format derived from the configured sample rate.
#[derive(Debug, Clone)]
pub struct ElevenLabsTTSConfig {
    pub base: TTSConfig,
    pub base_url: Url,
    pub output_format: PcmOutputFormat,
}

impl ElevenLabsTTSConfig {
    /// Validate a base configuration and resolve provider settings.
    ///
    /// # Errors
    /// `TTSError::InvalidConfiguration` when the API key is missing, the sample
    /// rate has no PCM format, or the base URL does not parse.
    pub fn from_base(base: TTSConfig) -> TTSResult<Self> {
        if base.api_key.trim().is_empty() {
            return Err(TTSError::InvalidConfiguration(
                "ElevenLabs API key is required".to_string(),
            ));
        }
        if base.model.trim().is_empty() {
            return Err(TTSError::InvalidConfiguration(
                "ElevenLabs model id must not be empty".to_string(),
            ));
        }

        let output_format = PcmOutputFormat::from_sample_rate(base.sample_rate)?;

        let raw_url = base.base_url.as_deref().unwrap_or(ELEVENLABS_TTS_URL);
        let base_url = Url::parse(raw_url).map_err(|e| {
            TTSError::InvalidConfiguration(format!("Invalid TTS base URL '{raw_url}': {e}"))
        })?;
        if base_url.cannot_be_a_base() || !matches!(base_url.scheme(), "http" | "https") {
            return Err(TTSError::InvalidConfiguration(format!(
                "TTS base URL must be an http(s) URL, got '{raw_url}'"
            )));
        }

        Ok(Self {
            base,
            base_url,
            output_format,
        })
    }

    /// Build `{base}/v1/text-to-speech/{voice_id}?output_format={format}`.
    ///
    /// The voice id is percent-encoded as a single path segment.
    pub fn synthesis_url(&self, voice_id: &str, format: PcmOutputFormat) -> TTSResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                TTSError::InvalidConfiguration(format!(
                    "TTS base URL cannot carry a path: {}",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(["v1", "text-to-speech", voice_id]);
        url.query_pairs_mut()
            .clear()
            .append_pair("output_format", format.as_str());
        Ok(url)
    }
}
