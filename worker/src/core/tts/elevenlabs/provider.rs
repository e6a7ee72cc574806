//! ElevenLabs TTS request builder and provider implementation.
//!
//! The `ElevenLabsRequestBuilder` constructs HTTP requests for the ElevenLabs
//! text-to-speech endpoint:
//! - URL: `{base}/v1/text-to-speech/{voice_id}?output_format=pcm_XXXXX`
//! - Authentication: `xi-api-key: {api_key}` header
//! - Body: `{"text": ..., "model_id": ...}`

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::json;
use tracing::{debug, info, warn};

use super::config::ElevenLabsTTSConfig;
use super::{API_KEY_HEADER, MAX_ERROR_BODY_CHARS, MAX_TEXT_LENGTH};
use crate::core::tts::base::{
    BaseTTS, PcmOutputFormat, SynthesisRequest, TTSConfig, TTSError, TTSResult,
};

// =============================================================================
// ElevenLabsRequestBuilder
// =============================================================================

/// Builds ElevenLabs synthesis requests from a validated configuration.
#[derive(Debug, Clone)]
pub struct ElevenLabsRequestBuilder {
    config: ElevenLabsTTSConfig,
}

impl ElevenLabsRequestBuilder {
    pub fn new(config: ElevenLabsTTSConfig) -> Self {
        Self { config }
    }

    fn build_request_body(&self, text: &str) -> serde_json::Value {
        json!({
            "text": text,
            "model_id": self.config.base.model,
        })
    }

    /// Build the HTTP request for one synthesis call.
    ///
    /// **Headers**:
    /// | Header | Value | Purpose |
    /// |--------|-------|---------|
    /// | xi-api-key | {api_key} | Authentication |
    /// | Content-Type | application/json | Request body format |
    /// | Accept | audio/pcm | Response format |
    pub fn build_http_request(
        &self,
        client: &reqwest::Client,
        text: &str,
        voice_id: &str,
        format: PcmOutputFormat,
    ) -> TTSResult<reqwest::RequestBuilder> {
        let url = self.config.synthesis_url(voice_id, format)?;

        debug!(
            voice_id = %voice_id,
            model_id = %self.config.base.model,
            output_format = %format,
            "Building ElevenLabs TTS request"
        );

        Ok(client
            .post(url)
            .header(API_KEY_HEADER, &self.config.base.api_key)
            .header("Content-Type", "application/json")
            .header("Accept", "audio/pcm")
            .json(&self.build_request_body(text)))
    }

    #[inline]
    pub fn config(&self) -> &ElevenLabsTTSConfig {
        &self.config
    }
}

// =============================================================================
// ElevenLabsTTS Provider
// =============================================================================

/// ElevenLabs Text-to-Speech provider.
///
/// Holds one pooled `reqwest::Client` whose overall timeout is the configured
/// request timeout.
pub struct ElevenLabsTTS {
    client: reqwest::Client,
    request_builder: ElevenLabsRequestBuilder,
}

impl ElevenLabsTTS {
    /// Creates a new ElevenLabs TTS provider instance.
    ///
    /// # Errors
    /// * `TTSError::InvalidConfiguration` - missing API key, unsupported sample
    ///   rate or malformed base URL
    /// * `TTSError::InternalError` - the HTTP client could not be built
    pub fn new(config: TTSConfig) -> TTSResult<Self> {
        let elevenlabs_config = ElevenLabsTTSConfig::from_base(config)?;

        let client = reqwest::Client::builder()
            .timeout(elevenlabs_config.base.request_timeout)
            .build()
            .map_err(|e| TTSError::InternalError(format!("Failed to build HTTP client: {e}")))?;

        info!(
            base_url = %elevenlabs_config.base_url,
            model_id = %elevenlabs_config.base.model,
            output_format = %elevenlabs_config.output_format,
            "Created ElevenLabsTTS provider"
        );

        Ok(Self {
            client,
            request_builder: ElevenLabsRequestBuilder::new(elevenlabs_config),
        })
    }

    fn validate_text(text: &str) -> TTSResult<()> {
        if text.trim().is_empty() {
            return Err(TTSError::InvalidInput(
                "Text must not be empty".to_string(),
            ));
        }
        let length = text.chars().count();
        if length > MAX_TEXT_LENGTH {
            return Err(TTSError::InvalidInput(format!(
                "Text exceeds maximum length of {MAX_TEXT_LENGTH} characters (got {length})"
            )));
        }
        Ok(())
    }

    fn resolve_voice<'a>(&'a self, request: &'a SynthesisRequest) -> TTSResult<&'a str> {
        request
            .voice_id
            .as_deref()
            .or(self.request_builder.config().base.voice_id.as_deref())
            .map(str::trim)
            .filter(|voice| !voice.is_empty())
            .ok_or_else(|| {
                TTSError::InvalidInput(
                    "No voice_id given and no default voice configured".to_string(),
                )
            })
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((index, _)) => format!("{}...", &text[..index]),
        None => text.to_string(),
    }
}

#[async_trait]
impl BaseTTS for ElevenLabsTTS {
    async fn synthesize(&self, request: &SynthesisRequest) -> TTSResult<Bytes> {
        Self::validate_text(&request.text)?;
        let voice_id = self.resolve_voice(request)?;
        let format = request.output_format.unwrap_or(self.output_format());

        let response = self
            .request_builder
            .build_http_request(&self.client, &request.text, voice_id, format)?
            .send()
            .await
            .map_err(|e| TTSError::NetworkError(format!("ElevenLabs request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(
                status = status.as_u16(),
                voice_id = %voice_id,
                "ElevenLabs synthesis rejected"
            );
            return Err(TTSError::ProviderError {
                status: status.as_u16(),
                message: truncate_chars(body.trim(), MAX_ERROR_BODY_CHARS),
            });
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| TTSError::NetworkError(format!("Failed to read audio body: {e}")))?;

        debug!(
            bytes = audio.len(),
            voice_id = %voice_id,
            output_format = %format,
            "ElevenLabs synthesis complete"
        );

        Ok(audio)
    }

    fn output_format(&self) -> PcmOutputFormat {
        self.request_builder.config().output_format
    }

    fn provider_info(&self) -> serde_json::Value {
        let config = self.request_builder.config();
        json!({
            "provider": "elevenlabs",
            "base_url": config.base_url.as_str(),
            "model_id": config.base.model,
            "output_format": config.output_format.as_str(),
            "default_voice_id": config.base.voice_id,
            "max_text_length": MAX_TEXT_LENGTH,
        })
    }
}
