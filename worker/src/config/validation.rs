use super::WorkerConfig;
use crate::core::tts::TTS_OUTPUT_CHANNELS;

/// Reject configurations the worker cannot run with
pub(super) fn validate_config(config: &WorkerConfig) -> Result<(), Box<dyn std::error::Error>> {
    config
        .frame_spec()
        .validate()
        .map_err(|e| format!("Invalid audio configuration: {e}"))?;

    if config.audio.num_channels != TTS_OUTPUT_CHANNELS {
        return Err(format!(
            "AUDIO_CHANNELS must be {TTS_OUTPUT_CHANNELS}: synthesized greetings are mono (got {})",
            config.audio.num_channels
        )
        .into());
    }

    if config.audio.queue_size_ms == 0 {
        return Err("AUDIO_QUEUE_SIZE_MS must be greater than zero".into());
    }

    if let Some(tls) = &config.tls {
        if tls.cert_path.as_os_str().is_empty() || tls.key_path.as_os_str().is_empty() {
            return Err("TLS is enabled but the certificate or key path is empty".into());
        }
    }

    let url = url::Url::parse(&config.livekit_url)
        .map_err(|e| format!("Invalid LIVEKIT_URL '{}': {e}", config.livekit_url))?;
    if !matches!(url.scheme(), "ws" | "wss" | "http" | "https") {
        return Err(format!(
            "Invalid LIVEKIT_URL '{}': expected a ws, wss, http or https URL",
            config.livekit_url
        )
        .into());
    }

    if config.livekit_api_key.is_some() != config.livekit_api_secret.is_some() {
        return Err("LIVEKIT_API_KEY and LIVEKIT_API_SECRET must be set together".into());
    }

    if config.livekit_identity.trim().is_empty() {
        return Err("LIVEKIT_IDENTITY must not be empty".into());
    }

    if config.playback_timeout_seconds == 0 {
        return Err("PLAYBACK_TIMEOUT_SECONDS must be greater than zero".into());
    }
    if config.tts_timeout_seconds == 0 {
        return Err("TTS_TIMEOUT_SECONDS must be greater than zero".into());
    }

    if config.rate_limit_requests_per_second == 0 || config.rate_limit_burst_size == 0 {
        return Err("Rate limit values must be greater than zero".into());
    }

    Ok(())
}
