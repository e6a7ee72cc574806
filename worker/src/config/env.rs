//! Environment variable loading

use std::path::PathBuf;
use std::str::FromStr;

use super::{AudioConfig, TlsConfig, WorkerConfig};

/// Every environment variable the worker reads
pub(crate) const ENV_VARS: &[&str] = &[
    "HOST",
    "PORT",
    "TLS_ENABLED",
    "TLS_CERT_PATH",
    "TLS_KEY_PATH",
    "LIVEKIT_URL",
    "LIVEKIT_API_KEY",
    "LIVEKIT_API_SECRET",
    "LIVEKIT_IDENTITY",
    "TTS_PROVIDER",
    "TTS_API_KEY",
    "ELEVENLABS_API_KEY",
    "TTS_BASE_URL",
    "TTS_MODEL_ID",
    "TTS_VOICE_ID",
    "TTS_TIMEOUT_SECONDS",
    "AUDIO_SAMPLE_RATE",
    "AUDIO_CHANNELS",
    "AUDIO_FRAME_DURATION_MS",
    "AUDIO_QUEUE_SIZE_MS",
    "DEFAULT_GREETING",
    "PLAYBACK_TIMEOUT_SECONDS",
    "WORKER_SECRET",
    "CORS_ALLOWED_ORIGINS",
    "RATE_LIMIT_REQUESTS_PER_SECOND",
    "RATE_LIMIT_BURST_SIZE",
];

/// Read a variable, treating blank values as unset
pub(super) fn env_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_env<T>(name: &str, default: T) -> Result<T, Box<dyn std::error::Error>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env_var(name) {
        Some(raw) => raw
            .parse::<T>()
            .map_err(|e| format!("Invalid value for {name} ('{raw}'): {e}").into()),
        None => Ok(default),
    }
}

pub(super) fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn tls_from_env() -> Result<Option<TlsConfig>, Box<dyn std::error::Error>> {
    let enabled = match env_var("TLS_ENABLED") {
        Some(raw) => parse_bool(&raw)
            .ok_or_else(|| format!("Invalid value for TLS_ENABLED ('{raw}'): expected a boolean"))?,
        None => false,
    };
    if !enabled {
        return Ok(None);
    }

    let cert_path = env_var("TLS_CERT_PATH")
        .ok_or("TLS_ENABLED is set but TLS_CERT_PATH is missing")?;
    let key_path =
        env_var("TLS_KEY_PATH").ok_or("TLS_ENABLED is set but TLS_KEY_PATH is missing")?;

    Ok(Some(TlsConfig {
        cert_path: PathBuf::from(cert_path),
        key_path: PathBuf::from(key_path),
    }))
}

/// Build a configuration from environment variables layered over defaults
pub(super) fn load_from_env() -> Result<WorkerConfig, Box<dyn std::error::Error>> {
    let mut config = WorkerConfig::default();
    let audio_defaults = AudioConfig::default();

    if let Some(host) = env_var("HOST") {
        config.host = host;
    }
    config.port = parse_env("PORT", config.port)?;
    config.tls = tls_from_env()?;

    if let Some(url) = env_var("LIVEKIT_URL") {
        config.livekit_url = url;
    }
    config.livekit_api_key = env_var("LIVEKIT_API_KEY");
    config.livekit_api_secret = env_var("LIVEKIT_API_SECRET");
    if let Some(identity) = env_var("LIVEKIT_IDENTITY") {
        config.livekit_identity = identity;
    }

    if let Some(provider) = env_var("TTS_PROVIDER") {
        config.tts_provider = provider;
    }
    config.tts_api_key = env_var("TTS_API_KEY").or_else(|| env_var("ELEVENLABS_API_KEY"));
    config.tts_base_url = env_var("TTS_BASE_URL");
    if let Some(model_id) = env_var("TTS_MODEL_ID") {
        config.tts_model_id = model_id;
    }
    config.default_voice_id = env_var("TTS_VOICE_ID");
    config.tts_timeout_seconds = parse_env("TTS_TIMEOUT_SECONDS", config.tts_timeout_seconds)?;

    config.audio = AudioConfig {
        sample_rate: parse_env("AUDIO_SAMPLE_RATE", audio_defaults.sample_rate)?,
        num_channels: parse_env("AUDIO_CHANNELS", audio_defaults.num_channels)?,
        frame_duration_ms: parse_env(
            "AUDIO_FRAME_DURATION_MS",
            audio_defaults.frame_duration_ms,
        )?,
        queue_size_ms: parse_env("AUDIO_QUEUE_SIZE_MS", audio_defaults.queue_size_ms)?,
    };

    config.default_greeting = env_var("DEFAULT_GREETING");
    config.playback_timeout_seconds =
        parse_env("PLAYBACK_TIMEOUT_SECONDS", config.playback_timeout_seconds)?;

    config.worker_secret = env_var("WORKER_SECRET");

    config.cors_allowed_origins = env_var("CORS_ALLOWED_ORIGINS");
    config.rate_limit_requests_per_second = parse_env(
        "RATE_LIMIT_REQUESTS_PER_SECOND",
        config.rate_limit_requests_per_second,
    )?;
    config.rate_limit_burst_size =
        parse_env("RATE_LIMIT_BURST_SIZE", config.rate_limit_burst_size)?;

    Ok(config)
}
