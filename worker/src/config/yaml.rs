use serde::Deserialize;
use std::path::PathBuf;

/// Complete YAML configuration structure
///
/// All fields are optional to allow partial configuration. Values present in
/// the file override environment variables.
///
/// # Example YAML structure
/// ```yaml
/// server:
///   host: "0.0.0.0"
///   port: 3001
///
/// livekit:
///   url: "wss://rooms.example.com"
///   api_key: "your-api-key"
///   api_secret: "your-api-secret"
///   identity: "greeter"
///
/// tts:
///   provider: "elevenlabs"
///   api_key: "your-elevenlabs-key"
///   model_id: "eleven_turbo_v2_5"
///   voice_id: "21m00Tcm4TlvDq8ikWAM"
///   timeout_seconds: 30
///
/// audio:
///   sample_rate: 16000
///   num_channels: 1
///   frame_duration_ms: 20
///   queue_size_ms: 1000
///
/// session:
///   default_greeting: "Hi there, how can I help?"
///   playback_timeout_seconds: 300
///
/// auth:
///   worker_secret: "shared-webhook-secret"
///
/// security:
///   cors_allowed_origins: "*"
///   rate_limit_requests_per_second: 60
///   rate_limit_burst_size: 10
/// ```
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct YamlConfig {
    pub server: Option<ServerYaml>,
    pub livekit: Option<LiveKitYaml>,
    pub tts: Option<TtsYaml>,
    pub audio: Option<AudioYaml>,
    pub session: Option<SessionYaml>,
    pub auth: Option<AuthYaml>,
    pub security: Option<SecurityYaml>,
}

/// Server configuration from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ServerYaml {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub tls: Option<TlsYaml>,
}

/// TLS configuration from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct TlsYaml {
    pub enabled: Option<bool>,
    pub cert_path: Option<String>,
    pub key_path: Option<String>,
}

/// LiveKit configuration from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct LiveKitYaml {
    pub url: Option<String>,
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    /// Participant identity used when the session does not name one
    pub identity: Option<String>,
}

/// Text-to-speech provider configuration from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct TtsYaml {
    pub provider: Option<String>,
    pub api_key: Option<String>,
    /// Override for the provider endpoint (useful for proxies and tests)
    pub base_url: Option<String>,
    pub model_id: Option<String>,
    pub voice_id: Option<String>,
    pub timeout_seconds: Option<u64>,
}

/// PCM framing configuration from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AudioYaml {
    pub sample_rate: Option<u32>,
    pub num_channels: Option<u32>,
    pub frame_duration_ms: Option<u32>,
    /// Buffering inside the LiveKit audio source
    pub queue_size_ms: Option<u32>,
}

/// Session handling configuration from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct SessionYaml {
    pub default_greeting: Option<String>,
    pub playback_timeout_seconds: Option<u64>,
}

/// Authentication configuration from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AuthYaml {
    /// Shared secret expected from the webhook caller
    pub worker_secret: Option<String>,
}

/// Security configuration from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct SecurityYaml {
    /// CORS allowed origins (comma-separated list or "*" for all)
    pub cors_allowed_origins: Option<String>,
    /// Maximum requests per second per IP address
    pub rate_limit_requests_per_second: Option<u32>,
    /// Maximum burst size for rate limiting
    pub rate_limit_burst_size: Option<u32>,
}

impl YamlConfig {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or the YAML is malformed.
    pub fn from_file(path: &PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file {}: {e}", path.display()))?;

        let config: YamlConfig = serde_yaml::from_str(&contents)
            .map_err(|e| format!("Failed to parse YAML config: {e}"))?;

        Ok(config)
    }
}
