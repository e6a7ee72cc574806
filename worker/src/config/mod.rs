//! Configuration module for the voice room worker
//!
//! Configuration is resolved once at startup from: .env files, environment
//! variables and an optional YAML file. Priority: YAML > ENV vars > .env values > defaults.
//! The resolved [`WorkerConfig`] is passed explicitly to everything that needs
//! it; nothing reads the environment after startup.
//!
//! # Modules
//! - `yaml`: YAML configuration file loading
//! - `env`: Environment variable loading
//! - `merge`: Merging YAML and environment configurations
//! - `validation`: Configuration validation logic
//!
//! # Example
//! ```rust,no_run
//! use voice_room_worker::config::WorkerConfig;
//! use std::path::PathBuf;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = WorkerConfig::from_env()?;
//!
//! let config_path = PathBuf::from("config.yaml");
//! let config = WorkerConfig::from_file(&config_path)?;
//!
//! println!("Worker listening on {}", config.address());
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;
use std::time::Duration;

mod env;
mod merge;
mod validation;
mod yaml;

pub use yaml::YamlConfig;

use crate::audio::{DEFAULT_FRAME_DURATION_MS, DEFAULT_NUM_CHANNELS, DEFAULT_SAMPLE_RATE, FrameSpec};
use crate::core::tts::TTSConfig;
use crate::livekit::LiveKitCredentials;
use crate::session::SessionDefaults;

/// Default participant identity for the worker in a room
pub const DEFAULT_LIVEKIT_IDENTITY: &str = "voice-worker";

/// Default TTS provider
pub const DEFAULT_TTS_PROVIDER: &str = "elevenlabs";

/// Default ElevenLabs model for low-latency greetings
pub const DEFAULT_TTS_MODEL_ID: &str = "eleven_turbo_v2_5";

/// TLS configuration for HTTPS
#[derive(Debug, Clone)]
pub struct TlsConfig {
    /// Path to the TLS certificate file (PEM format)
    pub cert_path: PathBuf,
    /// Path to the TLS private key file (PEM format)
    pub key_path: PathBuf,
}

/// PCM framing settings shared by the TTS request and the published track
///
/// The sample rate and channel count must match the LiveKit audio source the
/// frames are captured into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioConfig {
    pub sample_rate: u32,
    pub num_channels: u32,
    pub frame_duration_ms: u32,
    /// Internal buffering of the LiveKit native audio source
    pub queue_size_ms: u32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            num_channels: DEFAULT_NUM_CHANNELS,
            frame_duration_ms: DEFAULT_FRAME_DURATION_MS,
            queue_size_ms: 1000,
        }
    }
}

impl AudioConfig {
    pub fn frame_spec(&self) -> FrameSpec {
        FrameSpec::new(self.sample_rate, self.num_channels, self.frame_duration_ms)
    }
}

/// Worker configuration
///
/// Contains everything needed to run the worker:
/// - Server settings (host, port, TLS)
/// - LiveKit room credentials
/// - TTS provider settings
/// - PCM framing settings
/// - Webhook authentication
/// - Security settings (CORS, rate limiting)
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    // Server settings
    pub host: String,
    pub port: u16,
    pub tls: Option<TlsConfig>,

    // LiveKit settings
    pub livekit_url: String,
    pub livekit_api_key: Option<String>,
    pub livekit_api_secret: Option<String>,
    pub livekit_identity: String,

    // TTS settings
    pub tts_provider: String,
    pub tts_api_key: Option<String>,
    /// Endpoint override; `None` uses the provider's public API
    pub tts_base_url: Option<String>,
    pub tts_model_id: String,
    pub default_voice_id: Option<String>,
    pub tts_timeout_seconds: u64,

    // Audio framing
    pub audio: AudioConfig,

    // Session handling
    pub default_greeting: Option<String>,
    /// Upper bound on a single greeting playback
    pub playback_timeout_seconds: u64,

    // Authentication
    /// Shared secret required on protected routes; `None` disables auth
    pub worker_secret: Option<String>,

    // Security configuration
    /// CORS allowed origins (comma-separated list or "*" for all)
    pub cors_allowed_origins: Option<String>,
    /// Maximum requests per second per IP address
    pub rate_limit_requests_per_second: u32,
    /// Maximum burst size for rate limiting
    pub rate_limit_burst_size: u32,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            tls: None,
            livekit_url: "ws://localhost:7880".to_string(),
            livekit_api_key: None,
            livekit_api_secret: None,
            livekit_identity: DEFAULT_LIVEKIT_IDENTITY.to_string(),
            tts_provider: DEFAULT_TTS_PROVIDER.to_string(),
            tts_api_key: None,
            tts_base_url: None,
            tts_model_id: DEFAULT_TTS_MODEL_ID.to_string(),
            default_voice_id: None,
            tts_timeout_seconds: 30,
            audio: AudioConfig::default(),
            default_greeting: None,
            playback_timeout_seconds: 300,
            worker_secret: None,
            cors_allowed_origins: None,
            rate_limit_requests_per_second: 60,
            rate_limit_burst_size: 10,
        }
    }
}

/// Zeroize secrets when the configuration is dropped.
impl Drop for WorkerConfig {
    fn drop(&mut self) {
        use zeroize::Zeroize;

        if let Some(ref mut key) = self.livekit_api_key {
            key.zeroize();
        }
        if let Some(ref mut secret) = self.livekit_api_secret {
            secret.zeroize();
        }
        if let Some(ref mut key) = self.tts_api_key {
            key.zeroize();
        }
        if let Some(ref mut secret) = self.worker_secret {
            secret.zeroize();
        }
    }
}

impl WorkerConfig {
    /// Load configuration from environment variables only
    ///
    /// The .env file is loaded in `main` before this is called.
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        let config = merge::merge_config(None)?;
        validation::validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from a YAML file with environment variable base
    ///
    /// Priority order (highest to lowest):
    /// 1. YAML file values
    /// 2. Environment variables (actual ENV vars override .env values)
    /// 3. .env file values
    /// 4. Default values
    ///
    /// # Errors
    /// Returns an error if:
    /// - The YAML file cannot be read or is malformed
    /// - Environment variables have invalid formats
    /// - Configuration validation fails
    pub fn from_file(path: &PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        let yaml_config = yaml::YamlConfig::from_file(path)?;
        let config = merge::merge_config(Some(yaml_config))?;
        validation::validate_config(&config)?;
        Ok(config)
    }

    /// Get the server address as "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn is_tls_enabled(&self) -> bool {
        self.tls.is_some()
    }

    /// Check if protected routes require the worker secret
    pub fn has_worker_auth(&self) -> bool {
        self.worker_secret.is_some()
    }

    pub fn frame_spec(&self) -> FrameSpec {
        self.audio.frame_spec()
    }

    pub fn playback_timeout(&self) -> Duration {
        Duration::from_secs(self.playback_timeout_seconds)
    }

    /// LiveKit API credentials, when both key and secret are configured
    pub fn livekit_credentials(&self) -> Option<LiveKitCredentials> {
        match (&self.livekit_api_key, &self.livekit_api_secret) {
            (Some(key), Some(secret)) => Some(LiveKitCredentials::new(key, secret)),
            _ => None,
        }
    }

    /// TTS provider configuration, when an API key is configured
    pub fn tts_config(&self) -> Option<TTSConfig> {
        let api_key = self.tts_api_key.as_ref()?;
        Some(TTSConfig {
            provider: self.tts_provider.clone(),
            api_key: api_key.clone(),
            voice_id: self.default_voice_id.clone(),
            model: self.tts_model_id.clone(),
            sample_rate: self.audio.sample_rate,
            base_url: self.tts_base_url.clone(),
            request_timeout: Duration::from_secs(self.tts_timeout_seconds),
        })
    }

    /// Fallbacks applied while normalizing session requests
    pub fn session_defaults(&self) -> SessionDefaults {
        SessionDefaults {
            identity: self.livekit_identity.clone(),
            greeting: self.default_greeting.clone(),
            voice_id: self.default_voice_id.clone(),
        }
    }
}
