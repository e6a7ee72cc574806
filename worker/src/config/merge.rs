use std::path::PathBuf;

use super::env::load_from_env;
use super::yaml::{TlsYaml, YamlConfig};
use super::{TlsConfig, WorkerConfig};

/// Overwrite `target` when the YAML value is present
fn apply<T>(target: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *target = value;
    }
}

/// Like [`apply`] for optional fields; blank strings in YAML are ignored
fn apply_opt(target: &mut Option<String>, value: Option<String>) {
    if let Some(value) = value {
        let value = value.trim();
        if !value.is_empty() {
            *target = Some(value.to_string());
        }
    }
}

fn merge_tls(
    current: Option<TlsConfig>,
    yaml: TlsYaml,
) -> Result<Option<TlsConfig>, Box<dyn std::error::Error>> {
    let enabled = yaml.enabled.unwrap_or(current.is_some());
    if !enabled {
        return Ok(None);
    }

    let cert_path = yaml
        .cert_path
        .map(PathBuf::from)
        .or_else(|| current.as_ref().map(|tls| tls.cert_path.clone()))
        .ok_or("TLS is enabled but server.tls.cert_path is missing")?;
    let key_path = yaml
        .key_path
        .map(PathBuf::from)
        .or_else(|| current.as_ref().map(|tls| tls.key_path.clone()))
        .ok_or("TLS is enabled but server.tls.key_path is missing")?;

    Ok(Some(TlsConfig {
        cert_path,
        key_path,
    }))
}

/// Resolve the final configuration: environment first, then YAML on top
pub(super) fn merge_config(
    yaml: Option<YamlConfig>,
) -> Result<WorkerConfig, Box<dyn std::error::Error>> {
    let mut config = load_from_env()?;

    let Some(yaml) = yaml else {
        return Ok(config);
    };

    if let Some(server) = yaml.server {
        apply(&mut config.host, server.host);
        apply(&mut config.port, server.port);
        if let Some(tls) = server.tls {
            config.tls = merge_tls(config.tls.take(), tls)?;
        }
    }

    if let Some(livekit) = yaml.livekit {
        apply(&mut config.livekit_url, livekit.url);
        apply_opt(&mut config.livekit_api_key, livekit.api_key);
        apply_opt(&mut config.livekit_api_secret, livekit.api_secret);
        apply(&mut config.livekit_identity, livekit.identity);
    }

    if let Some(tts) = yaml.tts {
        apply(&mut config.tts_provider, tts.provider);
        apply_opt(&mut config.tts_api_key, tts.api_key);
        apply_opt(&mut config.tts_base_url, tts.base_url);
        apply(&mut config.tts_model_id, tts.model_id);
        apply_opt(&mut config.default_voice_id, tts.voice_id);
        apply(&mut config.tts_timeout_seconds, tts.timeout_seconds);
    }

    if let Some(audio) = yaml.audio {
        apply(&mut config.audio.sample_rate, audio.sample_rate);
        apply(&mut config.audio.num_channels, audio.num_channels);
        apply(&mut config.audio.frame_duration_ms, audio.frame_duration_ms);
        apply(&mut config.audio.queue_size_ms, audio.queue_size_ms);
    }

    if let Some(session) = yaml.session {
        apply_opt(&mut config.default_greeting, session.default_greeting);
        apply(
            &mut config.playback_timeout_seconds,
            session.playback_timeout_seconds,
        );
    }

    if let Some(auth) = yaml.auth {
        apply_opt(&mut config.worker_secret, auth.worker_secret);
    }

    if let Some(security) = yaml.security {
        apply_opt(&mut config.cors_allowed_origins, security.cors_allowed_origins);
        apply(
            &mut config.rate_limit_requests_per_second,
            security.rate_limit_requests_per_second,
        );
        apply(
            &mut config.rate_limit_burst_size,
            security.rate_limit_burst_size,
        );
    }

    Ok(config)
}
