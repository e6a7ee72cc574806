use std::time::Duration;

use livekit_api::access_token::{AccessToken, VideoGrants};

use super::{LiveKitCredentials, LiveKitError, LiveKitResult};

/// Lifetime of tokens minted for the worker and for `/livekit/token` callers
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(60 * 60);

/// Sign a JWT that lets `identity` join `room_name` and publish tracks.
pub fn generate_join_token(
    credentials: &LiveKitCredentials,
    room_name: &str,
    identity: &str,
    display_name: Option<&str>,
    ttl: Duration,
) -> LiveKitResult<String> {
    let grants = VideoGrants {
        room_join: true,
        room: room_name.to_string(),
        can_publish: true,
        can_subscribe: true,
        ..Default::default()
    };

    AccessToken::with_api_key(credentials.api_key(), credentials.api_secret())
        .with_identity(identity)
        .with_name(display_name.unwrap_or(identity))
        .with_ttl(ttl)
        .with_grants(grants)
        .to_jwt()
        .map_err(|e| LiveKitError::TokenGeneration(e.to_string()))
}
