//! Session-start requests and their normalization.
//!
//! Webhook callers are not consistent about field naming, so the request
//! accepts snake_case and camelCase spellings. Normalization trims every
//! value, treats blanks as absent and fills the gaps from configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::livekit::RoomTarget;

/// Maximum length of room names, identities and session ids
pub const MAX_NAME_LENGTH: usize = 128;

/// Maximum greeting length in characters
pub const MAX_GREETING_LENGTH: usize = 2000;

/// Body of `POST /start-session`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StartSessionRequest {
    #[serde(default, alias = "roomName", alias = "room")]
    pub room_name: Option<String>,
    #[serde(default, alias = "identity", alias = "participantIdentity")]
    pub participant_identity: Option<String>,
    #[serde(default, alias = "participantName")]
    pub participant_name: Option<String>,
    #[serde(default, alias = "greetingText", alias = "text")]
    pub greeting: Option<String>,
    #[serde(default, alias = "voiceId")]
    pub voice_id: Option<String>,
    #[serde(default, alias = "sessionId")]
    pub session_id: Option<String>,
}

/// Configured fallbacks for absent request fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionDefaults {
    pub identity: String,
    pub greeting: Option<String>,
    pub voice_id: Option<String>,
}

/// A validated session with every fallback applied
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedSession {
    pub session_id: String,
    pub room_name: String,
    pub identity: String,
    pub display_name: Option<String>,
    /// `None` means there is nothing to play
    pub greeting: Option<String>,
    pub voice_id: Option<String>,
}

impl NormalizedSession {
    pub fn room_target(&self) -> RoomTarget {
        RoomTarget {
            room_name: self.room_name.clone(),
            identity: self.identity.clone(),
            display_name: self.display_name.clone(),
        }
    }
}

/// Request validation failures, reported to the caller as 400
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("room_name is required")]
    MissingRoomName,

    #[error("Invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("Greeting exceeds maximum length of {max} characters (got {actual})")]
    GreetingTooLong { max: usize, actual: usize },
}

fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | ':')
}

/// Check a LiveKit-facing name: bounded length, `[A-Za-z0-9_.:-]` only.
pub fn validate_name(field: &'static str, value: &str) -> Result<(), SessionError> {
    let length = value.chars().count();
    if length > MAX_NAME_LENGTH {
        return Err(SessionError::InvalidField {
            field,
            reason: format!("must be at most {MAX_NAME_LENGTH} characters (got {length})"),
        });
    }
    if let Some(bad) = value.chars().find(|c| !is_name_char(*c)) {
        return Err(SessionError::InvalidField {
            field,
            reason: format!("character '{bad}' is not allowed; use letters, digits, '_', '-', '.' or ':'"),
        });
    }
    Ok(())
}

impl StartSessionRequest {
    /// Validate the request and apply configured defaults.
    pub fn normalize(self, defaults: &SessionDefaults) -> Result<NormalizedSession, SessionError> {
        let room_name = clean(self.room_name).ok_or(SessionError::MissingRoomName)?;
        validate_name("room_name", &room_name)?;

        let identity = clean(self.participant_identity).unwrap_or_else(|| defaults.identity.clone());
        validate_name("participant_identity", &identity)?;

        let session_id = match clean(self.session_id) {
            Some(id) => {
                validate_name("session_id", &id)?;
                id
            }
            None => Uuid::new_v4().to_string(),
        };

        let display_name = clean(self.participant_name);
        if let Some(name) = &display_name {
            let length = name.chars().count();
            if length > MAX_NAME_LENGTH {
                return Err(SessionError::InvalidField {
                    field: "participant_name",
                    reason: format!("must be at most {MAX_NAME_LENGTH} characters (got {length})"),
                });
            }
        }

        let greeting = clean(self.greeting).or_else(|| clean(defaults.greeting.clone()));
        if let Some(text) = &greeting {
            let actual = text.chars().count();
            if actual > MAX_GREETING_LENGTH {
                return Err(SessionError::GreetingTooLong {
                    max: MAX_GREETING_LENGTH,
                    actual,
                });
            }
        }

        let voice_id = clean(self.voice_id).or_else(|| clean(defaults.voice_id.clone()));

        Ok(NormalizedSession {
            session_id,
            room_name,
            identity,
            display_name,
            greeting,
            voice_id,
        })
    }
}
