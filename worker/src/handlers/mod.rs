//! HTTP request handlers
//!
//! - `api` - Health check endpoint
//! - `session` - Start, inspect and cancel greeting sessions
//! - `tts` - Text-to-speech passthrough returning raw PCM
//! - `livekit` - LiveKit join token generation

pub mod api;
pub mod livekit;
pub mod session;
pub mod tts;
