use std::sync::Arc;

use async_trait::async_trait;
use livekit::options::TrackPublishOptions;
use livekit::prelude::*;
use livekit::webrtc::audio_frame::AudioFrame;
use livekit::webrtc::audio_source::native::NativeAudioSource;
use livekit::webrtc::audio_source::{AudioSourceOptions, RtcAudioSource};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, info, warn};

use super::token::{DEFAULT_TOKEN_TTL, generate_join_token};
use super::{LiveKitCredentials, LiveKitError, LiveKitResult};
use crate::audio::{FrameSink, FrameSpec, PcmFrame, SinkError};

/// Track name greetings are published under
const GREETING_TRACK_NAME: &str = "greeting";

/// Where and as whom the worker joins
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomTarget {
    pub room_name: String,
    pub identity: String,
    pub display_name: Option<String>,
}

/// An audio track published into a room, accepting paced frames.
#[async_trait]
pub trait PublishedAudioTrack: FrameSink {
    /// Unpublish the track and leave the room. Safe to call more than once.
    async fn close(&mut self) -> LiveKitResult<()>;
}

/// Joins rooms and publishes an audio track ready for frames.
#[async_trait]
pub trait RoomConnector: Send + Sync {
    async fn connect(
        &self,
        target: &RoomTarget,
        spec: &FrameSpec,
    ) -> LiveKitResult<Box<dyn PublishedAudioTrack>>;
}

/// Shared connector handle
pub type BoxedRoomConnector = Arc<dyn RoomConnector>;

/// Connects to a LiveKit server with locally signed join tokens.
#[derive(Debug, Clone)]
pub struct LiveKitRoomConnector {
    url: String,
    credentials: LiveKitCredentials,
    queue_size_ms: u32,
}

impl LiveKitRoomConnector {
    pub fn new(url: impl Into<String>, credentials: LiveKitCredentials, queue_size_ms: u32) -> Self {
        Self {
            url: url.into(),
            credentials,
            queue_size_ms,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl RoomConnector for LiveKitRoomConnector {
    async fn connect(
        &self,
        target: &RoomTarget,
        spec: &FrameSpec,
    ) -> LiveKitResult<Box<dyn PublishedAudioTrack>> {
        let token = generate_join_token(
            &self.credentials,
            &target.room_name,
            &target.identity,
            target.display_name.as_deref(),
            DEFAULT_TOKEN_TTL,
        )?;

        let (room, events) = Room::connect(&self.url, &token, RoomOptions::default())
            .await
            .map_err(|e| LiveKitError::ConnectionFailed {
                room: target.room_name.clone(),
                message: e.to_string(),
            })?;

        info!(
            room = %target.room_name,
            identity = %target.identity,
            "Joined LiveKit room"
        );

        let source = NativeAudioSource::new(
            AudioSourceOptions::default(),
            spec.sample_rate,
            spec.num_channels,
            self.queue_size_ms,
        );
        let track = LocalAudioTrack::create_audio_track(
            GREETING_TRACK_NAME,
            RtcAudioSource::Native(source.clone()),
        );

        let publication = match room
            .local_participant()
            .publish_track(
                LocalTrack::Audio(track),
                TrackPublishOptions {
                    source: TrackSource::Microphone,
                    ..Default::default()
                },
            )
            .await
        {
            Ok(publication) => publication,
            Err(e) => {
                if let Err(close_err) = room.close().await {
                    warn!(error = %close_err, "Failed to leave room after publish failure");
                }
                return Err(LiveKitError::PublishFailed(e.to_string()));
            }
        };

        debug!(
            room = %target.room_name,
            track_sid = ?publication.sid(),
            sample_rate = spec.sample_rate,
            num_channels = spec.num_channels,
            "Published greeting audio track"
        );

        Ok(Box::new(LiveKitAudioTrack {
            room: Some(room),
            _events: events,
            source,
            track_sid: publication.sid(),
            room_name: target.room_name.clone(),
            sample_rate: spec.sample_rate,
            num_channels: spec.num_channels,
        }))
    }
}

/// A greeting track live in a LiveKit room.
pub struct LiveKitAudioTrack {
    /// `None` once closed
    room: Option<Room>,
    /// Held so the room keeps delivering events for the session's lifetime
    _events: UnboundedReceiver<RoomEvent>,
    source: NativeAudioSource,
    track_sid: TrackSid,
    room_name: String,
    sample_rate: u32,
    num_channels: u32,
}

#[async_trait]
impl FrameSink for LiveKitAudioTrack {
    async fn capture_frame(&mut self, frame: &PcmFrame<'_>) -> Result<(), SinkError> {
        if self.room.is_none() {
            return Err(SinkError::new("track already closed"));
        }
        if frame.sample_rate != self.sample_rate || frame.num_channels != self.num_channels {
            return Err(SinkError::new(format!(
                "frame format {} Hz x{} does not match track format {} Hz x{}",
                frame.sample_rate, frame.num_channels, self.sample_rate, self.num_channels
            )));
        }

        let audio_frame = AudioFrame {
            data: frame.data.as_ref().into(),
            sample_rate: frame.sample_rate,
            num_channels: frame.num_channels,
            samples_per_channel: frame.samples_per_channel,
        };

        self.source
            .capture_frame(&audio_frame)
            .await
            .map_err(|e| SinkError::new(e.to_string()))
    }
}

#[async_trait]
impl PublishedAudioTrack for LiveKitAudioTrack {
    async fn close(&mut self) -> LiveKitResult<()> {
        let Some(room) = self.room.take() else {
            return Ok(());
        };

        if let Err(e) = room.local_participant().unpublish_track(&self.track_sid).await {
            warn!(
                room = %self.room_name,
                error = %e,
                "Failed to unpublish greeting track"
            );
        }

        room.close()
            .await
            .map_err(|e| LiveKitError::CloseFailed(e.to_string()))?;

        info!(room = %self.room_name, "Left LiveKit room");
        Ok(())
    }
}
