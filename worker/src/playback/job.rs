use std::time::Duration;

use serde::Serialize;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::audio::{AudioBuffer, AudioError, AudioPacer, FrameSpec, segment};
use crate::core::tts::{BoxedTTS, SynthesisRequest, TTS_OUTPUT_CHANNELS};
use crate::livekit::BoxedRoomConnector;
use crate::session::NormalizedSession;

/// Longest wait for a track to unpublish and leave its room
pub const TRACK_CLOSE_TIMEOUT: Duration = Duration::from_secs(5);

/// Collaborators a greeting run needs
#[derive(Clone)]
pub struct PlaybackContext {
    /// `None` when no TTS provider is configured
    pub tts: Option<BoxedTTS>,
    pub connector: BoxedRoomConnector,
}

/// One greeting to synthesize and play into a room
#[derive(Debug, Clone)]
pub struct GreetingJob {
    pub session: NormalizedSession,
    pub spec: FrameSpec,
    /// Upper bound on the pacing phase
    pub timeout: Duration,
}

/// How a greeting run ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PlaybackOutcome {
    Completed {
        frames_delivered: usize,
        samples_delivered: usize,
    },
    /// Nothing was played; not an error for the caller
    Skipped { reason: String },
    Failed {
        reason: String,
        frames_delivered: usize,
    },
    Cancelled { frames_delivered: usize },
}

impl PlaybackOutcome {
    fn skipped(reason: impl Into<String>) -> Self {
        Self::Skipped {
            reason: reason.into(),
        }
    }

    fn failed(reason: impl Into<String>, frames_delivered: usize) -> Self {
        Self::Failed {
            reason: reason.into(),
            frames_delivered,
        }
    }
}

/// Synthesize the session greeting, join the room and play it in real time.
///
/// The published track is always closed before returning, whatever the
/// pacing result. `on_playing` fires once the track is live, right before the
/// first frame.
pub async fn run_greeting<F>(
    ctx: &PlaybackContext,
    job: &GreetingJob,
    cancel: &CancellationToken,
    on_playing: F,
) -> PlaybackOutcome
where
    F: FnOnce() + Send,
{
    let session = &job.session;

    let Some(greeting) = session.greeting.as_deref() else {
        return PlaybackOutcome::skipped("no greeting configured");
    };
    let Some(tts) = ctx.tts.as_ref() else {
        return PlaybackOutcome::skipped("no TTS provider configured");
    };

    if job.spec.num_channels != TTS_OUTPUT_CHANNELS {
        return PlaybackOutcome::failed(
            format!(
                "frame spec expects {} channels but synthesized audio has {TTS_OUTPUT_CHANNELS}",
                job.spec.num_channels
            ),
            0,
        );
    }

    let request = SynthesisRequest::new(greeting).with_voice(session.voice_id.clone());
    let synthesized = tokio::select! {
        biased;
        _ = cancel.cancelled() => return PlaybackOutcome::Cancelled { frames_delivered: 0 },
        result = tts.synthesize(&request) => result,
    };
    let pcm = match synthesized {
        Ok(pcm) => pcm,
        Err(e) => {
            warn!(
                session_id = %session.session_id,
                error = %e,
                "Greeting synthesis failed, skipping playback"
            );
            return PlaybackOutcome::skipped(format!("synthesis failed: {e}"));
        }
    };

    let buffer = AudioBuffer::from_pcm16le(&pcm);
    if buffer.dropped_bytes() > 0 {
        debug!(
            session_id = %session.session_id,
            dropped_bytes = buffer.dropped_bytes(),
            "Discarded trailing partial sample"
        );
    }
    let frames = match segment(&buffer, &job.spec) {
        Ok(frames) => frames,
        Err(e) => return PlaybackOutcome::failed(e.to_string(), 0),
    };

    // The deadline covers joining the room as well as pacing
    let deadline = Instant::now() + job.timeout;
    let timed_out = || format!("playback timed out after {}ms", job.timeout.as_millis());

    let target = session.room_target();
    let connected = tokio::select! {
        biased;
        _ = cancel.cancelled() => return PlaybackOutcome::Cancelled { frames_delivered: 0 },
        _ = tokio::time::sleep_until(deadline) => {
            warn!(
                session_id = %session.session_id,
                room = %target.room_name,
                "Timed out joining room"
            );
            return PlaybackOutcome::failed(timed_out(), 0);
        }
        result = ctx.connector.connect(&target, &job.spec) => result,
    };
    let mut track = match connected {
        Ok(track) => track,
        Err(e) => {
            warn!(
                session_id = %session.session_id,
                room = %target.room_name,
                error = %e,
                "Could not publish greeting track"
            );
            return PlaybackOutcome::failed(e.to_string(), 0);
        }
    };

    info!(
        session_id = %session.session_id,
        room = %target.room_name,
        frames = frames.len(),
        duration_ms = buffer.duration(&job.spec).as_millis() as u64,
        "Playing greeting"
    );
    on_playing();

    // Timeout cancels a child token so the pacer still reports its progress
    let play_cancel = cancel.child_token();
    let timer = {
        let token = play_cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            token.cancel();
        })
    };

    let result = AudioPacer::from_spec(&job.spec)
        .play(frames, track.as_mut(), &play_cancel)
        .await;
    timer.abort();

    match tokio::time::timeout(TRACK_CLOSE_TIMEOUT, track.close()).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!(
            session_id = %session.session_id,
            room = %target.room_name,
            error = %e,
            "Failed to close greeting track"
        ),
        Err(_) => warn!(
            session_id = %session.session_id,
            room = %target.room_name,
            timeout_ms = TRACK_CLOSE_TIMEOUT.as_millis() as u64,
            "Greeting track did not close in time, abandoning it"
        ),
    }

    match result {
        Ok(report) => PlaybackOutcome::Completed {
            frames_delivered: report.frames_delivered,
            samples_delivered: report.samples_delivered,
        },
        Err(AudioError::Cancelled { frames_delivered }) if cancel.is_cancelled() => {
            PlaybackOutcome::Cancelled { frames_delivered }
        }
        Err(AudioError::Cancelled { frames_delivered }) => {
            PlaybackOutcome::failed(timed_out(), frames_delivered)
        }
        Err(e) => {
            let frames_delivered = e.frames_delivered().unwrap_or(0);
            PlaybackOutcome::failed(e.to_string(), frames_delivered)
        }
    }
}
