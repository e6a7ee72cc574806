//! Real-time frame pacing.
//!
//! The transport behind a [`FrameSink`] does not throttle us, so the pacer
//! waits one nominal frame duration after every delivery, the final short
//! frame included. Delivery is strictly sequential.

use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::error::{AudioError, AudioResult, SinkError};
use super::frame::{FrameSpec, PcmFrame};

/// Destination for paced frames, typically a published audio track.
#[async_trait]
pub trait FrameSink: Send {
    /// Hand one frame to the transport. Completion does not imply playback.
    async fn capture_frame(&mut self, frame: &PcmFrame<'_>) -> Result<(), SinkError>;
}

/// Summary of a completed playback
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlaybackReport {
    pub frames_delivered: usize,
    /// Samples per channel delivered
    pub samples_delivered: usize,
}

/// Delivers frames to a sink at wall-clock frame intervals.
#[derive(Debug, Clone, Copy)]
pub struct AudioPacer {
    frame_duration: Duration,
}

impl AudioPacer {
    pub fn new(frame_duration: Duration) -> Self {
        Self { frame_duration }
    }

    pub fn from_spec(spec: &FrameSpec) -> Self {
        Self::new(spec.frame_duration())
    }

    pub fn frame_duration(&self) -> Duration {
        self.frame_duration
    }

    /// Deliver `frames` in order, sleeping one frame duration after each.
    ///
    /// An empty sequence completes immediately. A sink failure aborts the
    /// remaining frames without retrying. Cancellation is honoured both while
    /// the sink is accepting a frame and while waiting between frames.
    pub async fn play<'a, I, S>(
        &self,
        frames: I,
        sink: &mut S,
        cancel: &CancellationToken,
    ) -> AudioResult<PlaybackReport>
    where
        I: IntoIterator<Item = PcmFrame<'a>>,
        S: FrameSink + ?Sized,
    {
        let mut report = PlaybackReport::default();

        for frame in frames {
            if cancel.is_cancelled() {
                return Err(AudioError::Cancelled {
                    frames_delivered: report.frames_delivered,
                });
            }

            let delivered = tokio::select! {
                biased;
                _ = cancel.cancelled() => None,
                result = sink.capture_frame(&frame) => Some(result),
            };

            match delivered {
                None => {
                    debug!(
                        frames_delivered = report.frames_delivered,
                        "Playback cancelled during frame delivery"
                    );
                    return Err(AudioError::Cancelled {
                        frames_delivered: report.frames_delivered,
                    });
                }
                Some(Err(source)) => {
                    warn!(
                        frame_index = report.frames_delivered,
                        error = %source,
                        "Sink rejected frame, aborting playback"
                    );
                    return Err(AudioError::SinkDelivery {
                        frame_index: report.frames_delivered,
                        source,
                    });
                }
                Some(Ok(())) => {}
            }

            report.frames_delivered += 1;
            report.samples_delivered += frame.samples_per_channel as usize;

            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!(
                        frames_delivered = report.frames_delivered,
                        "Playback cancelled between frames"
                    );
                    return Err(AudioError::Cancelled {
                        frames_delivered: report.frames_delivered,
                    });
                }
                _ = tokio::time::sleep(self.frame_duration) => {}
            }
        }

        Ok(report)
    }
}
