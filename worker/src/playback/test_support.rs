//! In-memory TTS and room fakes for playback tests

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;

use crate::audio::{FrameSink, FrameSpec, PcmFrame, SinkError, samples_to_pcm16le};
use crate::core::tts::{BaseTTS, PcmOutputFormat, SynthesisRequest, TTSError, TTSResult};
use crate::livekit::{LiveKitError, LiveKitResult, PublishedAudioTrack, RoomConnector, RoomTarget};

pub(crate) enum FakeTtsBehavior {
    Samples(usize),
    Fail,
}

pub(crate) struct FakeTts {
    behavior: FakeTtsBehavior,
    pub requests: Mutex<Vec<SynthesisRequest>>,
}

impl FakeTts {
    pub fn returning_samples(samples: usize) -> Arc<Self> {
        Arc::new(Self {
            behavior: FakeTtsBehavior::Samples(samples),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            behavior: FakeTtsBehavior::Fail,
            requests: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl BaseTTS for FakeTts {
    async fn synthesize(&self, request: &SynthesisRequest) -> TTSResult<Bytes> {
        self.requests.lock().unwrap().push(request.clone());
        match self.behavior {
            FakeTtsBehavior::Samples(count) => {
                let samples: Vec<i16> = (0..count).map(|i| i as i16).collect();
                Ok(Bytes::from(samples_to_pcm16le(&samples)))
            }
            FakeTtsBehavior::Fail => Err(TTSError::ProviderError {
                status: 500,
                message: "upstream exploded".to_string(),
            }),
        }
    }

    fn output_format(&self) -> PcmOutputFormat {
        PcmOutputFormat::Pcm16000
    }

    fn provider_info(&self) -> serde_json::Value {
        serde_json::json!({ "provider": "fake" })
    }
}

/// What the fake room observed
#[derive(Debug, Default)]
pub(crate) struct RoomLog {
    pub targets: Vec<RoomTarget>,
    pub frame_sizes: Vec<usize>,
    pub closed: usize,
}

#[derive(Default)]
pub(crate) struct FakeConnector {
    pub log: Arc<Mutex<RoomLog>>,
    fail_connect: bool,
    hang_connect: bool,
    hang_close: bool,
    fail_frame: Option<usize>,
}

impl FakeConnector {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn refusing() -> Arc<Self> {
        Arc::new(Self {
            fail_connect: true,
            ..Self::default()
        })
    }

    pub fn failing_frame(index: usize) -> Arc<Self> {
        Arc::new(Self {
            fail_frame: Some(index),
            ..Self::default()
        })
    }

    /// Connect never completes
    pub fn stalled() -> Arc<Self> {
        Arc::new(Self {
            hang_connect: true,
            ..Self::default()
        })
    }

    /// Tracks accept frames but `close` never completes
    pub fn stuck_on_close() -> Arc<Self> {
        Arc::new(Self {
            hang_close: true,
            ..Self::default()
        })
    }
}

#[async_trait]
impl RoomConnector for FakeConnector {
    async fn connect(
        &self,
        target: &RoomTarget,
        _spec: &FrameSpec,
    ) -> LiveKitResult<Box<dyn PublishedAudioTrack>> {
        self.log.lock().unwrap().targets.push(target.clone());
        if self.hang_connect {
            std::future::pending::<()>().await;
        }
        if self.fail_connect {
            return Err(LiveKitError::ConnectionFailed {
                room: target.room_name.clone(),
                message: "connection refused".to_string(),
            });
        }
        Ok(Box::new(FakeTrack {
            log: Arc::clone(&self.log),
            fail_frame: self.fail_frame,
            hang_close: self.hang_close,
            attempts: 0,
        }))
    }
}

struct FakeTrack {
    log: Arc<Mutex<RoomLog>>,
    fail_frame: Option<usize>,
    hang_close: bool,
    attempts: usize,
}

#[async_trait]
impl FrameSink for FakeTrack {
    async fn capture_frame(&mut self, frame: &PcmFrame<'_>) -> Result<(), SinkError> {
        let index = self.attempts;
        self.attempts += 1;
        if self.fail_frame == Some(index) {
            return Err(SinkError::new("track unpublished"));
        }
        self.log.lock().unwrap().frame_sizes.push(frame.sample_count());
        Ok(())
    }
}

#[async_trait]
impl PublishedAudioTrack for FakeTrack {
    async fn close(&mut self) -> LiveKitResult<()> {
        if self.hang_close {
            std::future::pending::<()>().await;
        }
        self.log.lock().unwrap().closed += 1;
        Ok(())
    }
}
