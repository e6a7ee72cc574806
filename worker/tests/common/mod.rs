//! Shared fakes and request helpers for the HTTP integration tests

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, Response},
};
use bytes::Bytes;
use serde_json::Value;
use tower::util::ServiceExt;

use voice_room_worker::{
    AppState, WorkerConfig,
    audio::{FrameSink, FrameSpec, PcmFrame, SinkError, samples_to_pcm16le},
    core::tts::{BaseTTS, PcmOutputFormat, SynthesisRequest, TTSError, TTSResult},
    livekit::{LiveKitResult, PublishedAudioTrack, RoomConnector, RoomTarget},
    routes,
};

/// TTS stand-in returning a ramp of `samples` mono samples
pub struct StubTts {
    samples: Option<usize>,
    pub texts: Mutex<Vec<String>>,
}

impl StubTts {
    pub fn returning_samples(samples: usize) -> Arc<Self> {
        Arc::new(Self {
            samples: Some(samples),
            texts: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            samples: None,
            texts: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl BaseTTS for StubTts {
    async fn synthesize(&self, request: &SynthesisRequest) -> TTSResult<Bytes> {
        self.texts.lock().unwrap().push(request.text.clone());
        match self.samples {
            Some(count) => {
                let samples: Vec<i16> = (0..count).map(|i| (i % 1000) as i16).collect();
                Ok(Bytes::from(samples_to_pcm16le(&samples)))
            }
            None => Err(TTSError::ProviderError {
                status: 503,
                message: "voice service overloaded".to_string(),
            }),
        }
    }

    fn output_format(&self) -> PcmOutputFormat {
        PcmOutputFormat::Pcm16000
    }

    fn provider_info(&self) -> Value {
        serde_json::json!({ "provider": "stub" })
    }
}

/// Everything the stub room saw
#[derive(Debug, Default)]
pub struct RoomActivity {
    pub joined: Vec<RoomTarget>,
    pub frames: usize,
    pub closed: usize,
}

/// Room connector that records frames instead of publishing them
#[derive(Default)]
pub struct StubConnector {
    pub activity: Arc<Mutex<RoomActivity>>,
}

impl StubConnector {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

#[async_trait]
impl RoomConnector for StubConnector {
    async fn connect(
        &self,
        target: &RoomTarget,
        _spec: &FrameSpec,
    ) -> LiveKitResult<Box<dyn PublishedAudioTrack>> {
        self.activity.lock().unwrap().joined.push(target.clone());
        Ok(Box::new(StubTrack {
            activity: Arc::clone(&self.activity),
        }))
    }
}

struct StubTrack {
    activity: Arc<Mutex<RoomActivity>>,
}

#[async_trait]
impl FrameSink for StubTrack {
    async fn capture_frame(&mut self, _frame: &PcmFrame<'_>) -> Result<(), SinkError> {
        self.activity.lock().unwrap().frames += 1;
        Ok(())
    }
}

#[async_trait]
impl PublishedAudioTrack for StubTrack {
    async fn close(&mut self) -> LiveKitResult<()> {
        self.activity.lock().unwrap().closed += 1;
        Ok(())
    }
}

pub fn test_config() -> WorkerConfig {
    let mut config = WorkerConfig::default();
    config.host = "127.0.0.1".to_string();
    config.default_voice_id = Some("voice-default".to_string());
    config
}

/// App wired with stub collaborators
pub fn stub_app(
    config: WorkerConfig,
    tts: Option<Arc<StubTts>>,
    connector: Option<Arc<StubConnector>>,
) -> (Router, Arc<AppState>) {
    let state = AppState::with_components(
        config,
        tts.map(|t| t as Arc<dyn BaseTTS>),
        connector.map(|c| c as Arc<dyn RoomConnector>),
    );
    (routes::create_app(state.clone()), state)
}

pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Poll the status endpoint until the session reaches a terminal state
pub async fn wait_for_terminal(app: &Router, session_id: &str) -> Value {
    let uri = format!("/sessions/{session_id}");
    for _ in 0..200 {
        let response = send(app, empty_request("GET", &uri)).await;
        let body = body_json(response).await;
        match body["status"].as_str() {
            Some("pending") | Some("playing") => {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
            _ => return body,
        }
    }
    panic!("session {session_id} never finished");
}
