//! PCM framing and pacing.
//!
//! Turns a raw 16-bit little-endian PCM buffer from a TTS provider into
//! fixed-duration frames ([`segment`]) and feeds them to a real-time sink at
//! wall-clock cadence ([`AudioPacer`]).
//!
//! ```rust,ignore
//! let buffer = AudioBuffer::from_pcm16le(&bytes);
//! let spec = FrameSpec::mono(16_000);
//! let frames = segment(&buffer, &spec)?;
//! AudioPacer::from_spec(&spec).play(frames, &mut track, &cancel).await?;
//! ```

mod error;
mod frame;
mod pacer;
mod segmenter;

pub use error::{AudioError, AudioResult, SinkError};
pub use frame::{
    AudioBuffer, BYTES_PER_SAMPLE, DEFAULT_FRAME_DURATION_MS, DEFAULT_NUM_CHANNELS,
    DEFAULT_SAMPLE_RATE, FrameSpec, PcmFrame, pcm16le_to_samples, samples_to_pcm16le,
};
pub use pacer::{AudioPacer, FrameSink, PlaybackReport};
pub use segmenter::{FrameSegments, segment};
