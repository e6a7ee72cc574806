//! PCM buffer, frame spec and frame types.
//!
//! Audio coming back from the TTS provider is raw 16-bit little-endian signed
//! PCM. It is decoded into `i16` samples exactly once, when the [`AudioBuffer`]
//! is built; every frame afterwards borrows from that decoded buffer.

use std::borrow::Cow;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::error::{AudioError, AudioResult};

/// Bytes per 16-bit PCM sample
pub const BYTES_PER_SAMPLE: usize = 2;

/// Default frame duration used by real-time transports
pub const DEFAULT_FRAME_DURATION_MS: u32 = 20;

/// Default sample rate for synthesized speech
pub const DEFAULT_SAMPLE_RATE: u32 = 16_000;

/// Default channel count (mono)
pub const DEFAULT_NUM_CHANNELS: u32 = 1;

/// Decode 16-bit little-endian PCM bytes into samples.
///
/// Precondition: `bytes` holds consecutive little-endian `i16` samples. A
/// trailing unpaired byte is not a whole sample and is dropped.
pub fn pcm16le_to_samples(bytes: &[u8]) -> Vec<i16> {
    bytes
        .chunks_exact(BYTES_PER_SAMPLE)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
        .collect()
}

/// Encode samples as 16-bit little-endian PCM bytes.
pub fn samples_to_pcm16le(samples: &[i16]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(samples.len() * BYTES_PER_SAMPLE);
    for sample in samples {
        bytes.extend_from_slice(&sample.to_le_bytes());
    }
    bytes
}

/// Immutable decoded PCM audio, interleaved when multi-channel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AudioBuffer {
    samples: Vec<i16>,
    dropped_bytes: usize,
}

impl AudioBuffer {
    /// Build a buffer from raw provider bytes, discarding an odd trailing byte.
    pub fn from_pcm16le(bytes: &[u8]) -> Self {
        Self {
            samples: pcm16le_to_samples(bytes),
            dropped_bytes: bytes.len() % BYTES_PER_SAMPLE,
        }
    }

    pub fn from_samples(samples: Vec<i16>) -> Self {
        Self {
            samples,
            dropped_bytes: 0,
        }
    }

    #[inline]
    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Bytes discarded while decoding (0 or 1)
    pub fn dropped_bytes(&self) -> usize {
        self.dropped_bytes
    }

    /// Playback duration of the buffer for the given spec
    pub fn duration(&self, spec: &FrameSpec) -> Duration {
        if spec.sample_rate == 0 || spec.num_channels == 0 {
            return Duration::ZERO;
        }
        let channels = usize::try_from(spec.num_channels).unwrap_or(usize::MAX);
        let per_channel = u64::try_from(self.samples.len() / channels).unwrap_or(u64::MAX);
        Duration::from_micros(per_channel.saturating_mul(1_000_000) / u64::from(spec.sample_rate))
    }
}

/// Describes how a buffer is cut into real-time frames.
///
/// Fields are public so a frame spec can be read straight from configuration;
/// [`FrameSpec::validate`] is the single gate that rejects unusable values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameSpec {
    /// Samples per second, per channel
    pub sample_rate: u32,
    /// Interleaved channel count
    pub num_channels: u32,
    /// Nominal duration of one frame in milliseconds
    pub frame_duration_ms: u32,
}

impl Default for FrameSpec {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            num_channels: DEFAULT_NUM_CHANNELS,
            frame_duration_ms: DEFAULT_FRAME_DURATION_MS,
        }
    }
}

impl FrameSpec {
    pub const fn new(sample_rate: u32, num_channels: u32, frame_duration_ms: u32) -> Self {
        Self {
            sample_rate,
            num_channels,
            frame_duration_ms,
        }
    }

    /// Mono spec with the default 20 ms frame
    pub const fn mono(sample_rate: u32) -> Self {
        Self::new(sample_rate, DEFAULT_NUM_CHANNELS, DEFAULT_FRAME_DURATION_MS)
    }

    /// Nominal samples per channel in one frame: floor(rate * ms / 1000)
    ///
    /// Saturates at `usize::MAX`; [`FrameSpec::validate`] rejects such specs.
    #[inline]
    pub fn samples_per_frame(&self) -> usize {
        usize::try_from(self.nominal_samples()).unwrap_or(usize::MAX)
    }

    #[inline]
    fn nominal_samples(&self) -> u64 {
        u64::from(self.sample_rate) * u64::from(self.frame_duration_ms) / 1000
    }

    #[inline]
    pub fn frame_duration(&self) -> Duration {
        Duration::from_millis(self.frame_duration_ms as u64)
    }

    /// Check the frame spec and return the nominal samples per frame.
    ///
    /// A valid spec's per-channel count fits in `u32` and its interleaved
    /// frame length (samples per frame times channels) fits in `usize`.
    pub fn validate(&self) -> AudioResult<usize> {
        if self.sample_rate == 0 {
            return Err(AudioError::InvalidFrameSpec(
                "sample rate must be positive".to_string(),
            ));
        }
        if self.num_channels == 0 {
            return Err(AudioError::InvalidFrameSpec(
                "channel count must be positive".to_string(),
            ));
        }
        if self.frame_duration_ms == 0 {
            return Err(AudioError::InvalidFrameSpec(
                "frame duration must be positive".to_string(),
            ));
        }

        let nominal = self.nominal_samples();
        if nominal == 0 {
            return Err(AudioError::InvalidFrameSpec(format!(
                "{} Hz at {} ms yields zero samples per frame",
                self.sample_rate, self.frame_duration_ms
            )));
        }

        let samples_per_frame = u32::try_from(nominal)
            .ok()
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| {
                AudioError::InvalidFrameSpec(format!(
                    "{} Hz at {} ms yields {} samples per frame, too many for one frame",
                    self.sample_rate, self.frame_duration_ms, nominal
                ))
            })?;
        self.interleaved_len(samples_per_frame)?;
        Ok(samples_per_frame)
    }

    /// Interleaved sample count of one full frame
    pub(crate) fn interleaved_len(&self, samples_per_frame: usize) -> AudioResult<usize> {
        usize::try_from(self.num_channels)
            .ok()
            .and_then(|channels| samples_per_frame.checked_mul(channels))
            .ok_or_else(|| {
                AudioError::InvalidFrameSpec(format!(
                    "{} samples across {} channels overflows a frame",
                    samples_per_frame, self.num_channels
                ))
            })
    }
}

/// One real-time frame of interleaved samples.
///
/// Mirrors the shape LiveKit's `AudioFrame` expects so conversion is a field
/// copy plus a borrowed `Cow`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PcmFrame<'a> {
    pub data: Cow<'a, [i16]>,
    pub sample_rate: u32,
    pub num_channels: u32,
    pub samples_per_channel: u32,
}

impl PcmFrame<'_> {
    /// Total interleaved sample count
    #[inline]
    pub fn sample_count(&self) -> usize {
        self.data.len()
    }

    pub fn into_owned(self) -> PcmFrame<'static> {
        PcmFrame {
            data: Cow::Owned(self.data.into_owned()),
            sample_rate: self.sample_rate,
            num_channels: self.num_channels,
            samples_per_channel: self.samples_per_channel,
        }
    }
}
