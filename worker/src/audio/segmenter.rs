//! Frame segmentation.
//!
//! [`segment`] cuts an [`AudioBuffer`] into consecutive frames of
//! `FrameSpec::samples_per_frame()` samples per channel. Frames are produced
//! lazily and borrow from the buffer; the iterator is `Clone`, so the same
//! buffer and spec can be walked again and yield identical frames.

use std::borrow::Cow;
use std::iter::FusedIterator;

use super::error::AudioResult;
use super::frame::{AudioBuffer, FrameSpec, PcmFrame};

/// Segment a buffer into frames.
///
/// Fails with `InvalidFrameSpec` before producing anything when the frame spec is
/// unusable. For multi-channel specs a trailing incomplete interleaved group
/// is dropped along with any odd byte already discarded by the buffer.
pub fn segment<'a>(buffer: &'a AudioBuffer, spec: &FrameSpec) -> AudioResult<FrameSegments<'a>> {
    let samples_per_frame = spec.validate()?;
    let chunk_len = spec.interleaved_len(samples_per_frame)?;
    let channels = chunk_len / samples_per_frame;

    let samples = buffer.samples();
    let usable = samples.len() - samples.len() % channels;

    Ok(FrameSegments {
        samples: &samples[..usable],
        spec: *spec,
        chunk_len,
        channels,
        offset: 0,
    })
}

/// Lazy, restartable sequence of frames over a borrowed buffer.
#[derive(Debug, Clone)]
pub struct FrameSegments<'a> {
    samples: &'a [i16],
    spec: FrameSpec,
    chunk_len: usize,
    channels: usize,
    offset: usize,
}

impl<'a> FrameSegments<'a> {
    pub fn spec(&self) -> &FrameSpec {
        &self.spec
    }

    /// Samples per channel across the whole sequence, including frames already yielded
    pub fn total_samples(&self) -> usize {
        self.samples.len() / self.channels
    }

    /// Number of frames the full sequence contains
    pub fn frame_count(&self) -> usize {
        self.samples.len().div_ceil(self.chunk_len)
    }

    fn remaining_frames(&self) -> usize {
        (self.samples.len() - self.offset).div_ceil(self.chunk_len)
    }
}

impl<'a> Iterator for FrameSegments<'a> {
    type Item = PcmFrame<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.offset >= self.samples.len() {
            return None;
        }

        let end = (self.offset + self.chunk_len).min(self.samples.len());
        let slice = &self.samples[self.offset..end];
        self.offset = end;

        Some(PcmFrame {
            data: Cow::Borrowed(slice),
            sample_rate: self.spec.sample_rate,
            num_channels: self.spec.num_channels,
            samples_per_channel: u32::try_from(slice.len() / self.channels).unwrap_or(u32::MAX),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining_frames();
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for FrameSegments<'_> {}

impl FusedIterator for FrameSegments<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::error::AudioError;
    use crate::audio::frame::samples_to_pcm16le;

    fn ramp(n: usize) -> Vec<i16> {
        (0..n).map(|i| (i % 30_000) as i16 - 15_000).collect()
    }

    fn frame_sizes(buffer: &AudioBuffer, spec: &FrameSpec) -> Vec<u32> {
        segment(buffer, spec)
            .unwrap()
            .map(|f| f.samples_per_channel)
            .collect()
    }

    #[test]
    fn test_16khz_scenario() {
        let buffer = AudioBuffer::from_pcm16le(&samples_to_pcm16le(&ramp(1000)));
        assert_eq!(
            frame_sizes(&buffer, &FrameSpec::mono(16_000)),
            vec![320, 320, 320, 40]
        );
    }

    #[test]
    fn test_48khz_exact_multiple_has_no_trailing_frame() {
        let buffer = AudioBuffer::from_samples(ramp(1920));
        assert_eq!(frame_sizes(&buffer, &FrameSpec::mono(48_000)), vec![960, 960]);
    }

    #[test]
    fn test_empty_buffer_yields_no_frames() {
        let buffer = AudioBuffer::from_pcm16le(&[]);
        let frames = segment(&buffer, &FrameSpec::default()).unwrap();
        assert_eq!(frames.len(), 0);
        assert_eq!(frames.count(), 0);
    }

    #[test]
    fn test_single_byte_buffer_yields_no_frames() {
        let buffer = AudioBuffer::from_pcm16le(&[0x42]);
        assert_eq!(segment(&buffer, &FrameSpec::default()).unwrap().count(), 0);
    }

    #[test]
    fn test_buffer_shorter_than_one_frame() {
        let buffer = AudioBuffer::from_samples(ramp(7));
        assert_eq!(frame_sizes(&buffer, &FrameSpec::mono(16_000)), vec![7]);
    }

    #[test]
    fn test_frame_counts_and_last_frame_size() {
        for k in [1usize, 3, 160, 320] {
            // k samples per frame: rate chosen so that rate * 20 / 1000 == k
            let spec = FrameSpec::mono((k * 50) as u32);
            assert_eq!(spec.samples_per_frame(), k);

            for n in [0usize, 1, k.saturating_sub(1), k, k + 1, 2 * k, 5 * k + 2, 1000] {
                let buffer = AudioBuffer::from_samples(ramp(n));
                let sizes = frame_sizes(&buffer, &spec);

                assert_eq!(sizes.len(), n.div_ceil(k), "n={n} k={k}");
                if n > 0 {
                    let (last, rest) = sizes.split_last().unwrap();
                    assert!(rest.iter().all(|&s| s as usize == k));
                    assert_eq!(*last as usize, (n - 1) % k + 1);
                }
            }
        }
    }

    #[test]
    fn test_concatenation_conserves_samples() {
        let samples = ramp(12_345);
        let buffer = AudioBuffer::from_samples(samples.clone());
        let joined: Vec<i16> = segment(&buffer, &FrameSpec::mono(24_000))
            .unwrap()
            .flat_map(|f| f.data.into_owned())
            .collect();
        assert_eq!(joined, samples);
    }

    #[test]
    fn test_odd_length_segments_like_even_length() {
        let even = samples_to_pcm16le(&ramp(701));
        let mut odd = even.clone();
        odd.push(0x55);

        let spec = FrameSpec::mono(16_000);
        let even_buffer = AudioBuffer::from_pcm16le(&even);
        let odd_buffer = AudioBuffer::from_pcm16le(&odd);

        let a: Vec<_> = segment(&even_buffer, &spec).unwrap().collect();
        let b: Vec<_> = segment(&odd_buffer, &spec).unwrap().collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_spec_fails_before_any_frame() {
        let buffer = AudioBuffer::from_samples(ramp(100));
        let result = segment(&buffer, &FrameSpec::new(10, 1, 1));
        assert!(matches!(result, Err(AudioError::InvalidFrameSpec(_))));
    }

    #[test]
    fn test_oversized_spec_errors_instead_of_overflowing() {
        let buffer = AudioBuffer::from_samples(ramp(100));
        let result = segment(&buffer, &FrameSpec::new(u32::MAX, u32::MAX, u32::MAX));
        assert!(matches!(result, Err(AudioError::InvalidFrameSpec(_))));

        // Accepted or rejected depending on pointer width, never a panic
        match segment(&buffer, &FrameSpec::new(u32::MAX, u32::MAX, 1000)) {
            Ok(frames) => assert_eq!(frames.count(), 0),
            Err(e) => assert!(matches!(e, AudioError::InvalidFrameSpec(_))),
        }
    }

    #[test]
    fn test_restartable_and_deterministic() {
        let buffer = AudioBuffer::from_samples(ramp(2000));
        let spec = FrameSpec::mono(16_000);

        let mut frames = segment(&buffer, &spec).unwrap();
        let first = frames.next().unwrap();
        let restarted = frames.clone();

        let rest_a: Vec<_> = frames.collect();
        let rest_b: Vec<_> = restarted.collect();
        assert_eq!(rest_a, rest_b);

        let again = segment(&buffer, &spec).unwrap().next().unwrap();
        assert_eq!(first, again);
    }

    #[test]
    fn test_frames_borrow_from_buffer() {
        let buffer = AudioBuffer::from_samples(ramp(640));
        for frame in segment(&buffer, &FrameSpec::mono(16_000)).unwrap() {
            assert!(matches!(frame.data, Cow::Borrowed(_)));
            assert_eq!(frame.sample_rate, 16_000);
            assert_eq!(frame.num_channels, 1);
        }
    }

    #[test]
    fn test_exact_size_hint_tracks_progress() {
        let buffer = AudioBuffer::from_samples(ramp(1000));
        let mut frames = segment(&buffer, &FrameSpec::mono(16_000)).unwrap();
        assert_eq!(frames.frame_count(), 4);
        assert_eq!(frames.len(), 4);
        frames.next();
        assert_eq!(frames.len(), 3);
        assert_eq!(frames.frame_count(), 4);
        assert_eq!(frames.total_samples(), 1000);
    }

    #[test]
    fn test_stereo_interleaved_frames() {
        // 2 channels, 8 kHz, 20 ms -> 160 samples per channel, 320 interleaved
        let spec = FrameSpec::new(8_000, 2, 20);
        // 401 interleaved samples: the last half group is dropped
        let buffer = AudioBuffer::from_samples(ramp(401));
        let frames: Vec<_> = segment(&buffer, &spec).unwrap().collect();

        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].samples_per_channel, 160);
        assert_eq!(frames[0].sample_count(), 320);
        assert_eq!(frames[1].samples_per_channel, 40);
        assert_eq!(frames[1].sample_count(), 80);
    }
}
