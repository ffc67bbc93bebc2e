mod activity;
mod capture;
mod fft;
mod snapshot;

pub use activity::ActivityState;
pub use capture::{list_sources, AudioSource, PulseCapture};
pub use fft::{SpectralBars, SpectrumAnalyzer};
pub use snapshot::{snapshot_channel, AudioFeed, AudioTap};

use std::time::Instant;
use thiserror::Error;

use crate::constants::audio::FRAME_CAPACITY;

/// Most recent block of mono samples delivered by the capture source
#[derive(Debug, Clone, Default)]
pub struct AudioFrame {
    samples: Vec<f32>,
}

impl AudioFrame {
    /// Build a frame, keeping at most `FRAME_CAPACITY` samples.
    pub fn new(mut samples: Vec<f32>) -> Self {
        samples.truncate(FRAME_CAPACITY);
        Self { samples }
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// One published unit of audio state: the frame and the activity it produced
#[derive(Debug, Clone)]
pub struct AudioSnapshot {
    pub frame: AudioFrame,
    pub activity: ActivityState,
}

impl AudioSnapshot {
    /// Empty snapshot whose last sound is `started`
    pub fn silent(started: Instant) -> Self {
        Self {
            frame: AudioFrame::default(),
            activity: ActivityState::new(started),
        }
    }
}

/// A delivered block that could not be used. The block is dropped and the
/// previously published snapshot stays in place.
#[derive(Debug, Error, PartialEq)]
pub enum FrameError {
    #[error("empty audio block")]
    Empty,
    #[error("declared {declared} bytes but buffer holds {available}")]
    Truncated { declared: usize, available: usize },
    #[error("non-finite sample at index {0}")]
    NonFinite(usize),
}

/// Failures starting or running the capture source
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("failed to connect to PulseAudio: {0}")]
    Connect(String),
    #[error("invalid PulseAudio sample spec")]
    InvalidSpec,
    #[error("capture already running")]
    AlreadyRunning,
    #[error("failed to spawn capture thread: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Root-mean-square of a block of samples; 0 for an empty block.
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum: f32 = samples.iter().map(|s| s * s).sum();
    (sum / samples.len() as f32).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rms_of_constant_block() {
        assert!((rms(&[0.5; 256]) - 0.5).abs() < 1e-6);
        assert_eq!(rms(&[]), 0.0);
    }

    #[test]
    fn test_rms_of_sine() {
        let samples: Vec<f32> = (0..1024)
            .map(|i| (2.0 * std::f32::consts::PI * 8.0 * i as f32 / 1024.0).sin())
            .collect();
        let value = rms(&samples);
        assert!((value - std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-3, "RMS was {}", value);
    }

    #[test]
    fn test_frame_is_capped() {
        let frame = AudioFrame::new(vec![0.1; FRAME_CAPACITY + 100]);
        assert_eq!(frame.len(), FRAME_CAPACITY);
    }
}
