//! Single-slot, latest-wins hand-off of audio state from the capture
//! thread to the tick loop.
//!
//! Every delivered block produces a fresh immutable [`AudioSnapshot`] that is
//! published with an atomic pointer swap. Readers always get a whole snapshot,
//! never a frame that is still being written.

use arc_swap::ArcSwap;
use std::sync::Arc;
use std::time::Instant;
use tracing::trace;

use super::activity::ActivityTracker;
use super::{rms, AudioFrame, AudioSnapshot, FrameError};
use crate::constants::audio::{BYTES_PER_SAMPLE, FRAME_CAPACITY};

/// Create a connected producer/consumer pair. Both start from a silent
/// snapshot whose last sound is `started`.
pub fn snapshot_channel(started: Instant) -> (AudioFeed, AudioTap) {
    let slot = Arc::new(ArcSwap::from_pointee(AudioSnapshot::silent(started)));
    let feed = AudioFeed {
        slot: slot.clone(),
        tracker: ActivityTracker::new(started),
    };
    (feed, AudioTap { slot })
}

/// Producer half, owned by whoever receives audio blocks
pub struct AudioFeed {
    slot: Arc<ArcSwap<AudioSnapshot>>,
    tracker: ActivityTracker,
}

impl AudioFeed {
    /// Frame-delivery callback: `buffer` holds interleaved little-endian f32
    /// samples, of which the first `byte_count` bytes are valid.
    pub fn deliver(&mut self, buffer: &[u8], byte_count: usize, now: Instant) -> Result<(), FrameError> {
        if byte_count > buffer.len() {
            return Err(FrameError::Truncated {
                declared: byte_count,
                available: buffer.len(),
            });
        }

        let taken = (byte_count / BYTES_PER_SAMPLE).min(FRAME_CAPACITY);
        let samples: Vec<f32> = buffer[..taken * BYTES_PER_SAMPLE]
            .chunks_exact(BYTES_PER_SAMPLE)
            .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .collect();

        self.deliver_samples(samples, now)
    }

    /// Publish an already decoded block.
    pub fn deliver_samples(&mut self, samples: Vec<f32>, now: Instant) -> Result<(), FrameError> {
        let frame = AudioFrame::new(samples);
        if frame.is_empty() {
            return Err(FrameError::Empty);
        }
        if let Some(index) = frame.samples().iter().position(|s| !s.is_finite()) {
            return Err(FrameError::NonFinite(index));
        }

        let volume = rms(frame.samples());
        self.tracker.observe(volume, now);
        trace!(samples = frame.len(), volume, "publishing audio snapshot");

        self.slot.store(Arc::new(AudioSnapshot {
            frame,
            activity: self.tracker.state(),
        }));
        Ok(())
    }
}

/// Consumer half, read once per tick
#[derive(Clone)]
pub struct AudioTap {
    slot: Arc<ArcSwap<AudioSnapshot>>,
}

impl AudioTap {
    /// The most recently published snapshot
    pub fn latest(&self) -> Arc<AudioSnapshot> {
        self.slot.load_full()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn to_bytes(samples: &[f32]) -> Vec<u8> {
        samples.iter().flat_map(|s| s.to_le_bytes()).collect()
    }

    #[test]
    fn test_initial_snapshot_is_silent() {
        let start = Instant::now();
        let (_feed, tap) = snapshot_channel(start);
        let snapshot = tap.latest();
        assert!(snapshot.frame.is_empty());
        assert_eq!(snapshot.activity.last_sound, start);
        assert_eq!(snapshot.activity.volume_rms, 0.0);
    }

    #[test]
    fn test_deliver_publishes_frame_and_activity_together() {
        let start = Instant::now();
        let (mut feed, tap) = snapshot_channel(start);
        let now = start + Duration::from_secs(3);

        let bytes = to_bytes(&[0.5, -0.5, 0.5, -0.5]);
        feed.deliver(&bytes, bytes.len(), now).unwrap();

        let snapshot = tap.latest();
        assert_eq!(snapshot.frame.samples(), &[0.5, -0.5, 0.5, -0.5]);
        assert!((snapshot.activity.volume_rms - 0.5).abs() < 1e-6);
        assert_eq!(snapshot.activity.last_sound, now);
    }

    #[test]
    fn test_latest_delivery_wins() {
        let start = Instant::now();
        let (mut feed, tap) = snapshot_channel(start);

        feed.deliver_samples(vec![0.1; 8], start).unwrap();
        feed.deliver_samples(vec![0.2; 4], start).unwrap();

        assert_eq!(tap.latest().frame.samples(), &[0.2; 4]);
    }

    #[test]
    fn test_reader_keeps_its_snapshot_across_publishes() {
        let start = Instant::now();
        let (mut feed, tap) = snapshot_channel(start);
        feed.deliver_samples(vec![0.1; 8], start).unwrap();

        let held = tap.latest();
        feed.deliver_samples(vec![0.9; 8], start).unwrap();

        assert_eq!(held.frame.samples(), &[0.1; 8]);
        assert_eq!(tap.latest().frame.samples(), &[0.9; 8]);
    }

    #[test]
    fn test_delivery_takes_at_most_frame_capacity() {
        let start = Instant::now();
        let (mut feed, tap) = snapshot_channel(start);
        let bytes = to_bytes(&vec![0.01; FRAME_CAPACITY + 512]);

        feed.deliver(&bytes, bytes.len(), start).unwrap();
        assert_eq!(tap.latest().frame.len(), FRAME_CAPACITY);
    }

    #[test]
    fn test_partial_trailing_sample_is_ignored() {
        let start = Instant::now();
        let (mut feed, tap) = snapshot_channel(start);
        let mut bytes = to_bytes(&[0.25, 0.25]);
        bytes.extend_from_slice(&[0, 1]);

        feed.deliver(&bytes, bytes.len(), start).unwrap();
        assert_eq!(tap.latest().frame.len(), 2);
    }

    #[test]
    fn test_bad_blocks_are_abandoned() {
        let start = Instant::now();
        let (mut feed, tap) = snapshot_channel(start);
        feed.deliver_samples(vec![0.3; 16], start).unwrap();
        let before = tap.latest();

        let later = start + Duration::from_secs(10);
        let bytes = to_bytes(&[0.4; 4]);
        assert_eq!(
            feed.deliver(&bytes, bytes.len() + 4, later),
            Err(FrameError::Truncated {
                declared: bytes.len() + 4,
                available: bytes.len()
            })
        );
        assert_eq!(feed.deliver(&bytes, 3, later), Err(FrameError::Empty));
        assert_eq!(
            feed.deliver_samples(vec![0.4, f32::NAN], later),
            Err(FrameError::NonFinite(1))
        );

        let after = tap.latest();
        assert!(Arc::ptr_eq(&before, &after));
        assert_eq!(after.activity.last_sound, start);
    }

    #[test]
    fn test_concurrent_reader_sees_whole_frames() {
        let start = Instant::now();
        let (mut feed, tap) = snapshot_channel(start);

        let writer = std::thread::spawn(move || {
            for i in 1..200u32 {
                let value = i as f32 / 1000.0;
                feed.deliver_samples(vec![value; 1024], start).unwrap();
            }
        });

        for _ in 0..500 {
            let snapshot = tap.latest();
            if let Some(&first) = snapshot.frame.samples().first() {
                assert!(snapshot.frame.samples().iter().all(|&s| s == first));
            }
        }
        writer.join().unwrap();
    }
}
