use std::time::Instant;

use crate::constants::activity::{ACTIVE_WINDOW, LONG_SILENCE};
use crate::constants::audio::SOUND_GATE_RMS;

/// Loudness of the latest block and when sound was last heard
#[derive(Debug, Clone, Copy)]
pub struct ActivityState {
    pub last_sound: Instant,
    pub volume_rms: f32,
}

impl ActivityState {
    pub fn new(started: Instant) -> Self {
        Self {
            last_sound: started,
            volume_rms: 0.0,
        }
    }

    /// Sound was heard within the last second
    pub fn is_active(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.last_sound) <= ACTIVE_WINDOW
    }

    /// Nothing has been heard for over a minute
    pub fn is_long_silence(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.last_sound) > LONG_SILENCE
    }
}

/// Producer-side activity bookkeeping, updated once per delivered block
#[derive(Debug, Clone)]
pub struct ActivityTracker {
    state: ActivityState,
}

impl ActivityTracker {
    pub fn new(started: Instant) -> Self {
        Self {
            state: ActivityState::new(started),
        }
    }

    pub fn observe(&mut self, volume_rms: f32, now: Instant) {
        self.state.volume_rms = volume_rms;
        if volume_rms > SOUND_GATE_RMS {
            self.state.last_sound = now;
        }
    }

    pub fn state(&self) -> ActivityState {
        self.state
    }
}
