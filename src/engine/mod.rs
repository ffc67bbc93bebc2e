//! The per-tick visualization engine.
//!
//! [`Engine`] owns every piece of animation state (smoothed bars, glow,
//! mode, rotation, drift and the random source) and turns the latest audio
//! snapshot into the segments the surface draws.

mod geometry;
mod glow;
mod mode;
mod motion;
mod smoother;

pub use geometry::{GeometryEngine, Segment};
pub use glow::GlowModel;
pub use mode::VisualizationMode;
pub use motion::{DriftState, RotationState};
pub use smoother::SpectrumSmoother;

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Instant;
use tracing::{info, trace};

use crate::audio::{AudioSnapshot, SpectrumAnalyzer};

/// Everything the surface needs to draw one frame
#[derive(Debug, Clone)]
pub struct FrameOutput {
    pub segments: Vec<Segment>,
    pub glow_opacity: f32,
    pub blur_radius: f32,
    pub mode: VisualizationMode,
    pub rotation_deg: f64,
    pub drift_offset: (f64, f64),
    pub clock: String,
    pub active: bool,
}

impl FrameOutput {
    pub fn visible_count(&self) -> usize {
        self.segments.iter().filter(|s| s.visible).count()
    }
}

pub struct Engine {
    analyzer: SpectrumAnalyzer,
    smoother: SpectrumSmoother,
    glow: GlowModel,
    geometry: GeometryEngine,
    mode: VisualizationMode,
    rotation: RotationState,
    drift: DriftState,
    center: (f64, f64),
    rng: StdRng,
    long_silence: bool,
}

impl Engine {
    /// `display` is the drawing area in pixels; the shape sits at its center.
    pub fn new(display: (u32, u32), mut rng: StdRng) -> Self {
        let mode = VisualizationMode::random(&mut rng);
        let drift = DriftState::random(&mut rng);
        info!("Starting in {} mode", mode);

        Self {
            analyzer: SpectrumAnalyzer::new(),
            smoother: SpectrumSmoother::new(),
            glow: GlowModel::new(),
            geometry: GeometryEngine::default(),
            mode,
            rotation: RotationState::default(),
            drift,
            center: (display.0 as f64 / 2.0, display.1 as f64 / 2.0),
            rng,
            long_silence: false,
        }
    }

    /// Fixed seed for reproducible runs, OS entropy otherwise
    pub fn seeded(display: (u32, u32), seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::new(display, rng)
    }

    pub fn with_mode(mut self, mode: VisualizationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Make the background size known so the drift wraps around it.
    pub fn set_backdrop_size(&mut self, width: u32, height: u32) {
        self.drift.set_bounds(width, height);
    }

    /// Advance one tick.
    pub fn tick(&mut self, snapshot: &AudioSnapshot, now: Instant) -> FrameOutput {
        let activity = snapshot.activity;
        let active = activity.is_active(now);

        // The transform is skipped entirely on known-silent input
        let target = if active {
            Some(self.analyzer.analyze(&snapshot.frame, &mut self.rng))
        } else {
            None
        };
        self.smoother.update(target.as_ref(), active);

        let glow_opacity = self.glow.update(activity.volume_rms, active);

        let long_silence = activity.is_long_silence(now);
        if long_silence && !self.long_silence {
            let previous = self.mode;
            self.mode = previous.pick_other(&mut self.rng);
            info!("Long silence, switching from {} to {}", previous, self.mode);
        }
        self.long_silence = long_silence;

        let rotation_deg = self.rotation.advance();
        let drift_offset = self.drift.advance();

        let mut segments = self
            .geometry
            .generate(self.mode, self.smoother.bars(), rotation_deg, self.center);
        if self.smoother.is_hidden() {
            segments.iter_mut().for_each(|s| s.visible = false);
        }

        trace!(active, glow_opacity, rotation_deg, "tick");

        FrameOutput {
            segments,
            glow_opacity,
            blur_radius: self.glow.blur_radius(),
            mode: self.mode,
            rotation_deg,
            drift_offset,
            clock: clock_text(),
            active,
        }
    }

    /// Manually move to a different shape.
    pub fn cycle_mode(&mut self) -> VisualizationMode {
        self.mode = self.mode.pick_other(&mut self.rng);
        info!("Switched to {} mode", self.mode);
        self.mode
    }

    pub fn mode(&self) -> VisualizationMode {
        self.mode
    }
}

/// Wall clock shown over the wallpaper
pub fn clock_text() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}
