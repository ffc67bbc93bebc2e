//! Fixed tuning values of the visualization engine.
//!
//! These are deliberately not exposed through the config file: the
//! magnitude scale, smoothing and glow coefficients were tuned together.

/// Audio frame and capture constants
pub mod audio {
    /// Maximum number of samples kept from one delivered block
    pub const FRAME_CAPACITY: usize = 4096;
    /// Blocks whose RMS exceeds this count as sound
    pub const SOUND_GATE_RMS: f32 = 0.005;
    /// Bytes per interleaved 32-bit float sample
    pub const BYTES_PER_SAMPLE: usize = 4;
}

/// Spectrum analysis constants
pub mod spectrum {
    /// Number of bars drawn around the shape
    pub const BAR_COUNT: usize = 60;
    /// FFT length (2^10)
    pub const FFT_SIZE: usize = 1024;
    /// First analyzed bin (DC and the lowest bin are dropped)
    pub const FIRST_BIN: usize = 2;
    /// One past the last analyzed bin
    pub const END_BIN: usize = 200;
    /// Gain applied to every sample before windowing
    pub const INPUT_GAIN: f32 = 100.0;
    /// Magnitude to bar height scale
    pub const BAR_SCALE: f32 = 1000.0;
    /// Upper bound on a bar's target height
    pub const BAR_CAP: f32 = 500.0;
    /// Weight kept from the previous bar height while active
    pub const ATTACK_KEEP: f32 = 0.65;
    /// Weight given to the new target while active
    pub const ATTACK_TAKE: f32 = 0.35;
    /// Per-tick decay while silent
    pub const SILENT_DECAY: f32 = 0.85;
    /// Bars at or below this height are hidden
    pub const VISIBILITY_THRESHOLD: f32 = 0.5;
}

/// Activity detection windows
pub mod activity {
    use std::time::Duration;

    /// Sound within this window keeps the engine active
    pub const ACTIVE_WINDOW: Duration = Duration::from_secs(1);
    /// Silence longer than this triggers a mode change
    pub const LONG_SILENCE: Duration = Duration::from_secs(60);
}

/// Glow layer constants
pub mod glow {
    pub const VOLUME_GAIN: f32 = 15.0;
    pub const MAX_OPACITY: f32 = 0.9;
    pub const ATTACK_KEEP: f32 = 0.7;
    pub const ATTACK_TAKE: f32 = 0.3;
    pub const DECAY: f32 = 0.92;
    /// Opacity below this snaps to zero
    pub const SNAP_TO_ZERO: f32 = 0.01;
    pub const BLUR_BASE: f32 = 15.0;
    pub const BLUR_SPAN: f32 = 35.0;
}

/// Shape geometry constants
pub mod geometry {
    /// Ring radius and polygon circumradius in pixels
    pub const RADIUS: f64 = 700.0;
    /// 0 = sharp polygon, 1 = corners pulled all the way to the apothem
    pub const CORNER_ROUNDNESS: f64 = 0.5;
    /// Polygons point their apex up
    pub const POLYGON_START_ANGLE: f64 = -std::f64::consts::FRAC_PI_2;
}

/// Animation cadence and motion
pub mod animation {
    use std::time::Duration;

    pub const TICK_PERIOD: Duration = Duration::from_millis(16);
    /// Degrees added to the rotation every tick
    pub const ROTATION_STEP_DEG: f64 = 0.5;
    /// Background drift in pixels per tick
    pub const DRIFT_SPEED: f64 = 0.2;
    /// Maximum deviation of the drift direction from horizontal
    pub const DRIFT_DEVIATION_DEG: f64 = 22.5;
}

/// Display area used when none is configured
pub mod display {
    pub const DEFAULT_WIDTH: u32 = 1920;
    pub const DEFAULT_HEIGHT: u32 = 1080;
}
