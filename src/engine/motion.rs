use rand::Rng;

use crate::constants::animation::{DRIFT_DEVIATION_DEG, DRIFT_SPEED, ROTATION_STEP_DEG};

/// Spin of the whole shape, kept in `[0, 360)` degrees
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RotationState {
    degrees: f64,
}

impl RotationState {
    pub fn advance(&mut self) -> f64 {
        self.degrees = (self.degrees + ROTATION_STEP_DEG).rem_euclid(360.0);
        self.degrees
    }
}

/// Slow linear pan of the background image. Nothing moves until the
/// image size is known.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriftState {
    offset: (f64, f64),
    velocity: (f64, f64),
    bounds: Option<(f64, f64)>,
}

impl DriftState {
    /// Heads left or right with equal odds, tilted up to 22.5 degrees
    /// either way.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let base = if rng.random_bool(0.5) { 180.0 } else { 0.0 };
        let deviation = rng.random_range(-DRIFT_DEVIATION_DEG..DRIFT_DEVIATION_DEG);
        Self::with_heading(base + deviation)
    }

    pub fn with_heading(degrees: f64) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Self {
            offset: (0.0, 0.0),
            velocity: (cos * DRIFT_SPEED, sin * DRIFT_SPEED),
            bounds: None,
        }
    }

    /// Pixel size of the background image, once known
    pub fn set_bounds(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.bounds = Some((width as f64, height as f64));
        }
    }

    pub fn advance(&mut self) -> (f64, f64) {
        let Some((width, height)) = self.bounds else {
            return self.offset;
        };

        self.offset.0 += self.velocity.0;
        self.offset.1 += self.velocity.1;

        // Truncated remainder: the offset keeps its sign
        if self.offset.0.abs() > width {
            self.offset.0 %= width;
        }
        if self.offset.1.abs() > height {
            self.offset.1 %= height;
        }
        self.offset
    }
}
