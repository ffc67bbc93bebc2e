//! Closed-form placement of the bars around a circle or a rounded polygon.
//!
//! Every shape produces one line segment per bar, from a point on the base
//! outline outwards along the radial direction by the bar's height.

use std::f64::consts::TAU;

use super::mode::VisualizationMode;
use super::smoother::is_visible;
use crate::audio::SpectralBars;
use crate::constants::geometry::{CORNER_ROUNDNESS, POLYGON_START_ANGLE, RADIUS};

/// One bar, in display pixels with the origin at the top-left
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Segment {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub visible: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct GeometryEngine {
    radius: f64,
    corner_roundness: f64,
}

impl Default for GeometryEngine {
    fn default() -> Self {
        Self::new(RADIUS, CORNER_ROUNDNESS)
    }
}

impl GeometryEngine {
    pub fn new(radius: f64, corner_roundness: f64) -> Self {
        Self {
            radius,
            corner_roundness: corner_roundness.clamp(0.0, 1.0),
        }
    }

    pub fn generate(
        &self,
        mode: VisualizationMode,
        bars: &SpectralBars,
        rotation_deg: f64,
        center: (f64, f64),
    ) -> Vec<Segment> {
        match mode.sides() {
            None => self.circular(bars, rotation_deg, center),
            Some(sides) => self.rounded_polygon(sides, bars, rotation_deg, center),
        }
    }

    fn circular(&self, bars: &SpectralBars, rotation_deg: f64, (cx, cy): (f64, f64)) -> Vec<Segment> {
        let rotation = rotation_deg.to_radians();
        let count = bars.len() as f64;

        bars.iter()
            .enumerate()
            .map(|(i, &height)| {
                let angle = (i as f64 / count) * TAU + rotation;
                let (sin, cos) = angle.sin_cos();
                let outer = self.radius + height as f64;
                Segment {
                    x1: cx + cos * self.radius,
                    y1: cy + sin * self.radius,
                    x2: cx + cos * outer,
                    y2: cy + sin * outer,
                    visible: is_visible(height),
                }
            })
            .collect()
    }

    fn rounded_polygon(
        &self,
        sides: u32,
        bars: &SpectralBars,
        rotation_deg: f64,
        (cx, cy): (f64, f64),
    ) -> Vec<Segment> {
        let (sin_rot, cos_rot) = rotation_deg.to_radians().sin_cos();
        let rotate = |x: f64, y: f64| (x * cos_rot - y * sin_rot, x * sin_rot + y * cos_rot);
        let count = bars.len() as f64;

        bars.iter()
            .enumerate()
            .map(|(i, &height)| {
                let angle = POLYGON_START_ANGLE + (i as f64 / count) * TAU;
                let radius = self.polygon_radius(angle - POLYGON_START_ANGLE, sides);

                let (ny, nx) = angle.sin_cos();
                let (px, py) = (nx * radius, ny * radius);
                let (ex, ey) = (px + nx * height as f64, py + ny * height as f64);

                let (rx1, ry1) = rotate(px, py);
                let (rx2, ry2) = rotate(ex, ey);
                Segment {
                    x1: cx + rx1,
                    y1: cy + ry1,
                    x2: cx + rx2,
                    y2: cy + ry2,
                    visible: is_visible(height),
                }
            })
            .collect()
    }

    /// Distance from the center to the rounded outline at `angle`, measured
    /// from the polygon's first vertex.
    pub fn polygon_radius(&self, angle: f64, sides: u32) -> f64 {
        let sides = sides.max(3);
        let sector_angle = TAU / sides as f64;
        let half_sector = sector_angle / 2.0;
        let apothem = self.radius * half_sector.cos();

        let norm_angle = angle.rem_euclid(TAU);
        let sector = ((norm_angle / sector_angle) as u32).min(sides - 1);
        let from_side_center = norm_angle - (sector as f64 * sector_angle + half_sector);

        // Flat-sided polygon boundary at this exact angle
        let sharp = apothem / from_side_center.cos();
        let blend = smootherstep(from_side_center.abs() / half_sector);
        sharp - blend * self.corner_roundness * (sharp - apothem)
    }
}

/// Quintic ease with zero first and second derivatives at both ends.
/// Input is clamped to `[0, 1]`.
pub fn smootherstep(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}
