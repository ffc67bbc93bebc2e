use anyhow::Result;
use tracing::debug;

use super::{Surface, SurfaceEvent};
use crate::engine::FrameOutput;

/// Roughly once a second at the 16 ms tick
const SUMMARY_EVERY: u64 = 60;

/// Draws nothing; for running without a TTY.
#[derive(Debug, Default)]
pub struct HeadlessSurface {
    frames: u64,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Surface for HeadlessSurface {
    fn present(&mut self, output: &FrameOutput) -> Result<SurfaceEvent> {
        self.frames += 1;
        if self.frames % SUMMARY_EVERY == 0 {
            debug!(
                frame = self.frames,
                mode = %output.mode,
                active = output.active,
                visible = output.visible_count(),
                glow = output.glow_opacity,
                rotation = output.rotation_deg,
                clock = %output.clock,
                "frame summary"
            );
        }
        Ok(SurfaceEvent::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::VisualizationMode;

    #[test]
    fn test_headless_never_stops_the_loop() {
        let output = FrameOutput {
            segments: Vec::new(),
            glow_opacity: 0.0,
            blur_radius: 15.0,
            mode: VisualizationMode::Circular,
            rotation_deg: 0.0,
            drift_offset: (0.0, 0.0),
            clock: "00:00:00".to_string(),
            active: false,
        };
        let mut surface = HeadlessSurface::new();
        for _ in 0..120 {
            assert_eq!(surface.present(&output).unwrap(), SurfaceEvent::Continue);
        }
        assert_eq!(surface.frames, 120);
    }
}
