use crate::constants::glow::{
    ATTACK_KEEP, ATTACK_TAKE, BLUR_BASE, BLUR_SPAN, DECAY, MAX_OPACITY, SNAP_TO_ZERO, VOLUME_GAIN,
};

/// Loudness-driven glow behind the foreground, smoothed independently of the bars
#[derive(Debug, Clone, Default)]
pub struct GlowModel {
    opacity: f32,
}

impl GlowModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance one tick and return the new opacity in `[0, 0.9]`.
    pub fn update(&mut self, volume_rms: f32, active: bool) -> f32 {
        if active {
            let target = (volume_rms * VOLUME_GAIN).clamp(0.0, MAX_OPACITY);
            self.opacity = self.opacity * ATTACK_KEEP + target * ATTACK_TAKE;
        } else {
            self.opacity *= DECAY;
            if self.opacity < SNAP_TO_ZERO {
                self.opacity = 0.0;
            }
        }
        self.opacity
    }

    /// Blur radius for the glow layer
    pub fn blur_radius(&self) -> f32 {
        BLUR_BASE + self.opacity * BLUR_SPAN
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attack_towards_capped_target() {
        let mut glow = GlowModel::new();
        assert!((glow.update(1.0, true) - 0.27).abs() < 1e-6);

        for _ in 0..100 {
            glow.update(1.0, true);
        }
        assert!((glow.opacity - MAX_OPACITY).abs() < 1e-4);
        assert!(glow.opacity <= MAX_OPACITY);
    }

    #[test]
    fn test_quiet_volume_target() {
        let mut glow = GlowModel::new();
        for _ in 0..100 {
            glow.update(0.02, true);
        }
        assert!((glow.opacity - 0.3).abs() < 1e-4);
    }

    #[test]
    fn test_decay_snaps_to_zero() {
        let mut glow = GlowModel::new();
        for _ in 0..50 {
            glow.update(1.0, true);
        }

        let mut ticks = 0;
        while glow.opacity > 0.0 {
            let before = glow.opacity;
            let after = glow.update(1.0, false);
            if after > 0.0 {
                assert!((after - before * DECAY).abs() < 1e-6);
                assert!(after >= SNAP_TO_ZERO);
            }
            ticks += 1;
            assert!(ticks < 200);
        }
        assert_eq!(glow.opacity, 0.0);
    }

    #[test]
    fn test_blur_radius_follows_opacity() {
        let mut glow = GlowModel::new();
        assert_eq!(glow.blur_radius(), 15.0);
        for _ in 0..200 {
            glow.update(1.0, true);
        }
        assert!((glow.blur_radius() - (15.0 + 0.9 * 35.0)).abs() < 1e-3);
    }
}
