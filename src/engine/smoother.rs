use crate::audio::SpectralBars;
use crate::constants::spectrum::{
    ATTACK_KEEP, ATTACK_TAKE, BAR_COUNT, SILENT_DECAY, VISIBILITY_THRESHOLD,
};

/// Asymmetric temporal smoothing of the bar heights that get drawn:
/// fast attack towards the analyzed target while sound is present, slow
/// geometric decay while it is not.
#[derive(Debug, Clone)]
pub struct SpectrumSmoother {
    bars: SpectralBars,
    hidden: bool,
}

impl SpectrumSmoother {
    pub fn new() -> Self {
        Self {
            bars: [0.0; BAR_COUNT],
            hidden: true,
        }
    }

    /// Advance one tick. `target` is only read while active; a missing
    /// target while active leaves the bars untouched.
    pub fn update(&mut self, target: Option<&SpectralBars>, active: bool) -> &SpectralBars {
        if active {
            if let Some(target) = target {
                for (bar, &goal) in self.bars.iter_mut().zip(target.iter()) {
                    *bar = *bar * ATTACK_KEEP + goal * ATTACK_TAKE;
                }
            }
            self.hidden = false;
        } else {
            for bar in self.bars.iter_mut() {
                *bar *= SILENT_DECAY;
            }
            self.hidden = self.bars.iter().all(|&b| b <= VISIBILITY_THRESHOLD);
        }
        &self.bars
    }

    pub fn bars(&self) -> &SpectralBars {
        &self.bars
    }

    /// Every bar fell under the draw threshold during silence. The values
    /// are kept; they are just not drawn.
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }
}

impl Default for SpectrumSmoother {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-bar draw rule shared by every shape
pub fn is_visible(height: f32) -> bool {
    height > VISIBILITY_THRESHOLD
}
