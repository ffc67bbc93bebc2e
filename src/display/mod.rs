mod headless;
mod terminal;

pub use headless::HeadlessSurface;
pub use terminal::TerminalSurface;

use anyhow::Result;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::engine::FrameOutput;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    #[default]
    Terminal,
    Headless,
}

/// What the surface wants the tick loop to do next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceEvent {
    Continue,
    NextMode,
    Quit,
}

/// Anything that can show a frame
pub trait Surface {
    fn present(&mut self, frame: &FrameOutput) -> Result<SurfaceEvent>;
}
