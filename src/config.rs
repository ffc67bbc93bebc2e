use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::color::ColorScheme;
use crate::constants::display::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::display::DisplayMode;
use crate::engine::VisualizationMode;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub audio: AudioConfig,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub backdrop: BackdropConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub mode: DisplayMode,
    /// Drawing area in pixels; the shape is centered in it
    pub width: u32,
    pub height: u32,
    pub color_scheme: ColorScheme,
    pub show_clock: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            mode: DisplayMode::Terminal,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            color_scheme: ColorScheme::White,
            show_clock: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Sink whose monitor is captured (None = default sink)
    pub device: Option<String>,
    pub sample_rate: u32,
    /// Samples per delivered block
    pub block_size: usize,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            device: None,
            sample_rate: 44100,
            block_size: 1024,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Fixed random seed; unset draws one from the OS
    pub seed: Option<u64>,
    /// Starting shape; unset picks one at random
    pub initial_mode: Option<VisualizationMode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackdropConfig {
    /// Where to look for background images (None = next to the executable)
    pub directory: Option<PathBuf>,
    /// File name prefix, followed by optional digits and `.png`
    pub prefix: String,
}

impl Default for BackdropConfig {
    fn default() -> Self {
        Self {
            directory: None,
            prefix: "background".to_string(),
        }
    }
}

impl BackdropConfig {
    /// Configured directory, falling back to the executable's directory
    pub fn resolve_directory(&self) -> Option<PathBuf> {
        self.directory.clone().or_else(|| {
            std::env::current_exe()
                .ok()
                .and_then(|exe| exe.parent().map(Path::to_path_buf))
        })
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Get the default XDG config path (~/.config/wallring/config.toml)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("wallring").join("config.toml"))
    }

    /// Load config from the default XDG path if it exists
    /// Returns None if file doesn't exist, logs warning on parse errors
    pub fn load_from_default_path() -> Option<Self> {
        let path = Self::default_path()?;
        if !path.exists() {
            return None;
        }
        match Self::load(&path) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!(
                    "Failed to parse config at {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                None
            }
        }
    }

    /// Initialize default config file at XDG path, returns the path
    pub fn init_default_config() -> Result<PathBuf> {
        let path = Self::default_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, Self::generate_config_template())?;

        Ok(path)
    }

    /// Generate a commented TOML config template
    pub fn generate_config_template() -> String {
        r#"# Wallring Configuration
# This file is auto-generated. Edit as needed.

[display]
# Surface: "terminal" (preview in the terminal) or "headless" (no drawing)
mode = "terminal"
# Drawing area in pixels; the shape is centered in it
width = 1920
height = 1080
# Bar colors: "white", "spectrum", "ocean", "fire"
color_scheme = "white"
# Show the HH:MM:SS clock
show_clock = true

[audio]
# Sink whose output is captured (omit for the default sink)
# device = "alsa_output.pci-0000_00_1f.3.analog-stereo"
# Capture sample rate in Hz
sample_rate = 44100
# Samples per delivered block (at most 4096)
block_size = 1024

[engine]
# Fixed random seed for reproducible animation (omit for a random one)
# seed = 42
# Starting shape: circular, triangle, square, pentagon, hexagon (omit for random)
# initial_mode = "circular"

[backdrop]
# Directory holding background.png / background1.png / ... (omit for the executable's directory)
# directory = "/home/me/Pictures/wallring"
prefix = "background"
"#
        .to_string()
    }

    /// Merge CLI arguments into config (CLI takes priority)
    pub fn merge_args(&mut self, args: &crate::Args) {
        if let Some(mode) = args.mode {
            self.display.mode = mode;
        }
        if let Some(width) = args.width {
            self.display.width = width;
        }
        if let Some(height) = args.height {
            self.display.height = height;
        }
        if let Some(ref colors) = args.colors {
            match colors.parse() {
                Ok(scheme) => self.display.color_scheme = scheme,
                Err(e) => tracing::warn!("{}, keeping {}", e, self.display.color_scheme.name()),
            }
        }
        if args.no_clock {
            self.display.show_clock = false;
        }

        if let Some(ref device) = args.device {
            self.audio.device = Some(device.clone());
        }
        if let Some(rate) = args.sample_rate {
            self.audio.sample_rate = rate;
        }

        if let Some(seed) = args.seed {
            self.engine.seed = Some(seed);
        }
        if let Some(shape) = args.shape {
            self.engine.initial_mode = Some(shape);
        }

        if let Some(ref dir) = args.backdrop_dir {
            self.backdrop.directory = Some(dir.clone());
        }
    }
}
