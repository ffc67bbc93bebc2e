use anyhow::Result;
use clap::{CommandFactory, Parser};
use std::path::PathBuf;
use tracing::info;

mod audio;
mod backdrop;
mod color;
mod config;
mod constants;
mod display;
mod engine;
mod scheduler;

use config::Config;
use display::DisplayMode;
use engine::VisualizationMode;

#[derive(Parser, Debug)]
#[command(name = "wallring")]
#[command(author, version, about = "Audio-reactive animated wallpaper")]
struct Args {
    /// Display mode: terminal or headless
    #[arg(short, long)]
    mode: Option<DisplayMode>,

    /// Config file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Sink or monitor source to capture (default: the default sink's monitor)
    #[arg(short, long)]
    device: Option<String>,

    /// Capture sample rate in Hz
    #[arg(long)]
    sample_rate: Option<u32>,

    /// Random seed for a reproducible animation
    #[arg(long)]
    seed: Option<u64>,

    /// Starting shape
    #[arg(long)]
    shape: Option<VisualizationMode>,

    /// Drawing area width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Drawing area height in pixels
    #[arg(long)]
    height: Option<u32>,

    /// Color scheme: white, spectrum, ocean, fire
    #[arg(long)]
    colors: Option<String>,

    /// Directory holding background*.png
    #[arg(long)]
    backdrop_dir: Option<PathBuf>,

    /// Hide the clock
    #[arg(long)]
    no_clock: bool,

    /// Write a default config file and exit
    #[arg(long)]
    init_config: bool,

    /// List available audio sources and exit
    #[arg(long)]
    list_sources: bool,

    /// Print shell completions and exit
    #[arg(long, value_name = "SHELL")]
    completions: Option<clap_complete::Shell>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging; stdout belongs to the terminal surface
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("wallring=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Some(shell) = args.completions {
        clap_complete::generate(shell, &mut Args::command(), "wallring", &mut std::io::stdout());
        return Ok(());
    }

    if args.init_config {
        let path = Config::init_default_config()?;
        println!("Wrote default config to {}", path.display());
        return Ok(());
    }

    if args.list_sources {
        for (name, description) in audio::list_sources()? {
            println!("{}\t{}", name, description);
        }
        return Ok(());
    }

    // Explicit path must load; the default path falls back quietly
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::load_from_default_path().unwrap_or_default(),
    };
    config.merge_args(&args);

    info!("Starting Wallring in {:?} mode", config.display.mode);

    scheduler::run(config).await
}
