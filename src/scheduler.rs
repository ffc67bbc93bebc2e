//! The 16 ms tick loop and orderly shutdown.

use anyhow::Result;
use std::time::Instant;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use crate::audio::{snapshot_channel, AudioFeed, AudioSource, AudioTap, PulseCapture};
use crate::backdrop;
use crate::config::Config;
use crate::constants::animation::TICK_PERIOD;
use crate::display::{DisplayMode, HeadlessSurface, Surface, SurfaceEvent, TerminalSurface};
use crate::engine::Engine;

/// Owns the shutdown signal and the capture source.
///
/// Stopping signals the tick loop first, then stops and drops the capture.
pub struct Lifecycle {
    shutdown: watch::Sender<bool>,
    capture: Option<Box<dyn AudioSource>>,
    stopped: bool,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl Lifecycle {
    pub fn new() -> Self {
        let (shutdown, _) = watch::channel(false);
        Self {
            shutdown,
            capture: None,
            stopped: false,
        }
    }

    pub fn attach(&mut self, capture: Box<dyn AudioSource>) {
        self.capture = Some(capture);
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.shutdown.subscribe()
    }

    /// Handle for other tasks (Ctrl-C) to request shutdown
    pub fn trigger(&self) -> watch::Sender<bool> {
        self.shutdown.clone()
    }

    pub fn stop(&mut self) {
        if self.stopped {
            return;
        }
        self.stopped = true;

        self.shutdown.send_replace(true);
        if let Some(mut capture) = self.capture.take() {
            capture.stop();
        }
        info!("Stopped");
    }
}

impl Drop for Lifecycle {
    fn drop(&mut self) {
        self.stop();
    }
}

pub async fn run(config: Config) -> Result<()> {
    let started = Instant::now();

    let mut engine = Engine::seeded(
        (config.display.width, config.display.height),
        config.engine.seed,
    );
    if let Some(mode) = config.engine.initial_mode {
        engine = engine.with_mode(mode);
    }

    if let Some(directory) = config.backdrop.resolve_directory() {
        if let Some(image) = backdrop::pick(&directory, &config.backdrop.prefix, &mut rand::rng()) {
            info!("Drifting over {}", image.path.display());
            engine.set_backdrop_size(image.width, image.height);
        }
    }

    let mut lifecycle = Lifecycle::new();
    let (feed, tap) = snapshot_channel(started);

    // Capture first, so its warnings land before the terminal is taken over
    let capture = PulseCapture::new(
        config.audio.device.clone(),
        config.audio.sample_rate,
        config.audio.block_size,
    );
    start_capture(&mut lifecycle, Box::new(capture), feed);

    let mut surface: Box<dyn Surface> = match config.display.mode {
        DisplayMode::Terminal => Box::new(TerminalSurface::new(&config.display)?),
        DisplayMode::Headless => Box::new(HeadlessSurface::new()),
    };

    let trigger = lifecycle.trigger();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        trigger.send_replace(true);
    });

    info!("Running in {:?} mode, {} shape", config.display.mode, engine.mode());
    let result = drive(&mut engine, &tap, surface.as_mut(), lifecycle.subscribe()).await;
    lifecycle.stop();

    // Leave the alternate screen before anything else is printed
    drop(surface);
    result.map(|_| ())
}

/// Start `capture` and hand it to the lifecycle either way. A source that
/// fails to start leaves the engine running silent.
pub fn start_capture(lifecycle: &mut Lifecycle, mut capture: Box<dyn AudioSource>, feed: AudioFeed) -> bool {
    let started = match capture.start(feed) {
        Ok(()) => true,
        Err(e) => {
            warn!("Audio capture unavailable ({}), running silent", e);
            false
        }
    };
    lifecycle.attach(capture);
    started
}

/// Tick until a shutdown signal, a quit request or a surface error.
/// Returns the number of frames presented.
pub async fn drive(
    engine: &mut Engine,
    tap: &AudioTap,
    surface: &mut dyn Surface,
    mut shutdown: watch::Receiver<bool>,
) -> Result<u64> {
    let mut interval = tokio::time::interval(TICK_PERIOD);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut frames = 0;

    loop {
        tokio::select! {
            _ = interval.tick() => {}
            _ = shutdown.changed() => {}
        }
        if *shutdown.borrow() {
            break;
        }

        let snapshot = tap.latest();
        let output = engine.tick(&snapshot, Instant::now());
        frames += 1;

        match surface.present(&output)? {
            SurfaceEvent::Continue => {}
            SurfaceEvent::NextMode => {
                engine.cycle_mode();
            }
            SurfaceEvent::Quit => break,
        }
    }

    Ok(frames)
}
