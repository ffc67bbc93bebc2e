use anyhow::{anyhow, Result};
use libpulse_binding as pulse;
use libpulse_simple_binding as psimple;
use pulse::sample::{Format, Spec};
use pulse::stream::Direction;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Instant;
use tracing::{debug, info, warn};

use super::{AudioFeed, CaptureError};
use crate::constants::animation::TICK_PERIOD;
use crate::constants::audio::{BYTES_PER_SAMPLE, FRAME_CAPACITY};

/// A source of audio blocks that pushes them into an [`AudioFeed`].
///
/// `start` acquires the device and begins delivery on a background thread.
/// `stop` halts delivery and releases the device; calling it again, or on a
/// source that never started, does nothing.
pub trait AudioSource: Send {
    fn start(&mut self, feed: AudioFeed) -> Result<(), CaptureError>;
    fn stop(&mut self);
}

/// Loopback capture of the default output through PulseAudio/PipeWire
pub struct PulseCapture {
    device: Option<String>,
    sample_rate: u32,
    block_size: usize,
    stop_flag: Arc<AtomicBool>,
    capture_thread: Option<thread::JoinHandle<()>>,
}

impl PulseCapture {
    /// `device` is a sink name (its monitor is recorded) or a full
    /// `*.monitor` source name. `None` follows the default sink.
    pub fn new(device: Option<String>, sample_rate: u32, block_size: usize) -> Self {
        Self {
            device,
            sample_rate,
            block_size: block_size.clamp(1, FRAME_CAPACITY),
            stop_flag: Arc::new(AtomicBool::new(false)),
            capture_thread: None,
        }
    }

    fn resolve_source(&self) -> Option<String> {
        match &self.device {
            Some(name) if name.ends_with(".monitor") => Some(name.clone()),
            Some(sink) => {
                let monitor = format!("{}.monitor", sink);
                info!("Using explicit sink monitor: {}", monitor);
                Some(monitor)
            }
            None => find_monitor_source(),
        }
    }

    fn connect(&self, source: Option<&str>) -> Result<psimple::Simple, CaptureError> {
        // Mono so the server does the downmix and every sample is one frame
        let spec = Spec {
            format: Format::F32le,
            channels: 1,
            rate: self.sample_rate,
        };
        if !spec.is_valid() {
            return Err(CaptureError::InvalidSpec);
        }

        psimple::Simple::new(
            None,                       // Default server
            "wallring",                 // Application name
            Direction::Record,          // Recording stream
            source,                     // Monitor source (None = default)
            "audio-reactive-wallpaper", // Stream description
            &spec,
            None, // Default channel map
            None, // Default buffering attributes
        )
        .map_err(|e| CaptureError::Connect(format!("{:?}", e)))
    }

    fn capture_loop(pulse: psimple::Simple, block_size: usize, mut feed: AudioFeed, stop_flag: Arc<AtomicBool>) {
        let mut buffer = vec![0u8; block_size * BYTES_PER_SAMPLE];

        while !stop_flag.load(Ordering::Relaxed) {
            if let Err(e) = pulse.read(&mut buffer) {
                warn!("PulseAudio read error: {:?}", e);
                thread::sleep(TICK_PERIOD);
                continue;
            }

            if let Err(e) = feed.deliver(&buffer, buffer.len(), Instant::now()) {
                debug!("Abandoned audio block: {}", e);
            }
        }

        debug!("Stop flag set, ending capture loop");
        // `pulse` drops here, after the loop has stopped reading
    }
}

impl AudioSource for PulseCapture {
    fn start(&mut self, feed: AudioFeed) -> Result<(), CaptureError> {
        if self.capture_thread.is_some() {
            return Err(CaptureError::AlreadyRunning);
        }

        let source = self.resolve_source();
        info!("Using audio source: {}", source.as_deref().unwrap_or("default"));
        let pulse = self.connect(source.as_deref())?;
        info!(
            "Connected to PulseAudio at {} Hz, {} samples per block",
            self.sample_rate, self.block_size
        );

        self.stop_flag = Arc::new(AtomicBool::new(false));
        let stop_flag = self.stop_flag.clone();
        let block_size = self.block_size;

        let handle = thread::Builder::new()
            .name("wallring-capture".into())
            .spawn(move || Self::capture_loop(pulse, block_size, feed, stop_flag))?;
        self.capture_thread = Some(handle);
        Ok(())
    }

    fn stop(&mut self) {
        self.stop_flag.store(true, Ordering::Relaxed);
        if let Some(handle) = self.capture_thread.take() {
            if handle.join().is_err() {
                warn!("Audio capture thread panicked");
            }
            info!("Audio capture stopped");
        }
    }
}

impl Drop for PulseCapture {
    fn drop(&mut self) {
        self.stop();
    }
}

/// List available PulseAudio/PipeWire sources.
///
/// Returns a list of `(name, state)` tuples parsed from `pactl list short sources`.
pub fn list_sources() -> Result<Vec<(String, String)>> {
    let output = std::process::Command::new("pactl")
        .args(["list", "short", "sources"])
        .output()
        .map_err(|e| anyhow!("Failed to run pactl: {}", e))?;

    if !output.status.success() {
        return Err(anyhow!("pactl list short sources failed"));
    }

    let text = String::from_utf8_lossy(&output.stdout);
    Ok(parse_sources(&text))
}

fn parse_sources(text: &str) -> Vec<(String, String)> {
    text.lines()
        .filter_map(|line| {
            // Format: <id>\t<name>\t<module>\t<sample_spec>\t<state>
            let cols: Vec<&str> = line.split('\t').collect();
            (cols.len() >= 5).then(|| (cols[1].to_string(), cols[4].to_string()))
        })
        .collect()
}

/// Monitor source of the default sink, so we capture whatever the user is
/// listening to.
fn find_monitor_source() -> Option<String> {
    if let Ok(output) = std::process::Command::new("pactl")
        .args(["get-default-sink"])
        .output()
    {
        if output.status.success() {
            let sink_name = String::from_utf8_lossy(&output.stdout).trim().to_string();
            if !sink_name.is_empty() {
                let monitor = format!("{}.monitor", sink_name);
                info!("Using default sink monitor: {}", monitor);
                return Some(monitor);
            }
        }
    }

    warn!("Could not determine default sink, using PulseAudio default source");
    None
}
