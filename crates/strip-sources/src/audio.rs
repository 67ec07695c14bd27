//! Audio activity source
//!
//! Capture runs on a dedicated thread because cpal streams are not Send;
//! the callback reduces each block to a single loudness level and pushes
//! it into a bounded channel. The consumer task applies the feature gate:
//! while audio reaction is on, every block becomes an `A,<level>` line
//! (including silence, the strip expects a steady stream), and the first
//! block after a toggle-off becomes one `A,0` so the visualization does
//! not freeze mid-bar.
//!
//! A capture device that cannot be opened disables audio for the rest of
//! the process lifetime. The monitor keeps running; the other sources do
//! not depend on this one.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use strip_bridge::{BridgeHandle, Feature, RuntimeConfig};
use strip_protocol::{level_from_samples, Command};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Capture sample rate
pub const AUDIO_SAMPLE_RATE: u32 = 44_100;

/// Samples per capture block; one level is emitted per block
pub const AUDIO_BLOCK_SIZE: u32 = 512;

/// Capture channel count; blocks are flattened before the RMS
pub const AUDIO_CHANNELS: u16 = 2;

/// Level channel depth between the capture callback and the consumer
pub const LEVEL_BUFFER: usize = 32;

/// Handle to the capture thread
pub struct AudioCapture {
    running: Arc<AtomicBool>,
}

impl AudioCapture {
    /// Start the capture thread, feeding one level per block into `levels`
    ///
    /// Failures are handled inside the thread: a missing or broken device
    /// logs a warning and the thread exits, leaving `levels` silent.
    pub fn start(levels: mpsc::Sender<u8>) -> std::io::Result<Self> {
        let running = Arc::new(AtomicBool::new(true));
        let thread_flag = Arc::clone(&running);

        std::thread::Builder::new()
            .name("audio-capture".to_string())
            .spawn(move || capture_thread(levels, thread_flag))?;

        Ok(Self { running })
    }

    /// Stop the capture thread and drop the stream
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }
}

fn capture_thread(levels: mpsc::Sender<u8>, running: Arc<AtomicBool>) {
    let host = cpal::default_host();
    let Some(device) = host.default_input_device() else {
        warn!("No audio capture device; audio visualization disabled");
        return;
    };

    let device_name = device.name().unwrap_or_else(|_| "unknown".to_string());
    let config = cpal::StreamConfig {
        channels: AUDIO_CHANNELS,
        sample_rate: cpal::SampleRate(AUDIO_SAMPLE_RATE),
        buffer_size: cpal::BufferSize::Fixed(AUDIO_BLOCK_SIZE),
    };

    let stream = match device.build_input_stream(
        &config,
        move |block: &[f32], _| {
            let level = level_from_samples(block);
            // Drop the block if the consumer is behind; the next one is
            // ~12 ms away
            let _ = levels.try_send(level);
        },
        |err| warn!("Audio stream error: {}", err),
        None,
    ) {
        Ok(stream) => stream,
        Err(e) => {
            warn!(
                "Failed to open audio capture on {} ({}); audio visualization disabled",
                device_name, e
            );
            return;
        }
    };

    if let Err(e) = stream.play() {
        warn!("Failed to start audio stream ({}); audio visualization disabled", e);
        return;
    }

    info!(
        "Audio capture running on {} ({} Hz, blocks of {})",
        device_name, AUDIO_SAMPLE_RATE, AUDIO_BLOCK_SIZE
    );

    // The stream delivers blocks on the driver's own thread; this one
    // only keeps the stream alive until shutdown.
    while running.load(Ordering::SeqCst) {
        std::thread::sleep(Duration::from_millis(200));
    }

    debug!("Audio capture stopped");
}

/// Gate deciding what a captured level becomes on the wire
///
/// Separated from the task loop so the toggle semantics are testable
/// without a capture device.
pub struct AudioGate {
    cleared: bool,
}

impl AudioGate {
    pub fn new() -> Self {
        // Starting "cleared" means a monitor that boots with audio
        // disabled sends nothing until the feature is first enabled
        Self { cleared: true }
    }

    /// Feed one captured level; returns the command to emit, if any
    pub fn on_block(&mut self, enabled: bool, level: u8) -> Option<Command> {
        if enabled {
            self.cleared = false;
            Some(Command::AudioLevel(level))
        } else if !self.cleared {
            self.cleared = true;
            Some(Command::AudioLevel(0))
        } else {
            None
        }
    }
}

impl Default for AudioGate {
    fn default() -> Self {
        Self::new()
    }
}

/// Consumer task for the level channel
pub async fn run_audio_source(
    mut levels: mpsc::Receiver<u8>,
    config: Arc<RuntimeConfig>,
    bridge: BridgeHandle,
) {
    let mut gate = AudioGate::new();

    while let Some(level) = levels.recv().await {
        if let Some(command) = gate.on_block(config.enabled(Feature::Audio), level) {
            bridge.submit(command);
        }
    }

    debug!("Audio source stopped");
}
