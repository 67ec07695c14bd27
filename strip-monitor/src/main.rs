//! Striplink Activity Monitor
//!
//! Watches host activity (pointer movement, key presses, audio output)
//! and mirrors it onto an LED strip over a USB-serial link. Each activity
//! source runs independently; a single bridge actor owns the serial port
//! and serializes every command onto the wire.
//!
//! Usage: `striplink [r g b]`. The optional positional values override
//! the configured base color before the connect handshake.

mod settings;

use std::sync::Arc;

use strip_bridge::{
    connect_link, run_bridge, BridgeSettings, Feature, PortSelection, RuntimeConfig, SerialOpener,
    REQUEST_BUFFER,
};
use strip_protocol::Rgb;
use strip_sources::audio::LEVEL_BUFFER;
use strip_sources::input::EVENT_BUFFER;
use strip_sources::{
    run_audio_source, run_keep_alive, run_key_source, run_pointer_source, AudioCapture,
    InputSource,
};
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Include all our crates in the default filter
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "striplink=info,strip_protocol=info,strip_detect=info,strip_bridge=info,strip_sources=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting striplink activity monitor");

    let mut settings = Settings::load();
    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Some(color) = color_override(&args) {
        info!("Using command line color {},{},{}", color.r, color.g, color.b);
        settings.color = color;
    }

    let config = Arc::new(RuntimeConfig::new(settings.color));
    config.set_enabled(Feature::Keyboard, settings.react_to_keyboard);
    config.set_enabled(Feature::Mouse, settings.react_to_mouse);
    config.set_enabled(Feature::Audio, settings.react_to_audio);
    config.set_enabled(Feature::StayOn, settings.stay_on);

    let bridge_settings = BridgeSettings {
        port: PortSelection::from_setting(&settings.port),
        baud: settings.baud_rate,
        ..Default::default()
    };

    // Initial connection, with the color handshake, happens before any
    // source starts producing. Whether failure is fatal is the one
    // difference between the headless and tray variants.
    let mut opener = SerialOpener::new();
    let link = match connect_link(&mut opener, &bridge_settings, &config).await {
        Ok(link) => Some(link),
        Err(e) if settings.run_without_device => {
            warn!("Starting disconnected ({}); will keep retrying", e);
            None
        }
        Err(e) => {
            error!("Could not reach the strip controller: {}", e);
            return Err(e.into());
        }
    };

    let (bridge, bridge_rx) = strip_bridge::channel(REQUEST_BUFFER);
    let bridge_task = tokio::spawn(run_bridge(
        opener,
        link,
        bridge_settings,
        Arc::clone(&config),
        bridge_rx,
        bridge.link_flag(),
    ));

    let (pointer_tx, pointer_rx) = mpsc::channel(EVENT_BUFFER);
    let (key_tx, key_rx) = mpsc::channel(EVENT_BUFFER);
    let (level_tx, level_rx) = mpsc::channel(LEVEL_BUFFER);

    tokio::spawn(run_pointer_source(
        pointer_rx,
        Arc::clone(&config),
        bridge.clone(),
    ));
    tokio::spawn(run_key_source(key_rx, Arc::clone(&config), bridge.clone()));
    tokio::spawn(run_audio_source(
        level_rx,
        Arc::clone(&config),
        bridge.clone(),
    ));
    let keepalive = tokio::spawn(run_keep_alive(Arc::clone(&config), bridge.clone()));

    let audio = match AudioCapture::start(level_tx) {
        Ok(capture) => Some(capture),
        Err(e) => {
            warn!("Could not start audio capture thread: {}", e);
            None
        }
    };

    let input = start_input_capture(pointer_tx, key_tx);

    info!("Monitoring started; Ctrl-C to stop");
    tokio::signal::ctrl_c().await?;
    info!("Shutting down");

    if let Some(input) = &input {
        input.stop();
    }
    if let Some(audio) = &audio {
        audio.stop();
    }
    keepalive.abort();
    bridge.shutdown().await;
    let _ = bridge_task.await;

    info!("Done");
    Ok(())
}

/// Parse the optional `r g b` positional color override
///
/// Anything other than three valid 0-255 integers is ignored and startup
/// continues with the configured color.
fn color_override(args: &[String]) -> Option<Rgb> {
    if args.len() != 3 {
        if !args.is_empty() {
            warn!("Expected three R G B arguments, got {}; ignoring", args.len());
        }
        return None;
    }

    match (
        args[0].parse::<u8>(),
        args[1].parse::<u8>(),
        args[2].parse::<u8>(),
    ) {
        (Ok(r), Ok(g), Ok(b)) => Some(Rgb::new(r, g, b)),
        _ => {
            warn!("Invalid RGB values {:?}; using configured color", args);
            None
        }
    }
}

/// Start global input capture where the platform supports it
///
/// Capture failure is not fatal: audio reaction and keep-alive still run,
/// matching how the monitor degrades elsewhere.
#[cfg(target_os = "windows")]
fn start_input_capture(
    pointer_tx: mpsc::Sender<(i32, i32)>,
    key_tx: mpsc::Sender<strip_sources::KeyPress>,
) -> Option<Box<dyn InputSource>> {
    use strip_sources::input::windows::WindowsInputCapture;
    use strip_sources::spawn_router;

    let capture = WindowsInputCapture::new();
    match capture.start() {
        Ok(raw_rx) => match spawn_router(raw_rx, pointer_tx, key_tx) {
            Ok(_) => Some(Box::new(capture)),
            Err(e) => {
                warn!("Could not start input router: {}", e);
                None
            }
        },
        Err(e) => {
            warn!("Input capture unavailable: {}", e);
            None
        }
    }
}

/// Pointer and keyboard reactions stay idle off-Windows; audio and the
/// keep-alive driver are unaffected.
#[cfg(not(target_os = "windows"))]
fn start_input_capture(
    _pointer_tx: mpsc::Sender<(i32, i32)>,
    _key_tx: mpsc::Sender<strip_sources::KeyPress>,
) -> Option<Box<dyn InputSource>> {
    warn!("Global input capture is only implemented on Windows");
    None
}
