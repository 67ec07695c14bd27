//! Bridge actor
//!
//! The single owner of the serial link. Producers hold a [`BridgeHandle`]
//! and submit [`Command`]s through a bounded channel; this actor encodes
//! and writes them, drops them when the link is down, and runs the
//! reconnect policy. Because it is the only writer and the only
//! reconnector, line atomicity and "no concurrent reconnection attempts"
//! hold by construction.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use strip_protocol::Command;
use tokio::sync::mpsc;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, trace, warn};

use crate::error::BridgeError;
use crate::state::RuntimeConfig;
use crate::transport::{LinkIo, LinkOpener};

/// Wire baud rate the controller firmware is flashed for
pub const DEFAULT_BAUD: u32 = 115_200;

/// How often the actor retries while the link is down
pub const RECONNECT_INTERVAL: Duration = Duration::from_secs(3);

/// Submission channel depth; producers drop commands when it is full
/// rather than block their event threads
pub const REQUEST_BUFFER: usize = 64;

/// Which port to connect to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortSelection {
    /// Re-run discovery on every connection attempt
    Auto,
    /// A pinned port name (COM3, /dev/ttyUSB0, ...)
    Explicit(String),
}

impl PortSelection {
    /// Parse the settings-file form: the literal `AUTO` (any case) or an
    /// empty string means auto-discovery
    pub fn from_setting(value: &str) -> Self {
        if value.is_empty() || value.eq_ignore_ascii_case("auto") {
            PortSelection::Auto
        } else {
            PortSelection::Explicit(value.to_string())
        }
    }
}

/// Connection settings for the bridge actor
#[derive(Debug, Clone)]
pub struct BridgeSettings {
    pub port: PortSelection,
    pub baud: u32,
    pub reconnect_interval: Duration,
}

impl Default for BridgeSettings {
    fn default() -> Self {
        Self {
            port: PortSelection::Auto,
            baud: DEFAULT_BAUD,
            reconnect_interval: RECONNECT_INTERVAL,
        }
    }
}

/// Requests accepted by the bridge actor
#[derive(Debug)]
pub enum BridgeRequest {
    /// Encode and transmit a command (best effort)
    Submit(Command),
    /// Close the link and stop the actor
    Shutdown,
}

/// Producer-side handle to the bridge actor
#[derive(Debug, Clone)]
pub struct BridgeHandle {
    tx: mpsc::Sender<BridgeRequest>,
    link_up: Arc<AtomicBool>,
}

impl BridgeHandle {
    /// Submit a command without blocking
    ///
    /// A full channel or a stopped actor drops the command; delivery is
    /// best effort end to end, so producers never need the result.
    pub fn submit(&self, command: Command) {
        if let Err(e) = self.tx.try_send(BridgeRequest::Submit(command)) {
            trace!("Dropping command: {}", e);
        }
    }

    /// Whether the serial link is currently established
    pub fn is_link_up(&self) -> bool {
        self.link_up.load(Ordering::SeqCst)
    }

    /// Shared link-state flag, for wiring into the actor
    pub fn link_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.link_up)
    }

    /// Ask the actor to close the link and stop
    pub async fn shutdown(&self) {
        let _ = self.tx.send(BridgeRequest::Shutdown).await;
    }
}

/// Create a handle/receiver pair for one bridge actor
pub fn channel(buffer: usize) -> (BridgeHandle, mpsc::Receiver<BridgeRequest>) {
    let (tx, rx) = mpsc::channel(buffer);
    let handle = BridgeHandle {
        tx,
        link_up: Arc::new(AtomicBool::new(false)),
    };
    (handle, rx)
}

/// Resolve a port, open it, and perform the color handshake
///
/// The handshake line is written before this function returns, so the
/// first line of every connection is always `C,<r>,<g>,<b>`. An explicit
/// port that fails to open gets exactly one auto-discovery fallback
/// attempt before the error propagates.
pub async fn connect_link<O: LinkOpener>(
    opener: &mut O,
    settings: &BridgeSettings,
    config: &RuntimeConfig,
) -> Result<O::Link, BridgeError> {
    let port = match &settings.port {
        PortSelection::Auto => opener.locate().ok_or(BridgeError::NoPortFound)?,
        PortSelection::Explicit(port) => port.clone(),
    };

    let mut link = match opener.open(&port, settings.baud).await {
        Ok(link) => link,
        Err(e) => {
            let PortSelection::Explicit(configured) = &settings.port else {
                return Err(e);
            };
            let fallback = opener.locate().filter(|found| found != configured);
            let Some(fallback) = fallback else {
                return Err(e);
            };
            warn!(
                "Failed to open {} ({}); trying auto-detected {}",
                configured, e, fallback
            );
            opener.open(&fallback, settings.baud).await?
        }
    };

    let color = config.color();
    link.write_line(&Command::SetColor(color).encode()).await?;
    info!(
        "Connected to {} (color {},{},{})",
        link.port_name(),
        color.r,
        color.g,
        color.b
    );
    Ok(link)
}

/// Run the bridge actor until shutdown
///
/// `link` is the result of the caller's initial [`connect_link`] attempt;
/// `None` starts the actor disconnected, leaving the reconnect ticks to
/// establish the link.
pub async fn run_bridge<O: LinkOpener>(
    mut opener: O,
    mut link: Option<O::Link>,
    settings: BridgeSettings,
    config: Arc<RuntimeConfig>,
    mut rx: mpsc::Receiver<BridgeRequest>,
    link_up: Arc<AtomicBool>,
) {
    link_up.store(link.is_some(), Ordering::SeqCst);

    let mut reconnect = interval(settings.reconnect_interval);
    reconnect.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            request = rx.recv() => {
                match request {
                    Some(BridgeRequest::Submit(command)) => {
                        let Some(active) = link.as_mut() else {
                            trace!("Link down, dropping {:?}", command);
                            continue;
                        };
                        if let Err(e) = active.write_line(&command.encode()).await {
                            warn!(
                                "Write failed on {} ({}); dropping link",
                                active.port_name(),
                                e
                            );
                            link = None;
                            link_up.store(false, Ordering::SeqCst);
                        }
                    }
                    Some(BridgeRequest::Shutdown) | None => break,
                }
            }

            _ = reconnect.tick() => {
                if link.is_none() {
                    match connect_link(&mut opener, &settings, &config).await {
                        Ok(reopened) => {
                            link = Some(reopened);
                            link_up.store(true, Ordering::SeqCst);
                        }
                        Err(e) => debug!("Reconnect attempt failed: {}", e),
                    }
                }
            }
        }
    }

    link_up.store(false, Ordering::SeqCst);
    info!("Bridge stopped");
}
