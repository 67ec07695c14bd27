//! Integration tests for the bridge actor
//!
//! These drive the actor with an in-memory link instead of hardware and
//! verify the delivery contract: the color handshake opens every
//! connection, commands are dropped (not queued) while the link is down,
//! and a failed write silences the wire until a reconnect succeeds.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use strip_bridge::{
    channel, connect_link, run_bridge, BridgeError, BridgeSettings, LinkIo, LinkOpener,
    PortSelection, RuntimeConfig,
};
use strip_protocol::{Command, Rgb};

/// State shared between a test, its opener, and every link it opens
#[derive(Clone, Default)]
struct Wire {
    lines: Arc<Mutex<Vec<String>>>,
    fail_writes: Arc<AtomicBool>,
    /// What `locate()` reports
    located: Arc<Mutex<Option<String>>>,
    /// Ports `open()` accepts
    openable: Arc<Mutex<Vec<String>>>,
}

impl Wire {
    fn new(port: &str) -> Self {
        let wire = Wire::default();
        wire.set_located(Some(port));
        wire.set_openable(&[port]);
        wire
    }

    fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }

    fn set_located(&self, port: Option<&str>) {
        *self.located.lock().unwrap() = port.map(str::to_string);
    }

    fn set_openable(&self, ports: &[&str]) {
        *self.openable.lock().unwrap() = ports.iter().map(|p| p.to_string()).collect();
    }

    fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

struct FakeLink {
    wire: Wire,
    port: String,
}

impl LinkIo for FakeLink {
    async fn write_line(&mut self, line: &str) -> Result<(), BridgeError> {
        if self.wire.fail_writes.load(Ordering::SeqCst) {
            return Err(BridgeError::WriteFailed(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "device removed",
            )));
        }
        self.wire.lines.lock().unwrap().push(line.to_string());
        Ok(())
    }

    fn port_name(&self) -> &str {
        &self.port
    }
}

struct FakeOpener {
    wire: Wire,
}

impl LinkOpener for FakeOpener {
    type Link = FakeLink;

    fn locate(&mut self) -> Option<String> {
        self.wire.located.lock().unwrap().clone()
    }

    async fn open(&mut self, port: &str, _baud: u32) -> Result<FakeLink, BridgeError> {
        if !self.wire.openable.lock().unwrap().iter().any(|p| p == port) {
            return Err(BridgeError::ConnectFailed {
                port: port.to_string(),
                reason: "port busy".to_string(),
            });
        }
        Ok(FakeLink {
            wire: self.wire.clone(),
            port: port.to_string(),
        })
    }
}

fn settings() -> BridgeSettings {
    BridgeSettings {
        port: PortSelection::Auto,
        reconnect_interval: Duration::from_secs(3),
        ..Default::default()
    }
}

/// Let the actor drain its channel (paused clock advances through timers)
async fn settle() {
    tokio::time::sleep(Duration::from_millis(10)).await;
}

#[tokio::test(start_paused = true)]
async fn handshake_is_first_line_on_connect() {
    let wire = Wire::new("FAKE0");
    let mut opener = FakeOpener { wire: wire.clone() };
    let config = Arc::new(RuntimeConfig::new(Rgb::new(255, 20, 147)));

    let link = connect_link(&mut opener, &settings(), &config)
        .await
        .expect("connect should succeed");

    assert_eq!(link.port_name(), "FAKE0");
    assert_eq!(wire.lines(), vec!["C,255,20,147"]);
}

#[tokio::test(start_paused = true)]
async fn submits_flow_after_handshake() {
    let wire = Wire::new("FAKE0");
    let mut opener = FakeOpener { wire: wire.clone() };
    let config = Arc::new(RuntimeConfig::default());
    let (handle, rx) = channel(16);

    let link = connect_link(&mut opener, &settings(), &config).await.unwrap();
    tokio::spawn(run_bridge(
        opener,
        Some(link),
        settings(),
        Arc::clone(&config),
        rx,
        handle.link_flag(),
    ));

    settle().await;
    assert!(handle.is_link_up());

    handle.submit(Command::Move);
    handle.submit(Command::KeyBackspace);
    settle().await;

    assert_eq!(wire.lines(), vec!["C,255,0,0", "M", "B"]);
}

#[tokio::test(start_paused = true)]
async fn write_failure_silences_wire_until_reconnect() {
    let wire = Wire::new("FAKE0");
    let mut opener = FakeOpener { wire: wire.clone() };
    let config = Arc::new(RuntimeConfig::default());
    let (handle, rx) = channel(16);

    let link = connect_link(&mut opener, &settings(), &config).await.unwrap();
    tokio::spawn(run_bridge(
        opener,
        Some(link),
        settings(),
        Arc::clone(&config),
        rx,
        handle.link_flag(),
    ));

    handle.submit(Command::Move);
    settle().await;

    // Device yanked: the in-flight write fails and reconnects find nothing
    wire.set_fail_writes(true);
    wire.set_located(None);
    wire.set_openable(&[]);

    handle.submit(Command::KeyGeneric);
    settle().await;
    assert!(!handle.is_link_up());

    // Everything submitted while down is dropped, not queued
    handle.submit(Command::KeySpace);
    handle.submit(Command::AudioLevel(7));
    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(wire.lines(), vec!["C,255,0,0", "M"]);

    // Device returns: the next reconnect tick restores the link and the
    // handshake precedes any new traffic
    wire.set_fail_writes(false);
    wire.set_located(Some("FAKE0"));
    wire.set_openable(&["FAKE0"]);
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert!(handle.is_link_up());

    handle.submit(Command::Move);
    settle().await;

    assert_eq!(
        wire.lines(),
        vec!["C,255,0,0", "M", "C,255,0,0", "M"]
    );
}

#[tokio::test(start_paused = true)]
async fn starts_disconnected_and_recovers() {
    let wire = Wire::default();
    let opener = FakeOpener { wire: wire.clone() };
    let config = Arc::new(RuntimeConfig::default());
    let (handle, rx) = channel(16);

    // Tray variant: no device at startup, actor begins with no link
    tokio::spawn(run_bridge(
        opener,
        None,
        settings(),
        Arc::clone(&config),
        rx,
        handle.link_flag(),
    ));

    handle.submit(Command::Move);
    tokio::time::sleep(Duration::from_secs(10)).await;
    assert!(!handle.is_link_up());
    assert!(wire.lines().is_empty());

    wire.set_located(Some("FAKE0"));
    wire.set_openable(&["FAKE0"]);
    tokio::time::sleep(Duration::from_secs(5)).await;

    assert!(handle.is_link_up());
    assert_eq!(wire.lines(), vec!["C,255,0,0"]);
}

#[tokio::test(start_paused = true)]
async fn explicit_port_falls_back_to_discovery_once() {
    let wire = Wire::default();
    wire.set_located(Some("COM9"));
    wire.set_openable(&["COM9"]);
    let mut opener = FakeOpener { wire: wire.clone() };
    let config = Arc::new(RuntimeConfig::default());

    let settings = BridgeSettings {
        port: PortSelection::Explicit("COM3".to_string()),
        ..settings()
    };

    let link = connect_link(&mut opener, &settings, &config)
        .await
        .expect("fallback discovery should connect");

    assert_eq!(link.port_name(), "COM9");
    assert_eq!(wire.lines(), vec!["C,255,0,0"]);
}

#[tokio::test(start_paused = true)]
async fn discovery_failure_is_reported_not_panicked() {
    let wire = Wire::default();
    let mut opener = FakeOpener { wire };
    let config = Arc::new(RuntimeConfig::default());

    let result = connect_link(&mut opener, &settings(), &config).await;
    assert!(matches!(result, Err(BridgeError::NoPortFound)));
}

#[tokio::test(start_paused = true)]
async fn shutdown_stops_the_actor() {
    let wire = Wire::new("FAKE0");
    let mut opener = FakeOpener { wire: wire.clone() };
    let config = Arc::new(RuntimeConfig::default());
    let (handle, rx) = channel(16);

    let link = connect_link(&mut opener, &settings(), &config).await.unwrap();
    let actor = tokio::spawn(run_bridge(
        opener,
        Some(link),
        settings(),
        Arc::clone(&config),
        rx,
        handle.link_flag(),
    ));

    handle.shutdown().await;
    actor.await.expect("actor should exit cleanly");
    assert!(!handle.is_link_up());
}
