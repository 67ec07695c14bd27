//! End-to-end source pipeline tests
//!
//! Drive the whole input path (mock capture, router thread, consumer
//! tasks) and observe what arrives at the bridge channel, without OS
//! hooks or a serial port.

use std::sync::Arc;
use std::time::Duration;

use strip_bridge::{BridgeRequest, Feature, RuntimeConfig};
use strip_sources::input::mock::MockInputSource;
use strip_sources::input::EVENT_BUFFER;
use strip_sources::{
    run_key_source, run_pointer_source, spawn_router, InputSource, KeyPress, RawInputEvent,
};
use tokio::sync::mpsc;

struct Pipeline {
    source: MockInputSource,
    config: Arc<RuntimeConfig>,
    bridge_rx: mpsc::Receiver<BridgeRequest>,
}

fn pipeline() -> Pipeline {
    let source = MockInputSource::new();
    let raw_rx = source.start().expect("mock start");

    let (pointer_tx, pointer_rx) = mpsc::channel(EVENT_BUFFER);
    let (key_tx, key_rx) = mpsc::channel(EVENT_BUFFER);
    spawn_router(raw_rx, pointer_tx, key_tx).expect("spawn router");

    let config = Arc::new(RuntimeConfig::default());
    let (bridge, bridge_rx) = strip_bridge::channel(64);

    tokio::spawn(run_pointer_source(
        pointer_rx,
        Arc::clone(&config),
        bridge.clone(),
    ));
    tokio::spawn(run_key_source(key_rx, Arc::clone(&config), bridge));

    Pipeline {
        source,
        config,
        bridge_rx,
    }
}

async fn next_line(rx: &mut mpsc::Receiver<BridgeRequest>) -> String {
    match rx.recv().await.expect("bridge channel open") {
        BridgeRequest::Submit(command) => command.encode(),
        other => panic!("unexpected request: {:?}", other),
    }
}

#[tokio::test(start_paused = true)]
async fn pointer_movement_reaches_the_bridge() {
    let mut p = pipeline();

    // First sample primes the filter, second is real movement
    p.source.inject(RawInputEvent::PointerMove { x: 100, y: 100 });
    p.source.inject(RawInputEvent::PointerMove { x: 200, y: 200 });

    assert_eq!(next_line(&mut p.bridge_rx).await, "M");
    assert!(p.config.pointer_active());
}

#[tokio::test(start_paused = true)]
async fn key_press_reaches_the_bridge_and_clears_indicator() {
    let mut p = pipeline();

    p.source.inject(RawInputEvent::PointerMove { x: 0, y: 0 });
    p.source.inject(RawInputEvent::PointerMove { x: 50, y: 0 });
    assert_eq!(next_line(&mut p.bridge_rx).await, "M");

    p.source.inject(RawInputEvent::Key {
        key: KeyPress::Backspace,
    });
    assert_eq!(next_line(&mut p.bridge_rx).await, "B");
    assert!(!p.config.pointer_active());
}

#[tokio::test(start_paused = true)]
async fn mouse_gate_off_stops_pointer_commands_but_not_keys() {
    let mut p = pipeline();
    p.config.set_enabled(Feature::Mouse, false);

    p.source.inject(RawInputEvent::PointerMove { x: 0, y: 0 });
    p.source.inject(RawInputEvent::PointerMove { x: 300, y: 300 });
    p.source.inject(RawInputEvent::Key {
        key: KeyPress::Space,
    });

    // The only command out of the pipeline is the key press
    assert_eq!(next_line(&mut p.bridge_rx).await, "S");

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(p.bridge_rx.try_recv().is_err());
}
