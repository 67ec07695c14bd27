//! Keyboard activity source
//!
//! The classifier is stateless: backspace and space have their own wire
//! commands (the strip animates them differently), everything else is a
//! generic press. No throttle; key repeat is already far slower than the
//! serial line.

use std::sync::Arc;

use strip_bridge::{BridgeHandle, Feature, RuntimeConfig};
use strip_protocol::Command;
use tokio::sync::mpsc;
use tracing::debug;

use crate::input::KeyPress;

/// Map a key press to its wire command
pub fn classify(key: KeyPress) -> Command {
    match key {
        KeyPress::Backspace => Command::KeyBackspace,
        KeyPress::Space => Command::KeySpace,
        KeyPress::Other => Command::KeyGeneric,
    }
}

/// Consumer task for the key channel
///
/// Typing always clears the pointer-activity indicator, even when the
/// keyboard feature is gated off; only the emission is suppressed.
pub async fn run_key_source(
    mut keys: mpsc::Receiver<KeyPress>,
    config: Arc<RuntimeConfig>,
    bridge: BridgeHandle,
) {
    while let Some(key) = keys.recv().await {
        config.clear_pointer_active();

        if config.enabled(Feature::Keyboard) {
            bridge.submit(classify(key));
        }
    }

    debug!("Key source stopped");
}
