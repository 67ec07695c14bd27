//! Keep-alive driver
//!
//! The strip controller blanks itself after a stretch with no activity
//! commands. When the stay-on feature is enabled, this driver resets that
//! timer by re-sending the pointer-activity command on a fixed period;
//! there is no dedicated keep-alive command on the wire.

use std::sync::Arc;
use std::time::Duration;

use strip_bridge::{BridgeHandle, Feature, RuntimeConfig};
use strip_protocol::Command;
use tokio::time::{interval, MissedTickBehavior};

/// Keep-alive cadence
pub const KEEP_ALIVE_PERIOD: Duration = Duration::from_secs(4);

/// How long the controller waits before blanking the strip
///
/// Inferred from firmware behavior, not a published contract;
/// [`KEEP_ALIVE_PERIOD`] keeps a one-second margin under it.
pub const DEVICE_IDLE_TIMEOUT: Duration = Duration::from_secs(5);

/// Periodic keep-alive task
///
/// Ticks forever; each tick submits one `M` when stay-on is enabled and
/// the link is up. A down link is skipped rather than queued, since the
/// reconnect handshake restores the strip state anyway.
pub async fn run_keep_alive(config: Arc<RuntimeConfig>, bridge: BridgeHandle) {
    let mut ticks = interval(KEEP_ALIVE_PERIOD);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticks.tick().await;
        if config.enabled(Feature::StayOn) && bridge.is_link_up() {
            bridge.submit(Command::KeepAlive);
        }
    }
}
