//! Pointer activity source
//!
//! Raw positions arrive at whatever rate the OS reports them; the filter
//! reduces that to at most one `M` every 50 ms, and only for movement a
//! human actually made. Sensor jitter of a pixel or two never counts, and
//! crucially never resets the throttle window either.

use std::sync::Arc;
use std::time::Duration;

use strip_bridge::{BridgeHandle, Feature, RuntimeConfig};
use strip_protocol::Command;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::debug;

/// Displacement at or below this many pixels on both axes is jitter
pub const JITTER_THRESHOLD_PX: i32 = 2;

/// Minimum spacing between emitted Move commands
pub const MOVE_THROTTLE: Duration = Duration::from_millis(50);

enum FilterState {
    /// No sample seen yet
    Uninitialized,
    /// Have a reference position and possibly a last emission time
    Tracking {
        last_pos: (i32, i32),
        last_emit_ms: Option<u64>,
    },
}

/// Jitter + rate filter over raw pointer samples
///
/// Pure over logical time so tests control the clock. State only advances
/// on emission: a sub-threshold or throttled sample leaves both the
/// reference position and the throttle window untouched, so slow drift
/// still accumulates into a real movement.
pub struct PointerFilter {
    state: FilterState,
}

impl PointerFilter {
    pub fn new() -> Self {
        Self {
            state: FilterState::Uninitialized,
        }
    }

    /// Feed one raw sample; returns true when a Move should be emitted
    pub fn observe(&mut self, x: i32, y: i32, now_ms: u64) -> bool {
        match &mut self.state {
            FilterState::Uninitialized => {
                self.state = FilterState::Tracking {
                    last_pos: (x, y),
                    last_emit_ms: None,
                };
                false
            }
            FilterState::Tracking {
                last_pos,
                last_emit_ms,
            } => {
                let moved = (x - last_pos.0).abs() > JITTER_THRESHOLD_PX
                    || (y - last_pos.1).abs() > JITTER_THRESHOLD_PX;
                let due = last_emit_ms
                    .map_or(true, |last| now_ms.saturating_sub(last) > MOVE_THROTTLE.as_millis() as u64);

                if moved && due {
                    *last_pos = (x, y);
                    *last_emit_ms = Some(now_ms);
                    true
                } else {
                    false
                }
            }
        }
    }
}

impl Default for PointerFilter {
    fn default() -> Self {
        Self::new()
    }
}

/// Consumer task for the pointer channel
///
/// Samples are drained even while the mouse feature is off so the
/// capture machinery never backs up; they just stop producing commands.
pub async fn run_pointer_source(
    mut samples: mpsc::Receiver<(i32, i32)>,
    config: Arc<RuntimeConfig>,
    bridge: BridgeHandle,
) {
    let started = Instant::now();
    let mut filter = PointerFilter::new();

    while let Some((x, y)) = samples.recv().await {
        let now_ms = started.elapsed().as_millis() as u64;
        let emit = filter.observe(x, y, now_ms);

        if !config.enabled(Feature::Mouse) {
            continue;
        }
        if emit {
            config.set_pointer_active();
            bridge.submit(Command::Move);
        }
    }

    debug!("Pointer source stopped");
}
