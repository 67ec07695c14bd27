//! Native input capture
//!
//! On Windows this installs low-level keyboard and mouse hooks
//! (WH_KEYBOARD_LL, WH_MOUSE_LL) on a dedicated Win32 message-loop
//! thread. Hook callbacks must return quickly or the OS removes them, so
//! all they do is push a [`RawInputEvent`] into a channel; the router
//! thread fans events out to the per-source consumer tasks.
//!
//! The [`InputSource`] trait is the seam that lets tests inject synthetic
//! events through [`mock::MockInputSource`] without OS hooks.

use std::sync::mpsc;

use tokio::sync::mpsc as tokio_mpsc;
use tracing::{debug, trace};

pub mod mock;

#[cfg(target_os = "windows")]
pub mod windows;

/// Per-source channel depth between the router and the consumer tasks
///
/// Pointer events flood under fast movement; overflow is dropped because
/// the filter only cares about the latest position anyway.
pub const EVENT_BUFFER: usize = 256;

/// A raw input event, as close to the OS hook as portability allows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawInputEvent {
    /// The pointer moved to an absolute screen position
    PointerMove { x: i32, y: i32 },
    /// A key was pressed down
    Key { key: KeyPress },
}

/// Key identity at the granularity the protocol distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPress {
    Backspace,
    Space,
    /// Any other key, including unclassifiable special keys
    Other,
}

/// Error type for input capture
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    /// Failed to install an OS hook
    #[error("failed to install input hook: {0}")]
    HookInstallFailed(String),

    /// Capture was already started once in this process
    #[error("input capture already started")]
    AlreadyStarted,

    /// No capture backend on this platform
    #[error("global input capture not supported on this platform")]
    UnsupportedPlatform,
}

/// Trait abstracting raw input event production
///
/// The production implementation uses Windows hooks; tests use
/// [`mock::MockInputSource`].
pub trait InputSource: Send {
    /// Start the source and return the receiver for captured events
    fn start(&self) -> Result<mpsc::Receiver<RawInputEvent>, CaptureError>;

    /// Stop the source and release OS resources
    fn stop(&self);
}

/// Fan captured events out to the pointer and key consumer channels
///
/// Runs on its own thread because the capture receiver is a blocking
/// std channel. Sends never block: a full consumer channel drops the
/// event, which for pointer movement is just coarser sampling.
pub fn spawn_router(
    raw_events: mpsc::Receiver<RawInputEvent>,
    pointer_tx: tokio_mpsc::Sender<(i32, i32)>,
    key_tx: tokio_mpsc::Sender<KeyPress>,
) -> std::io::Result<std::thread::JoinHandle<()>> {
    std::thread::Builder::new()
        .name("input-router".to_string())
        .spawn(move || {
            while let Ok(event) = raw_events.recv() {
                match event {
                    RawInputEvent::PointerMove { x, y } => {
                        let _ = pointer_tx.try_send((x, y));
                    }
                    RawInputEvent::Key { key } => {
                        if key_tx.try_send(key).is_err() {
                            trace!("Key consumer behind, dropping {:?}", key);
                        }
                    }
                }
            }
            debug!("Input router stopped");
        })
}
