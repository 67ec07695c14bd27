//! Mock input source for tests
//!
//! Lets tests inject synthetic [`RawInputEvent`]s without OS hooks.

use std::sync::mpsc::{self, Sender};
use std::sync::Mutex;

use super::{CaptureError, InputSource, RawInputEvent};

/// A scriptable [`InputSource`]
#[derive(Default)]
pub struct MockInputSource {
    sender: Mutex<Option<Sender<RawInputEvent>>>,
}

impl MockInputSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inject a synthetic event, as if captured from hardware
    ///
    /// Events injected before `start()` or after `stop()` are discarded.
    pub fn inject(&self, event: RawInputEvent) {
        let guard = self.sender.lock().expect("lock poisoned");
        if let Some(sender) = guard.as_ref() {
            let _ = sender.send(event);
        }
    }
}

impl InputSource for MockInputSource {
    fn start(&self) -> Result<mpsc::Receiver<RawInputEvent>, CaptureError> {
        let (tx, rx) = mpsc::channel();
        let mut guard = self.sender.lock().expect("lock poisoned");
        if guard.is_some() {
            return Err(CaptureError::AlreadyStarted);
        }
        *guard = Some(tx);
        Ok(rx)
    }

    fn stop(&self) {
        // Dropping the sender closes the channel
        *self.sender.lock().expect("lock poisoned") = None;
    }
}
