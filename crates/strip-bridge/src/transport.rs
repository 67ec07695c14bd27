//! Serial transport
//!
//! [`Transport`] wraps the async serial stream and exposes the one
//! operation the rest of the system needs: a whole-line write. Opening
//! includes the settle delay the controller board needs after the USB
//! open toggles DTR and resets it.
//!
//! The [`LinkIo`]/[`LinkOpener`] traits are the test seam: the bridge
//! actor is written against them so integration tests can drive it with
//! an in-memory link instead of hardware.

use std::future::Future;
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio_serial::{SerialPortBuilderExt, SerialStream};
use tracing::debug;

use crate::error::BridgeError;

/// Delay between acquiring the serial handle and the first write
///
/// The controller resets when the port opens; bytes sent during its
/// bootloader window are lost or misread.
pub const SETTLE_DELAY: Duration = Duration::from_secs(2);

/// A connected, writable line-oriented link
pub trait LinkIo: Send {
    /// Write one command line, appending the newline terminator
    fn write_line(&mut self, line: &str)
        -> impl Future<Output = Result<(), BridgeError>> + Send;

    /// Name of the underlying port (for logging)
    fn port_name(&self) -> &str;
}

/// Something that can resolve and open links
pub trait LinkOpener: Send {
    type Link: LinkIo;

    /// Resolve the auto-detected port, if any
    fn locate(&mut self) -> Option<String>;

    /// Open a link on a named port, settle delay included
    fn open(
        &mut self,
        port: &str,
        baud: u32,
    ) -> impl Future<Output = Result<Self::Link, BridgeError>> + Send;
}

/// The real serial connection to the strip controller
pub struct Transport {
    stream: SerialStream,
    port: String,
}

impl Transport {
    /// Open a port and wait out the controller's reset cycle
    pub async fn open(port: &str, baud: u32) -> Result<Self, BridgeError> {
        let stream = tokio_serial::new(port, baud)
            .timeout(Duration::from_millis(100))
            .open_native_async()
            .map_err(|e| BridgeError::ConnectFailed {
                port: port.to_string(),
                reason: e.to_string(),
            })?;

        debug!("Opened {}, settling for {:?}", port, SETTLE_DELAY);
        tokio::time::sleep(SETTLE_DELAY).await;

        Ok(Self {
            stream,
            port: port.to_string(),
        })
    }
}

impl LinkIo for Transport {
    async fn write_line(&mut self, line: &str) -> Result<(), BridgeError> {
        self.stream.write_all(line.as_bytes()).await?;
        self.stream.write_all(b"\n").await?;
        self.stream.flush().await?;
        Ok(())
    }

    fn port_name(&self) -> &str {
        &self.port
    }
}

/// Production [`LinkOpener`] backed by the scanner and tokio-serial
#[derive(Debug, Default)]
pub struct SerialOpener;

impl SerialOpener {
    pub fn new() -> Self {
        Self
    }
}

impl LinkOpener for SerialOpener {
    type Link = Transport;

    fn locate(&mut self) -> Option<String> {
        strip_detect::locate()
    }

    async fn open(&mut self, port: &str, baud: u32) -> Result<Transport, BridgeError> {
        Transport::open(port, baud).await
    }
}
