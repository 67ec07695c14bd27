//! Error types for the bridge

use thiserror::Error;

/// Errors that can occur on the serial side of the monitor
#[derive(Debug, Error)]
pub enum BridgeError {
    /// No serial port found during auto-discovery
    #[error("no serial port found")]
    NoPortFound,

    /// Failed to open the serial port
    #[error("failed to open port {port}: {reason}")]
    ConnectFailed { port: String, reason: String },

    /// I/O error mid-write; the link is unusable afterwards
    #[error("write failed: {0}")]
    WriteFailed(#[from] std::io::Error),
}
