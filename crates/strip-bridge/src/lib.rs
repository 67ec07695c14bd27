//! Strip Bridge
//!
//! This crate owns the serial side of the monitor: the [`Transport`] that
//! wraps the USB-serial connection, the shared [`RuntimeConfig`] feature
//! flags, and the bridge actor that serializes every outbound command onto
//! the wire.
//!
//! # Architecture
//!
//! The bridge is a single-writer actor. Every producer (pointer, keyboard,
//! audio, keep-alive) holds a [`BridgeHandle`] and submits commands through
//! a bounded channel; the actor encodes and writes them one line at a time,
//! so no two commands can ever interleave mid-line. The actor is also the
//! only place reconnection happens, which keeps attempts from ever racing
//! each other.
//!
//! Delivery is best-effort by design: when the link is down, or a write
//! fails, the command in hand is dropped and the producers never find out.
//! The one ordering promise the device relies on is that the first line of
//! every (re)connection is the `C,<r>,<g>,<b>` color handshake.

pub mod bridge;
pub mod error;
pub mod state;
pub mod transport;

pub use bridge::{
    channel, connect_link, run_bridge, BridgeHandle, BridgeRequest, BridgeSettings, PortSelection,
    DEFAULT_BAUD, RECONNECT_INTERVAL, REQUEST_BUFFER,
};
pub use error::BridgeError;
pub use state::{Feature, RuntimeConfig};
pub use transport::{LinkIo, LinkOpener, SerialOpener, Transport, SETTLE_DELAY};
