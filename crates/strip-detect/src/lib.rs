//! Strip Controller Port Discovery
//!
//! This crate enumerates the serial ports visible to the OS and picks the
//! one that looks like the strip controller's USB-serial adapter (a WCH
//! CH340 on every board revision so far).
//!
//! An empty machine is a normal outcome, not an error: [`locate`] returns
//! `None` and the caller decides whether that is fatal.
//!
//! # Example
//!
//! ```rust,no_run
//! if let Some(port) = strip_detect::locate() {
//!     println!("strip controller on {}", port);
//! }
//! ```

pub mod error;
pub mod locator;
pub mod scanner;
pub mod usb_ids;

pub use error::DetectError;
pub use locator::{locate, select_port};
pub use scanner::{PortScanner, SerialPortInfo};
