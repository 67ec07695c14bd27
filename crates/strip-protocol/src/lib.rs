//! LED Strip Wire Protocol
//!
//! This crate provides the command vocabulary spoken to the strip
//! controller over serial, plus the audio loudness mapping that feeds the
//! `A,<level>` command. Everything here is pure: no I/O, no clocks.
//!
//! # Format
//!
//! Commands are single newline-terminated ASCII lines:
//!
//! - `M` - pointer activity (also used as the idle keep-alive)
//! - `K` - generic key press
//! - `B` - backspace key
//! - `S` - space key
//! - `C,<r>,<g>,<b>` - set base color, each channel 0-255 decimal
//! - `A,<level>` - audio level, 0-20 decimal
//!
//! There is no checksum and no acknowledgement; the link is
//! fire-and-forget at 115200 8N1.

pub mod color;
pub mod command;
pub mod level;

pub use color::Rgb;
pub use command::Command;
pub use level::{level_from_rms, level_from_samples, rms, LEVEL_SCALE, MAX_LEVEL};
