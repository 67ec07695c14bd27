//! Protocol command representation
//!
//! [`Command`] is the immutable value every activity source produces and
//! the bridge consumes exactly once. Encoding is total over all variants;
//! range validation (the 0-20 audio level) happens upstream in
//! [`crate::level`], never here.

use crate::color::Rgb;

/// A single outbound command for the strip controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Pointer activity
    Move,
    /// Generic key press
    KeyGeneric,
    /// Backspace key
    KeyBackspace,
    /// Space key
    KeySpace,
    /// Audio loudness level, pre-clamped to 0..=20
    AudioLevel(u8),
    /// Set the base color
    SetColor(Rgb),
    /// Idle-timer reset; shares the `M` wire form with [`Command::Move`]
    KeepAlive,
}

impl Command {
    /// Encode to the wire text, without the newline terminator
    pub fn encode(&self) -> String {
        match self {
            Command::Move | Command::KeepAlive => "M".to_string(),
            Command::KeyGeneric => "K".to_string(),
            Command::KeyBackspace => "B".to_string(),
            Command::KeySpace => "S".to_string(),
            Command::AudioLevel(level) => format!("A,{}", level),
            Command::SetColor(color) => format!("C,{},{},{}", color.r, color.g, color.b),
        }
    }

    /// Returns true for the variants that reset the device idle timer
    pub fn is_activity(&self) -> bool {
        matches!(
            self,
            Command::Move
                | Command::KeepAlive
                | Command::KeyGeneric
                | Command::KeyBackspace
                | Command::KeySpace
        )
    }
}
