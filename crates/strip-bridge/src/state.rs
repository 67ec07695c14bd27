//! Shared runtime configuration
//!
//! The feature flags and the base color are read on every event from the
//! producer tasks and written rarely by the external controller (tray
//! menu, CLI). Each field is its own atomic cell: readers always see a
//! whole value, but there is deliberately no cross-field transaction: a
//! color change and a flag change may become visible in either order.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use strip_protocol::Rgb;

/// The toggleable features exposed to the external controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    /// React to key presses
    Keyboard,
    /// React to pointer movement
    Mouse,
    /// React to audio output level
    Audio,
    /// Send periodic keep-alives so the strip never idles out
    StayOn,
}

/// Process-wide mutable configuration, shared across all threads
#[derive(Debug)]
pub struct RuntimeConfig {
    react_to_keyboard: AtomicBool,
    react_to_mouse: AtomicBool,
    react_to_audio: AtomicBool,
    stay_on: AtomicBool,
    /// Base color, packed 0x00RRGGBB so a read can never tear
    color: AtomicU32,
    /// Observability flag: set on pointer emission, cleared on any key
    /// press. Not part of the wire protocol.
    pointer_active: AtomicBool,
}

impl RuntimeConfig {
    /// Create with all features enabled and the given base color
    pub fn new(color: Rgb) -> Self {
        Self {
            react_to_keyboard: AtomicBool::new(true),
            react_to_mouse: AtomicBool::new(true),
            react_to_audio: AtomicBool::new(true),
            stay_on: AtomicBool::new(true),
            color: AtomicU32::new(color.to_packed()),
            pointer_active: AtomicBool::new(false),
        }
    }

    fn cell(&self, feature: Feature) -> &AtomicBool {
        match feature {
            Feature::Keyboard => &self.react_to_keyboard,
            Feature::Mouse => &self.react_to_mouse,
            Feature::Audio => &self.react_to_audio,
            Feature::StayOn => &self.stay_on,
        }
    }

    /// Read a feature flag
    pub fn enabled(&self, feature: Feature) -> bool {
        self.cell(feature).load(Ordering::SeqCst)
    }

    /// Set a feature flag
    pub fn set_enabled(&self, feature: Feature, on: bool) {
        self.cell(feature).store(on, Ordering::SeqCst);
    }

    /// Flip a feature flag, returning the new value
    pub fn toggle(&self, feature: Feature) -> bool {
        // fetch_xor(true) flips the bit and returns the previous value
        !self.cell(feature).fetch_xor(true, Ordering::SeqCst)
    }

    /// Current base color
    pub fn color(&self) -> Rgb {
        Rgb::from_packed(self.color.load(Ordering::SeqCst))
    }

    /// Replace the base color
    pub fn set_color(&self, color: Rgb) {
        self.color.store(color.to_packed(), Ordering::SeqCst);
    }

    /// Whether the most recent activity was pointer movement
    pub fn pointer_active(&self) -> bool {
        self.pointer_active.load(Ordering::SeqCst)
    }

    /// Mark pointer activity (set by the pointer source)
    pub fn set_pointer_active(&self) {
        self.pointer_active.store(true, Ordering::SeqCst);
    }

    /// Clear the pointer-activity mark (done on every key press)
    pub fn clear_pointer_active(&self) {
        self.pointer_active.store(false, Ordering::SeqCst);
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self::new(Rgb::RED)
    }
}
