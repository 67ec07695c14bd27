//! Audio loudness mapping
//!
//! Converts a block of capture samples into the 0-20 level the strip can
//! display. The scale factor tunes RMS sensitivity to the device's LED
//! range and is part of the protocol contract, not a user setting.

/// Highest level the device can display
pub const MAX_LEVEL: u8 = 20;

/// RMS-to-level scale factor
pub const LEVEL_SCALE: f32 = 2000.0;

/// Root-mean-square amplitude over a flattened sample block
///
/// Channels are not separated; the block is treated as one run of samples,
/// matching what the capture callback delivers.
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_sq: f32 = samples.iter().map(|s| s * s).sum();
    (sum_sq / samples.len() as f32).sqrt()
}

/// Map an RMS amplitude to a display level
///
/// Non-finite input (NaN propagated from a bad capture block, infinities
/// from overflow) maps to 0; everything else clamps into `0..=MAX_LEVEL`.
pub fn level_from_rms(rms: f32) -> u8 {
    if !rms.is_finite() {
        return 0;
    }
    let scaled = (rms * LEVEL_SCALE).round();
    scaled.clamp(0.0, MAX_LEVEL as f32) as u8
}

/// Convenience composition of [`rms`] and [`level_from_rms`]
pub fn level_from_samples(samples: &[f32]) -> u8 {
    level_from_rms(rms(samples))
}
