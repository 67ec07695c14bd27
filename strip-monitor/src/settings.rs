//! Monitor settings
//!
//! Loaded once at startup from the config directory. A missing or broken
//! file is never an error: the defaults (auto-detect, 115200, red) match
//! the controller as shipped.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use strip_protocol::Rgb;

/// Persistent monitor configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Settings {
    /// Serial port name, or the literal `AUTO` for discovery
    #[serde(default = "default_port")]
    pub port: String,
    /// Wire baud rate
    #[serde(default = "default_baud")]
    pub baud_rate: u32,
    /// Base strip color sent in the connect handshake
    #[serde(default)]
    pub color: Rgb,
    /// Keep running (and retrying) when no controller is attached,
    /// instead of failing startup; how the tray build behaves
    #[serde(default)]
    pub run_without_device: bool,
    /// Initial feature flags; all togglable at runtime
    #[serde(default = "default_true")]
    pub react_to_keyboard: bool,
    #[serde(default = "default_true")]
    pub react_to_mouse: bool,
    #[serde(default = "default_true")]
    pub react_to_audio: bool,
    #[serde(default = "default_true")]
    pub stay_on: bool,
}

fn default_port() -> String {
    "AUTO".to_string()
}

fn default_baud() -> u32 {
    strip_bridge::DEFAULT_BAUD
}

fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            port: default_port(),
            baud_rate: default_baud(),
            color: Rgb::RED,
            run_without_device: false,
            react_to_keyboard: true,
            react_to_mouse: true,
            react_to_audio: true,
            stay_on: true,
        }
    }
}

impl Settings {
    /// Get the config directory for striplink
    /// Uses $XDG_CONFIG_HOME/striplink, falls back to ~/.config/striplink
    fn config_dir() -> Option<PathBuf> {
        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_config);
            if path.is_absolute() {
                return Some(path.join("striplink"));
            }
        }

        dirs::home_dir().map(|h| h.join(".config").join("striplink"))
    }

    /// Get the settings file path
    pub fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("settings.json"))
    }

    /// Parse settings from JSON, falling back to defaults on any error
    fn from_json(json: &str) -> Self {
        serde_json::from_str(json).unwrap_or_default()
    }

    /// Load settings from disk
    pub fn load() -> Self {
        Self::settings_path()
            .and_then(|path| std::fs::read_to_string(path).ok())
            .map(|json| Self::from_json(&json))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_shipped_controller() {
        let settings = Settings::default();
        assert_eq!(settings.port, "AUTO");
        assert_eq!(settings.baud_rate, 115_200);
        assert_eq!(settings.color, Rgb::RED);
        assert!(!settings.run_without_device);
        assert!(settings.stay_on);
    }

    #[test]
    fn test_partial_file_fills_in_defaults() {
        let settings = Settings::from_json(r#"{"port": "COM7", "react_to_audio": false}"#);
        assert_eq!(settings.port, "COM7");
        assert!(!settings.react_to_audio);
        assert_eq!(settings.baud_rate, 115_200);
        assert_eq!(settings.color, Rgb::RED);
    }

    #[test]
    fn test_color_field_round_trips() {
        let settings = Settings::from_json(r#"{"color": {"r": 255, "g": 165, "b": 0}}"#);
        assert_eq!(settings.color, Rgb::new(255, 165, 0));
    }

    #[test]
    fn test_broken_file_falls_back_to_defaults() {
        assert_eq!(Settings::from_json("not json at all"), Settings::default());
        assert_eq!(Settings::from_json(""), Settings::default());
    }
}
