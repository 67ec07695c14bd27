//! Serial port enumeration

use serialport::{available_ports, SerialPortType};
use tracing::info;

use crate::error::DetectError;
use crate::usb_ids;

/// Information about a serial port
#[derive(Debug, Clone)]
pub struct SerialPortInfo {
    /// Port name (e.g., /dev/ttyUSB0, COM3)
    pub port: String,
    /// USB Vendor ID (if USB)
    pub vid: Option<u16>,
    /// USB Product ID (if USB)
    pub pid: Option<u16>,
    /// USB manufacturer string
    pub manufacturer: Option<String>,
    /// USB product string
    pub product: Option<String>,
}

impl SerialPortInfo {
    /// Create from serialport crate's port info
    fn from_serialport(name: String, port_type: &SerialPortType) -> Self {
        match port_type {
            SerialPortType::UsbPort(usb) => Self {
                port: name,
                vid: Some(usb.vid),
                pid: Some(usb.pid),
                manufacturer: usb.manufacturer.clone(),
                product: usb.product.clone(),
            },
            _ => Self {
                port: name,
                vid: None,
                pid: None,
                manufacturer: None,
                product: None,
            },
        }
    }

    /// Human-readable description, best effort
    ///
    /// Prefers the USB product string, then the manufacturer string. This
    /// is what the CH340 driver's "USB-SERIAL CH340" text shows up in on
    /// Windows.
    pub fn description(&self) -> &str {
        self.product
            .as_deref()
            .or(self.manufacturer.as_deref())
            .unwrap_or("Unknown")
    }
}

/// Serial port scanner configuration
#[derive(Debug, Clone, Default)]
pub struct ScannerConfig {
    /// Skip ports matching these patterns
    pub skip_patterns: Vec<String>,
}

/// Serial port scanner
pub struct PortScanner {
    config: ScannerConfig,
}

impl PortScanner {
    /// Create a new scanner with default configuration
    pub fn new() -> Self {
        Self {
            config: ScannerConfig {
                skip_patterns: vec![
                    // Bluetooth ports on macOS
                    "Bluetooth".to_string(),
                    // Debug/logging ports
                    "debug".to_string(),
                ],
            },
        }
    }

    /// Create a scanner with custom configuration
    pub fn with_config(config: ScannerConfig) -> Self {
        Self { config }
    }

    /// Enumerate all available serial ports
    pub fn enumerate_ports(&self) -> Result<Vec<SerialPortInfo>, DetectError> {
        let ports = available_ports().map_err(|e| DetectError::EnumerationFailed(e.to_string()))?;

        let result: Vec<_> = ports
            .into_iter()
            .map(|p| SerialPortInfo::from_serialport(p.port_name, &p.port_type))
            .filter(|p| !self.should_skip_port(p))
            .collect();

        if result.is_empty() {
            info!("No serial ports found");
        } else {
            info!("Found {} serial port(s)", result.len());
            for port in &result {
                let adapter = port
                    .vid
                    .and_then(usb_ids::adapter_name)
                    .unwrap_or("unknown adapter");
                info!("  {} - {} ({})", port.port, port.description(), adapter);
            }
        }

        Ok(result)
    }

    /// Check if a port should be skipped
    fn should_skip_port(&self, port: &SerialPortInfo) -> bool {
        self.config
            .skip_patterns
            .iter()
            .any(|pattern| port.port.contains(pattern.as_str()))
    }
}

impl Default for PortScanner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serialport::UsbPortInfo;

    #[test]
    fn test_serial_port_info_from_usb() {
        let usb_info = SerialPortType::UsbPort(UsbPortInfo {
            vid: 0x1A86,
            pid: 0x7523,
            serial_number: None,
            manufacturer: Some("wch.cn".to_string()),
            product: Some("USB-SERIAL CH340".to_string()),
        });

        let info = SerialPortInfo::from_serialport("COM3".to_string(), &usb_info);

        assert_eq!(info.vid, Some(0x1A86));
        assert_eq!(info.pid, Some(0x7523));
        assert_eq!(info.description(), "USB-SERIAL CH340");
    }

    #[test]
    fn test_description_falls_back_to_manufacturer() {
        let info = SerialPortInfo {
            port: "/dev/ttyUSB0".to_string(),
            vid: Some(0x1A86),
            pid: Some(0x7523),
            manufacturer: Some("wch.cn".to_string()),
            product: None,
        };
        assert_eq!(info.description(), "wch.cn");
    }

    #[test]
    fn test_non_usb_port_has_no_ids() {
        let info =
            SerialPortInfo::from_serialport("/dev/ttyS0".to_string(), &SerialPortType::PciPort);
        assert_eq!(info.vid, None);
        assert_eq!(info.description(), "Unknown");
    }
}
