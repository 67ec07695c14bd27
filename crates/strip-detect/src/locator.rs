//! Strip controller port selection
//!
//! Selection policy, in order:
//!
//! 1. a port whose description contains "CH340" or "USB-SERIAL"
//!    (case-insensitive)
//! 2. a port with the WCH vendor id (0x1A86)
//! 3. the first enumerated port, if any
//! 4. none
//!
//! Step 3 exists because cheap clone boards occasionally report a blank
//! descriptor; with a single adapter plugged in, first-port is the right
//! guess and the user can still pin an explicit port in settings.

use tracing::info;

use crate::scanner::{PortScanner, SerialPortInfo};
use crate::usb_ids;

/// Description substrings that identify the CH340 driver
const DESCRIPTION_MARKERS: &[&str] = &["CH340", "USB-SERIAL"];

/// Apply the selection policy to an enumerated port list
///
/// Pure over its input; [`locate`] wires it to the live scanner.
pub fn select_port(ports: &[SerialPortInfo]) -> Option<&SerialPortInfo> {
    let by_description = ports.iter().find(|p| {
        let description = p.description().to_uppercase();
        DESCRIPTION_MARKERS
            .iter()
            .any(|marker| description.contains(marker))
    });
    if by_description.is_some() {
        return by_description;
    }

    let by_vid = ports
        .iter()
        .find(|p| p.vid == Some(usb_ids::ch340::VID));
    if by_vid.is_some() {
        return by_vid;
    }

    ports.first()
}

/// Enumerate ports and pick the strip controller
///
/// Returns the port name to open, or `None` when no serial ports exist at
/// all. Enumeration failure is treated the same as an empty machine: the
/// caller's reconnect loop will try again.
pub fn locate() -> Option<String> {
    let ports = match PortScanner::new().enumerate_ports() {
        Ok(ports) => ports,
        Err(e) => {
            info!("Port enumeration failed: {}", e);
            return None;
        }
    };

    let selected = select_port(&ports)?;
    info!(
        "Selected {} - {}",
        selected.port,
        selected.description()
    );
    Some(selected.port.clone())
}
