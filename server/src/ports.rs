use serialport::{SerialPortInfo, SerialPortType};

use crate::error::LinkError;

/// Substrings that identify common USB-serial bridge chips
const KNOWN_CHIPS: [&str; 5] = ["USB", "UART", "CP210", "CH340", "Silicon Labs"];

/// A port seen during enumeration, only kept long enough to pick one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortCandidate {
    pub path: String,
    pub description: Option<String>,
    pub manufacturer: Option<String>,
}

impl PortCandidate {
    fn looks_like_usb_serial(&self) -> bool {
        [&self.description, &self.manufacturer]
            .into_iter()
            .flatten()
            .any(|text| KNOWN_CHIPS.iter().any(|chip| text.contains(chip)))
    }
}

impl From<SerialPortInfo> for PortCandidate {
    fn from(info: SerialPortInfo) -> Self {
        let (description, manufacturer) = match info.port_type {
            SerialPortType::UsbPort(usb) => (usb.product, usb.manufacturer),
            _ => (None, None),
        };

        Self {
            path: info.port_name,
            description,
            manufacturer,
        }
    }
}

/// Pick the device path to open.
///
/// A non-empty override wins outright. Otherwise the first port that looks like a
/// USB-serial bridge, then the first port at all.
pub fn select_port(
    override_path: Option<&str>,
    ports: &[PortCandidate],
) -> Result<String, LinkError> {
    if let Some(path) = override_path.filter(|path| !path.is_empty()) {
        return Ok(path.to_string());
    }

    ports
        .iter()
        .find(|port| port.looks_like_usb_serial())
        .or_else(|| ports.first())
        .map(|port| port.path.clone())
        .ok_or(LinkError::NoDeviceFound)
}

/// Resolve the serial port for this process, enumerating the OS ports only when
/// no override was configured
pub fn resolve_port(override_path: Option<&str>) -> Result<String, LinkError> {
    if let Some(path) = override_path.filter(|path| !path.is_empty()) {
        log::info!("Using SERIAL_PORT from environment: {}", path);
        return Ok(path.to_string());
    }

    let ports: Vec<PortCandidate> = serialport::available_ports()
        .map_err(LinkError::Enumerate)?
        .into_iter()
        .map(PortCandidate::from)
        .collect();

    for port in &ports {
        log::debug!(
            "Found port {} ({}, {})",
            port.path,
            port.description.as_deref().unwrap_or("n/a"),
            port.manufacturer.as_deref().unwrap_or("n/a")
        );
    }

    let path = select_port(None, &ports)?;
    log::info!("Auto-detected serial port: {}", path);
    Ok(path)
}
