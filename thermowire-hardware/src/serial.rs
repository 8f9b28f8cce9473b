//! Serial connector for USB 1-Wire adapters
//!
//! Opens the adapter's serial port for one session at a time and locates the
//! port by USB VID/PID.

use std::time::Duration;

use async_trait::async_trait;
use thermowire_core::{AdapterModel, Ds2480b, Result, ThermowireError};
use tokio::time::sleep;
use tokio_serial::{SerialPort, SerialPortBuilderExt, SerialStream};
use tracing::{debug, error};

use crate::adapter::AdapterConnector;
use crate::ds2480b::Ds2480bDriver;

/// Settling time around the break and the calibration byte
const BREAK_SETTLE: Duration = Duration::from_millis(2);

/// Opens a DS2480B session on a serial port
#[derive(Debug, Clone)]
pub struct SerialConnector {
    port_path: String,
    timeout_ms: u64,
    conversion_timeout_ms: u64,
    debug_uart: bool,
}

impl SerialConnector {
    /// Create a connector for a serial device
    ///
    /// # Arguments
    /// * `port_path` - Path to the serial device (e.g., "/dev/ttyUSB0")
    /// * `timeout_ms` - Timeout in milliseconds for read/write operations
    pub fn new(port_path: &str, timeout_ms: u64) -> Self {
        Self {
            port_path: port_path.to_string(),
            timeout_ms,
            conversion_timeout_ms: Ds2480b::DEFAULT_CONVERSION_TIMEOUT_MS,
            debug_uart: false,
        }
    }

    pub fn with_conversion_timeout_ms(mut self, conversion_timeout_ms: u64) -> Self {
        self.conversion_timeout_ms = conversion_timeout_ms;
        self
    }

    /// Enable UART debug logging
    pub fn with_debug_uart(mut self, debug_uart: bool) -> Self {
        self.debug_uart = debug_uart;
        self
    }

    pub fn port_path(&self) -> &str {
        &self.port_path
    }

    fn open_port(&self) -> Result<SerialStream> {
        debug!("Opening serial port: {}", self.port_path);

        tokio_serial::new(&self.port_path, Ds2480b::BAUD_RATE)
            .timeout(Duration::from_millis(self.timeout_ms))
            .data_bits(tokio_serial::DataBits::Eight)
            .parity(tokio_serial::Parity::None)
            .stop_bits(tokio_serial::StopBits::One)
            .flow_control(tokio_serial::FlowControl::None)
            .open_native_async()
            .map_err(|e| {
                error!("Failed to open serial port {}: {}", self.port_path, e);
                ThermowireError::AdapterIo(format!("Failed to open serial port: {}", e))
            })
    }
}

fn serial_error(context: &str, e: tokio_serial::Error) -> ThermowireError {
    error!("{}: {}", context, e);
    ThermowireError::AdapterIo(format!("{}: {}", context, e))
}

#[async_trait]
impl AdapterConnector for SerialConnector {
    type Adapter = Ds2480bDriver<SerialStream>;

    async fn connect(&self) -> Result<Self::Adapter> {
        let port = self.open_port()?;

        // A break puts the DS2480B back into its power-up state
        port.set_break()
            .map_err(|e| serial_error("Failed to send break", e))?;
        sleep(BREAK_SETTLE).await;
        port.clear_break()
            .map_err(|e| serial_error("Failed to clear break", e))?;
        sleep(BREAK_SETTLE).await;

        let mut driver = Ds2480bDriver::new(port, self.timeout_ms)
            .with_conversion_timeout(Duration::from_millis(self.conversion_timeout_ms))
            .with_debug_uart(self.debug_uart);
        driver.calibrate().await?;
        sleep(BREAK_SETTLE).await;

        driver
            .get_ref()
            .clear(tokio_serial::ClearBuffer::Input)
            .map_err(|e| serial_error("Failed to clear input buffer", e))?;

        debug!("Adapter session open on {}", self.port_path);
        Ok(driver)
    }
}

/// A serial port as seen by the CLI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortInfo {
    pub name: String,
    pub usb_vid: Option<u16>,
    pub usb_pid: Option<u16>,
    pub product: Option<String>,
}

impl PortInfo {
    /// True when the port's USB identity matches
    pub fn matches(&self, vid: u16, pid: u16) -> bool {
        self.usb_vid == Some(vid) && self.usb_pid == Some(pid)
    }
}

/// Enumerate serial ports
pub fn list_ports() -> Result<Vec<PortInfo>> {
    let ports = tokio_serial::available_ports().map_err(|e| {
        error!("Failed to enumerate serial ports: {}", e);
        ThermowireError::AdapterIo(format!("Failed to enumerate ports: {}", e))
    })?;

    Ok(ports
        .into_iter()
        .map(|port| match port.port_type {
            tokio_serial::SerialPortType::UsbPort(info) => PortInfo {
                name: port.port_name,
                usb_vid: Some(info.vid),
                usb_pid: Some(info.pid),
                product: info.product,
            },
            _ => PortInfo {
                name: port.port_name,
                usb_vid: None,
                usb_pid: None,
                product: None,
            },
        })
        .collect())
}

/// Find the adapter's serial port by USB VID/PID
pub fn find_adapter(vid: u16, pid: u16) -> Result<String> {
    debug!("Searching for adapter (VID:0x{:04X}, PID:0x{:04X})", vid, pid);

    for port in list_ports()? {
        debug!("Checking port: {}", port.name);

        if port.matches(vid, pid) {
            debug!("Found adapter at: {}", port.name);
            return Ok(port.name);
        }
    }

    error!("Adapter not found");
    Err(ThermowireError::DeviceNotFound)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_info_matches() {
        let port = PortInfo {
            name: "/dev/ttyUSB0".to_string(),
            usb_vid: Some(0x0403),
            usb_pid: Some(0x6001),
            product: Some("FT232R USB UART".to_string()),
        };
        assert!(port.matches(Ds2480b::USB_VID, Ds2480b::USB_PID));
        assert!(!port.matches(0x2E8A, 0x000A));

        let native = PortInfo {
            name: "/dev/ttyS0".to_string(),
            usb_vid: None,
            usb_pid: None,
            product: None,
        };
        assert!(!native.matches(0x0403, 0x6001));
    }

    #[test]
    fn test_connector_settings() {
        let connector = SerialConnector::new("/dev/ttyUSB0", 250)
            .with_conversion_timeout_ms(900)
            .with_debug_uart(true);
        assert_eq!(connector.port_path(), "/dev/ttyUSB0");
        assert_eq!(connector.timeout_ms, 250);
        assert_eq!(connector.conversion_timeout_ms, 900);
        assert!(connector.debug_uart);
    }

    #[test]
    fn test_find_adapter_unknown_usb_id() {
        // No real device carries this VID/PID
        let result = find_adapter(0xFFFF, 0xFFFE);
        assert!(matches!(
            result,
            Err(ThermowireError::DeviceNotFound) | Err(ThermowireError::AdapterIo(_))
        ));
    }

    #[tokio::test]
    async fn test_connect_missing_port_is_io_error() {
        let connector = SerialConnector::new("/dev/thermowire-does-not-exist", 100);
        let result = connector.connect().await;
        assert!(matches!(result, Err(ThermowireError::AdapterIo(_))));
    }
}
