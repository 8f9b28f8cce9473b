//! Adapter model abstraction
//!
//! Each USB 1-Wire adapter implements the `AdapterModel` trait with its
//! compile-time characteristics: how many bus pins it exposes, how it is
//! found on USB, and how fast it talks.

use crate::error::{Result, ThermowireError};

/// Adapter model configuration trait
///
/// # Example
///
/// ```
/// use thermowire_core::adapter::{AdapterModel, Ds2480b};
///
/// const PINS: u8 = Ds2480b::PIN_COUNT;
/// const NAME: &str = Ds2480b::NAME;
/// ```
pub trait AdapterModel: Send + Sync + 'static {
    /// Human-readable adapter name
    const NAME: &'static str;

    /// Number of 1-Wire pins the adapter can drive
    const PIN_COUNT: u8;

    /// USB Vendor ID for device detection
    const USB_VID: u16;

    /// USB Product ID for device detection
    const USB_PID: u16;

    /// Serial communication baud rate
    const BAUD_RATE: u32;

    /// Default communication timeout in milliseconds
    const DEFAULT_TIMEOUT_MS: u64;

    /// Default bound on the wait for a temperature conversion, in milliseconds
    const DEFAULT_CONVERSION_TIMEOUT_MS: u64;
}

/// DS2480B serial 1-Wire line driver behind an FTDI USB/UART bridge
///
/// - One 1-Wire line (pin 0)
/// - USB VID: 0x0403 (FTDI)
/// - USB PID: 0x6001 (FT232R)
/// - 9600 baud, the DS2480B power-up rate
pub struct Ds2480b;

impl AdapterModel for Ds2480b {
    const NAME: &'static str = "DS2480B 1-Wire bridge";
    const PIN_COUNT: u8 = 1;
    const USB_VID: u16 = 0x0403;
    const USB_PID: u16 = 0x6001;
    const BAUD_RATE: u32 = 9600;
    const DEFAULT_TIMEOUT_MS: u64 = 1000;
    const DEFAULT_CONVERSION_TIMEOUT_MS: u64 = 1000;
}

/// Default adapter used throughout the workspace
pub type DefaultAdapter = Ds2480b;

/// Validate a pin identifier against an adapter's pin count
pub fn validate_pin<M: AdapterModel>(pin: u8) -> Result<()> {
    if pin >= M::PIN_COUNT {
        return Err(ThermowireError::AdapterConfiguration(format!(
            "pin {} not available on {} (must be 0-{})",
            pin,
            M::NAME,
            M::PIN_COUNT - 1
        )));
    }
    Ok(())
}
