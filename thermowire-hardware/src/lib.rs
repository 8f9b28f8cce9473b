//! thermowire-hardware
//!
//! Bus-side crate: the adapter traits, the DS2480B serial bridge driver, and
//! the high-level DS18B20 temperature reader. Used by the CLI crate to talk to
//! the sensor.
//
//! Public API:
//! - `reader::TemperatureReader` - initialize a pin and read temperatures
//! - `ds2480b::Ds2480bDriver` - low-level DS2480B protocol over any byte stream
//! - `serial::SerialConnector` - opens DS2480B sessions on a serial port
//! - `serial::find_adapter` - helper to locate the adapter by VID/PID

pub mod adapter;
pub mod ds2480b;
pub mod reader;
pub mod serial;

#[cfg(test)]
mod test_utils;

pub use adapter::{AdapterConnector, OneWireAdapter};
pub use ds2480b::Ds2480bDriver;
pub use reader::{ReaderState, TemperatureReader};
pub use serial::{find_adapter, list_ports, PortInfo, SerialConnector};
