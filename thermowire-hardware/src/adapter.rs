//! Adapter capability traits
//!
//! The reader only needs three things from a bus adapter: select a pin,
//! write bytes onto the bus, and write a command then read bytes back. Any
//! adapter providing those can stand in, which is also how the reader is
//! tested without hardware.

use async_trait::async_trait;
use thermowire_core::Result;

/// A connected 1-Wire bus adapter
#[async_trait]
pub trait OneWireAdapter: Send {
    /// Select the pin used as the 1-Wire line
    async fn configure_pin(&mut self, pin: u8) -> Result<()>;

    /// Reset the bus and write `bytes`; returns once the bus is released
    async fn write_bus(&mut self, bytes: &[u8]) -> Result<()>;

    /// Reset the bus, write `command`, then read `count` bytes
    async fn read_bus(&mut self, count: usize, command: &[u8]) -> Result<Vec<u8>>;
}

/// Opens scoped adapter sessions.
///
/// Every operation of the reader opens its own session and drops it when
/// done; the adapter is never held between operations.
#[async_trait]
pub trait AdapterConnector: Send + Sync {
    type Adapter: OneWireAdapter;

    async fn connect(&self) -> Result<Self::Adapter>;
}
