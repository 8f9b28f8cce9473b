//! Temperature reader - one DS18B20 on one adapter pin
//!
//! Runs the fixed bus transaction: Skip-ROM + Convert-T, then Skip-ROM +
//! Read-Scratchpad, CRC check, decode. Exactly one sensor may be on the bus
//! since no ROM addressing is done.

use thermowire_core::{
    convert_sequence, read_scratchpad_sequence, Decoding, Reading, Result, Scratchpad,
    SCRATCHPAD_LEN, SENTINEL_CELSIUS,
};
use tracing::{debug, error, info, warn};

use crate::adapter::{AdapterConnector, OneWireAdapter};

/// Whether the adapter pin has been configured
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderState {
    Uninitialized,
    Initialized,
}

/// DS18B20 reader
///
/// Generic over the connector, so real hardware (`SerialConnector`) and
/// test adapters share the same code path.
pub struct TemperatureReader<C: AdapterConnector> {
    connector: C,
    pin: Option<u8>,
    state: ReaderState,
    decoding: Decoding,
}

impl<C: AdapterConnector> TemperatureReader<C> {
    pub fn new(connector: C) -> Self {
        Self {
            connector,
            pin: None,
            state: ReaderState::Uninitialized,
            decoding: Decoding::default(),
        }
    }

    pub fn with_decoding(mut self, decoding: Decoding) -> Self {
        self.decoding = decoding;
        self
    }

    pub fn state(&self) -> ReaderState {
        self.state
    }

    pub fn is_initialized(&self) -> bool {
        self.state == ReaderState::Initialized
    }

    /// Pin passed to the last `initialize` call
    pub fn pin(&self) -> Option<u8> {
        self.pin
    }

    pub fn decoding(&self) -> Decoding {
        self.decoding
    }

    async fn configure(&self, pin: u8) -> Result<()> {
        let mut adapter = self.connector.connect().await?;
        adapter.configure_pin(pin).await
    }

    /// Configure the adapter to use `pin` as the 1-Wire line.
    ///
    /// On failure the error is logged and returned, and the reader stays
    /// uninitialized.
    pub async fn initialize(&mut self, pin: u8) -> Result<()> {
        info!("Configuring 1-Wire pin {}", pin);
        self.pin = Some(pin);

        match self.configure(pin).await {
            Ok(()) => {
                self.state = ReaderState::Initialized;
                debug!("1-Wire pin {} configured", pin);
                Ok(())
            }
            Err(e) => {
                error!("Failed to configure 1-Wire pin {}: {}", pin, e);
                self.state = ReaderState::Uninitialized;
                Err(e)
            }
        }
    }

    /// Run one conversion and read the result.
    ///
    /// The conversion wait is left to the adapter's `write_bus`. Opening a
    /// session may reset the adapter, so an initialized reader re-applies its
    /// pin configuration first. Reads are attempted even when the reader is
    /// uninitialized.
    pub async fn read_temperature(&mut self) -> Result<Reading> {
        let mut adapter = self.connector.connect().await?;

        match (self.state, self.pin) {
            (ReaderState::Initialized, Some(pin)) => adapter
                .configure_pin(pin)
                .await
                .inspect_err(|e| error!("Failed to restore 1-Wire pin {}: {}", pin, e))?,
            _ => warn!("Reading temperature before the 1-Wire pin was configured"),
        }

        adapter
            .write_bus(&convert_sequence())
            .await
            .inspect_err(|e| error!("Convert-T failed: {}", e))?;

        let bytes = adapter
            .read_bus(SCRATCHPAD_LEN, &read_scratchpad_sequence())
            .await
            .inspect_err(|e| error!("Read-Scratchpad failed: {}", e))?;
        drop(adapter);

        debug!("Scratchpad: {:02X?}", bytes);
        let scratchpad = Scratchpad::try_from(bytes.as_slice())?;
        scratchpad
            .verify()
            .inspect_err(|e| warn!("Discarding scratchpad: {}", e))?;

        let reading = Reading::from_scratchpad(scratchpad, self.decoding);
        if reading.is_power_on_value() {
            warn!("Temperature register holds the power-on value; conversion may not have run");
        }
        debug!("Temperature: {} °C (raw 0x{:04X})", reading.celsius, reading.raw);
        Ok(reading)
    }

    /// Read with failures folded into a plain number.
    ///
    /// Returns [`SENTINEL_CELSIUS`] (200 °C) for a CRC mismatch or any other
    /// failure, which a caller cannot tell apart from a real value. Prefer
    /// [`read_temperature`](Self::read_temperature).
    pub async fn read_temperature_or_sentinel(&mut self) -> f64 {
        match self.read_temperature().await {
            Ok(reading) => reading.celsius,
            Err(e) => {
                error!("Temperature read failed, returning {}: {}", SENTINEL_CELSIUS, e);
                SENTINEL_CELSIUS
            }
        }
    }
}
