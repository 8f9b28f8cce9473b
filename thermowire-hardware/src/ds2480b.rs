//! DS2480B serial 1-Wire line driver
//!
//! The DS2480B sits behind a UART and drives the 1-Wire line itself. It
//! starts in command mode; in data mode every byte sent is put on the bus and
//! answered by one byte sampled from the bus (the echo). Writing 0xFF issues
//! eight read slots, so the echo is the byte read from the device.

use std::time::Duration;

use async_trait::async_trait;
use thermowire_core::{validate_pin, AdapterModel, Ds2480b, Result, ThermowireError};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::{sleep, timeout, Instant};
use tracing::{debug, error, warn};

use crate::adapter::OneWireAdapter;

/// Reset pulse at standard speed. Also the timing calibration byte after a break.
const CMD_RESET: u8 = 0xC1;
/// Switch from command mode to data mode
const CMD_DATA_MODE: u8 = 0xE1;
/// Switch from data mode to command mode; sent twice to pass 0xE3 as data
const CMD_COMMAND_MODE: u8 = 0xE3;

/// Slew rate 1.37 V/us, write-1 low time 10 us, sample offset 8 us
const CONFIG_SEQUENCE: [u8; 3] = [0x17, 0x45, 0x5B];

const RESET_RESULT_MASK: u8 = 0x03;
const RESET_SHORT: u8 = 0x00;
const RESET_ALARM_PRESENCE: u8 = 0x02;
const RESET_NO_PRESENCE: u8 = 0x03;

/// Byte that produces eight read slots in data mode
const READ_SLOT: u8 = 0xFF;

const DEFAULT_CONVERSION_TIMEOUT: Duration =
    Duration::from_millis(Ds2480b::DEFAULT_CONVERSION_TIMEOUT_MS);
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Command,
    Data,
}

/// DS2480B driver over any byte stream
pub struct Ds2480bDriver<S> {
    stream: S,
    mode: Mode,
    timeout_duration: Duration,
    conversion_timeout: Duration,
    poll_interval: Duration,
    debug_uart: bool,
}

impl<S: AsyncRead + AsyncWrite + Unpin + Send> Ds2480bDriver<S> {
    /// Wrap a stream connected to a DS2480B in command mode
    ///
    /// # Arguments
    /// * `stream` - UART stream to the bridge
    /// * `timeout_ms` - Timeout in milliseconds for each read/write
    pub fn new(stream: S, timeout_ms: u64) -> Self {
        Self {
            stream,
            mode: Mode::Command,
            timeout_duration: Duration::from_millis(timeout_ms),
            conversion_timeout: DEFAULT_CONVERSION_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            debug_uart: false,
        }
    }

    /// Longest time `write_bus` waits for the bus to be released
    pub fn with_conversion_timeout(mut self, conversion_timeout: Duration) -> Self {
        self.conversion_timeout = conversion_timeout;
        self
    }

    /// Delay between busy polls while waiting for the bus
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Log every byte sent and received
    pub fn with_debug_uart(mut self, debug_uart: bool) -> Self {
        self.debug_uart = debug_uart;
        self
    }

    pub fn get_ref(&self) -> &S {
        &self.stream
    }

    /// Send the timing byte the chip expects after a break or power-up.
    ///
    /// The chip does not answer it.
    pub async fn calibrate(&mut self) -> Result<()> {
        debug!("Sending DS2480B calibration byte");
        self.mode = Mode::Command;
        self.send(&[CMD_RESET]).await
    }

    async fn send(&mut self, bytes: &[u8]) -> Result<()> {
        if self.debug_uart {
            debug!("TX: {:02X?}", bytes);
        }

        timeout(self.timeout_duration, self.stream.write_all(bytes))
            .await
            .map_err(|_| {
                error!("Write timeout");
                ThermowireError::Timeout("Write operation timed out".to_string())
            })?
            .map_err(|e| {
                error!("Write failed: {}", e);
                ThermowireError::AdapterIo(format!("Write failed: {}", e))
            })?;

        timeout(self.timeout_duration, self.stream.flush())
            .await
            .map_err(|_| ThermowireError::Timeout("Flush operation timed out".to_string()))?
            .map_err(|e| ThermowireError::AdapterIo(format!("Flush failed: {}", e)))?;

        Ok(())
    }

    async fn receive(&mut self, count: usize) -> Result<Vec<u8>> {
        let mut buffer = vec![0u8; count];

        timeout(self.timeout_duration, self.stream.read_exact(&mut buffer))
            .await
            .map_err(|_| {
                error!("Read timeout");
                ThermowireError::Timeout("Read operation timed out".to_string())
            })?
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::UnexpectedEof {
                    warn!("Serial port returned EOF - adapter may have been disconnected");
                    ThermowireError::AdapterIo("Adapter disconnected".to_string())
                } else {
                    error!("Read error: {}", e);
                    ThermowireError::AdapterIo(format!("Read error: {}", e))
                }
            })?;

        if self.debug_uart {
            debug!("RX: {:02X?}", buffer);
        }
        Ok(buffer)
    }

    async fn enter_command_mode(&mut self) -> Result<()> {
        if self.mode != Mode::Command {
            self.send(&[CMD_COMMAND_MODE]).await?;
            self.mode = Mode::Command;
        }
        Ok(())
    }

    async fn enter_data_mode(&mut self) -> Result<()> {
        if self.mode != Mode::Data {
            self.send(&[CMD_DATA_MODE]).await?;
            self.mode = Mode::Data;
        }
        Ok(())
    }

    /// Issue a reset pulse and check for presence
    async fn reset_bus(&mut self) -> Result<()> {
        self.enter_command_mode().await?;
        self.send(&[CMD_RESET]).await?;
        let response = self.receive(1).await?[0];

        if response & 0xC0 != 0xC0 {
            error!("Unexpected reset response: 0x{:02X}", response);
            return Err(ThermowireError::AdapterIo(format!(
                "Unexpected reset response 0x{:02X}",
                response
            )));
        }

        match response & RESET_RESULT_MASK {
            RESET_SHORT => {
                error!("1-Wire bus is shorted");
                Err(ThermowireError::BusShorted)
            }
            RESET_NO_PRESENCE => {
                warn!("No presence pulse on the 1-Wire bus");
                Err(ThermowireError::NoPresence)
            }
            RESET_ALARM_PRESENCE => {
                debug!("Presence pulse with alarm flag");
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Put `data` on the bus in data mode and collect one echo per byte
    async fn transfer(&mut self, data: &[u8]) -> Result<Vec<u8>> {
        self.enter_data_mode().await?;

        let mut packet = Vec::with_capacity(data.len() + 1);
        for &byte in data {
            packet.push(byte);
            if byte == CMD_COMMAND_MODE {
                packet.push(byte);
            }
        }

        self.send(&packet).await?;
        self.receive(data.len()).await
    }

    async fn write_bytes(&mut self, data: &[u8]) -> Result<()> {
        let echo = self.transfer(data).await?;
        if echo != data {
            error!("Bus echo mismatch: sent {:02X?}, read {:02X?}", data, echo);
            return Err(ThermowireError::AdapterIo(format!(
                "Bus echo mismatch: sent {:02X?}, read {:02X?}",
                data, echo
            )));
        }
        Ok(())
    }

    async fn read_bytes(&mut self, count: usize) -> Result<Vec<u8>> {
        self.transfer(&vec![READ_SLOT; count]).await
    }

    /// Poll read slots until the device stops holding the line low.
    ///
    /// An externally powered DS18B20 answers 0 while a conversion runs.
    async fn wait_for_release(&mut self) -> Result<()> {
        let deadline = Instant::now() + self.conversion_timeout;
        let mut polls = 0u32;

        loop {
            let slot = self.transfer(&[READ_SLOT]).await?;
            if slot[0] == READ_SLOT {
                debug!("Bus released after {} busy poll(s)", polls);
                return Ok(());
            }
            polls += 1;

            if Instant::now() >= deadline {
                error!(
                    "Bus still busy after {} ms",
                    self.conversion_timeout.as_millis()
                );
                return Err(ThermowireError::Timeout(format!(
                    "Bus still busy after {} ms",
                    self.conversion_timeout.as_millis()
                )));
            }
            sleep(self.poll_interval).await;
        }
    }
}

#[async_trait]
impl<S: AsyncRead + AsyncWrite + Unpin + Send> OneWireAdapter for Ds2480bDriver<S> {
    async fn configure_pin(&mut self, pin: u8) -> Result<()> {
        validate_pin::<Ds2480b>(pin)?;

        self.enter_command_mode().await?;
        self.send(&CONFIG_SEQUENCE).await?;
        let response = self.receive(CONFIG_SEQUENCE.len()).await?;

        for (sent, got) in CONFIG_SEQUENCE.iter().zip(response.iter()) {
            if *got != sent & 0xFE {
                error!(
                    "Configuration byte 0x{:02X} answered with 0x{:02X}",
                    sent, got
                );
                return Err(ThermowireError::AdapterConfiguration(format!(
                    "Configuration byte 0x{:02X} answered with 0x{:02X}",
                    sent, got
                )));
            }
        }

        debug!("DS2480B configured for pin {}", pin);
        Ok(())
    }

    async fn write_bus(&mut self, bytes: &[u8]) -> Result<()> {
        self.reset_bus().await?;
        self.write_bytes(bytes).await?;
        self.wait_for_release().await?;
        self.enter_command_mode().await
    }

    async fn read_bus(&mut self, count: usize, command: &[u8]) -> Result<Vec<u8>> {
        self.reset_bus().await?;
        self.write_bytes(command).await?;
        let data = self.read_bytes(count).await?;
        self.enter_command_mode().await?;
        Ok(data)
    }
}
