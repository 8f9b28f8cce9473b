//! Test helpers: a simulated DS2480B bridge with one DS18B20 on its bus.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use thermowire_core::Result;
use tokio::io::{AsyncReadExt, AsyncWriteExt, DuplexStream};

use crate::adapter::AdapterConnector;
use crate::ds2480b::Ds2480bDriver;

/// Scratchpad holding 25.0 °C with a valid CRC
pub const SCRATCHPAD_25C: [u8; 9] = [0x90, 0x01, 0x4B, 0x46, 0x7F, 0xFF, 0x0C, 0x10, 0x33];

/// Scratchpad holding 25.0 °C with a wrong CRC byte
pub const SCRATCHPAD_BAD_CRC: [u8; 9] = [0x90, 0x01, 0x4B, 0x46, 0x7F, 0xFF, 0x0C, 0x10, 0x34];

/// Simulated DS2480B answering on the device side of a duplex stream
#[derive(Debug, Clone)]
pub struct FakeBridge {
    /// Byte answered to a reset pulse (low two bits are the result)
    pub reset_response: u8,
    /// Answer configuration writes with the bit-0 flag still set
    pub reject_config: bool,
    /// Flip bit 0 of every echoed write
    pub corrupt_echo: bool,
    /// Read slots answered with 0 after a Convert-T
    pub convert_polls: usize,
    /// Bytes served after a Read-Scratchpad
    pub scratchpad: Vec<u8>,

    /// Every byte received from the host
    pub received: Vec<u8>,
    /// Data bytes written onto the bus, read slots excluded
    pub written: Vec<u8>,

    calibrated: bool,
    data_mode: bool,
    pending_escape: bool,
    busy_polls: usize,
    read_queue: VecDeque<u8>,
}

impl FakeBridge {
    pub fn new() -> Self {
        Self {
            reset_response: 0xCD,
            reject_config: false,
            corrupt_echo: false,
            convert_polls: 0,
            scratchpad: SCRATCHPAD_25C.to_vec(),
            received: Vec::new(),
            written: Vec::new(),
            calibrated: false,
            data_mode: false,
            pending_escape: false,
            busy_polls: 0,
            read_queue: VecDeque::new(),
        }
    }

    /// Serve the host until it closes its end, then hand back the final state
    pub async fn run(mut self, mut stream: DuplexStream) -> Self {
        while let Ok(byte) = stream.read_u8().await {
            self.received.push(byte);
            let response = self.handle(byte);
            if !response.is_empty() {
                let _ = stream.write_all(&response).await;
            }
        }
        self
    }

    fn handle(&mut self, byte: u8) -> Vec<u8> {
        if !self.calibrated {
            self.calibrated = true;
            return Vec::new();
        }

        if self.data_mode {
            if self.pending_escape {
                self.pending_escape = false;
                if byte == 0xE3 {
                    return self.bus_byte(byte);
                }
                self.data_mode = false;
                return self.command(byte);
            }
            if byte == 0xE3 {
                self.pending_escape = true;
                return Vec::new();
            }
            return self.bus_byte(byte);
        }

        self.command(byte)
    }

    fn command(&mut self, byte: u8) -> Vec<u8> {
        match byte {
            0xC1 => vec![self.reset_response],
            0xE1 => {
                self.data_mode = true;
                Vec::new()
            }
            0xE3 => Vec::new(),
            // Configuration parameter writes
            b if b & 0x81 == 0x01 => {
                if self.reject_config {
                    vec![b]
                } else {
                    vec![b & 0xFE]
                }
            }
            _ => Vec::new(),
        }
    }

    fn bus_byte(&mut self, byte: u8) -> Vec<u8> {
        if byte == 0xFF {
            if self.busy_polls > 0 {
                self.busy_polls -= 1;
                return vec![0x00];
            }
            return vec![self.read_queue.pop_front().unwrap_or(0xFF)];
        }

        self.written.push(byte);
        if self.written.ends_with(&[0xCC, 0x44]) {
            self.busy_polls = self.convert_polls;
        }
        if self.written.ends_with(&[0xCC, 0xBE]) {
            self.read_queue = self.scratchpad.iter().copied().collect();
        }

        if self.corrupt_echo {
            vec![byte ^ 0x01]
        } else {
            vec![byte]
        }
    }
}

impl Default for FakeBridge {
    fn default() -> Self {
        Self::new()
    }
}

/// Connector handing out drivers wired to fresh simulated bridges
pub struct DuplexConnector {
    template: FakeBridge,
    /// Simulated bridge tasks, one per session
    pub sessions: Arc<Mutex<Vec<tokio::task::JoinHandle<FakeBridge>>>>,
}

impl DuplexConnector {
    pub fn new(template: FakeBridge) -> Self {
        Self {
            template,
            sessions: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl AdapterConnector for DuplexConnector {
    type Adapter = Ds2480bDriver<DuplexStream>;

    async fn connect(&self) -> Result<Self::Adapter> {
        let (host, device) = tokio::io::duplex(256);
        let handle = tokio::spawn(self.template.clone().run(device));
        self.sessions.lock().unwrap().push(handle);

        let mut driver = Ds2480bDriver::new(host, 500)
            .with_poll_interval(Duration::from_millis(1))
            .with_conversion_timeout(Duration::from_millis(200));
        driver.calibrate().await?;
        Ok(driver)
    }
}
