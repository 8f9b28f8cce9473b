//! DS18B20 scratchpad
//!
//! Layout:
//!
//! 1. Byte 0: Temperature least-significant byte.
//! 2. Byte 1: Temperature most-significant byte.
//! 3. Byte 2: High alarm threshold (T<sub>H</sub>).
//! 4. Byte 3: Low alarm threshold (T<sub>L</sub>).
//! 5. Byte 4: Configuration (resolution in bits 6:5).
//! 6. Bytes 5-7: Reserved.
//! 7. Byte 8: CRC-8 over bytes 0-7.

use serde::{Deserialize, Serialize};

use crate::crc::crc8;
use crate::error::{Result, ThermowireError};

/// Number of bytes in the scratchpad, CRC included
pub const SCRATCHPAD_LEN: usize = 9;

/// Conversion resolution, as stored in the configuration register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    /// 0.5 °C steps
    NineBit = 0b00,
    /// 0.25 °C steps
    TenBit = 0b01,
    /// 0.125 °C steps
    ElevenBit = 0b10,
    /// 0.0625 °C steps
    TwelveBit = 0b11,
}

impl Resolution {
    /// Decode the R1:R0 bits of a configuration register value
    pub fn from_config_register(config: u8) -> Self {
        match (config >> 5) & 0b11 {
            0b00 => Resolution::NineBit,
            0b01 => Resolution::TenBit,
            0b10 => Resolution::ElevenBit,
            _ => Resolution::TwelveBit,
        }
    }

    /// Number of significant bits
    pub fn bits(self) -> u8 {
        9 + self as u8
    }

    /// Worst-case conversion time in milliseconds
    pub fn conversion_time_ms(self) -> u64 {
        match self {
            Resolution::NineBit => 94,
            Resolution::TenBit => 188,
            Resolution::ElevenBit => 375,
            Resolution::TwelveBit => 750,
        }
    }
}

/// The 9 bytes read back by Read-Scratchpad
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scratchpad([u8; SCRATCHPAD_LEN]);

impl Scratchpad {
    pub fn new(bytes: [u8; SCRATCHPAD_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SCRATCHPAD_LEN] {
        &self.0
    }

    /// CRC-8 computed over bytes 0-7
    pub fn computed_crc(&self) -> u8 {
        crc8(&self.0[..SCRATCHPAD_LEN - 1])
    }

    /// CRC transmitted by the sensor in byte 8
    pub fn transmitted_crc(&self) -> u8 {
        self.0[SCRATCHPAD_LEN - 1]
    }

    pub fn check_crc(&self) -> bool {
        self.computed_crc() == self.transmitted_crc()
    }

    /// Fail with `DataIntegrity` when the CRC does not match.
    pub fn verify(&self) -> Result<()> {
        let computed = self.computed_crc();
        let expected = self.transmitted_crc();
        if computed != expected {
            return Err(ThermowireError::DataIntegrity { computed, expected });
        }
        Ok(())
    }

    /// Temperature register bytes, LSB first
    pub fn temperature_bytes(&self) -> (u8, u8) {
        (self.0[0], self.0[1])
    }

    /// Temperature register as a little-endian 16-bit word
    pub fn raw_temperature(&self) -> u16 {
        u16::from_le_bytes([self.0[0], self.0[1]])
    }

    /// High alarm threshold in whole degrees
    pub fn alarm_high(&self) -> i8 {
        self.0[2] as i8
    }

    /// Low alarm threshold in whole degrees
    pub fn alarm_low(&self) -> i8 {
        self.0[3] as i8
    }

    pub fn config_register(&self) -> u8 {
        self.0[4]
    }

    pub fn resolution(&self) -> Resolution {
        Resolution::from_config_register(self.config_register())
    }
}

impl TryFrom<&[u8]> for Scratchpad {
    type Error = ThermowireError;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        let array: [u8; SCRATCHPAD_LEN] = bytes.try_into().map_err(|_| {
            ThermowireError::AdapterIo(format!(
                "expected {} scratchpad bytes, got {}",
                SCRATCHPAD_LEN,
                bytes.len()
            ))
        })?;
        Ok(Self(array))
    }
}
