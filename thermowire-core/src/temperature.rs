//! Fixed-point temperature decoding

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::scratchpad::{Resolution, Scratchpad};

/// Degrees Celsius per LSB of the temperature register at 12-bit resolution.
pub const CELSIUS_PER_LSB: f64 = 0.0625;

/// Value returned by the sentinel read path when the data is unusable.
pub const SENTINEL_CELSIUS: f64 = 200.0;

/// Register value after power-up, before the first conversion (85 °C).
pub const POWER_ON_RESET_RAW: u16 = 0x0550;

/// How the 16-bit temperature register is turned into degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decoding {
    /// `(msb * 256 + lsb) * 0.0625` with no sign handling.
    ///
    /// Readings below 0 °C come out near 4096 °C.
    #[default]
    Unsigned,
    /// Two's complement register, correct over the full -55..125 °C range.
    SignExtended,
}

impl Decoding {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decoding::Unsigned => "unsigned",
            Decoding::SignExtended => "sign_extended",
        }
    }
}

impl fmt::Display for Decoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Decoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "unsigned" => Ok(Decoding::Unsigned),
            "sign_extended" | "sign-extended" | "signed" => Ok(Decoding::SignExtended),
            other => Err(format!(
                "Invalid decoding '{}'. Must be 'unsigned' or 'sign_extended'",
                other
            )),
        }
    }
}

/// Decode the temperature register bytes into degrees Celsius.
pub fn decode_celsius(lsb: u8, msb: u8, decoding: Decoding) -> f64 {
    match decoding {
        Decoding::Unsigned => (msb as u32 * 256 + lsb as u32) as f64 * CELSIUS_PER_LSB,
        Decoding::SignExtended => i16::from_le_bytes([lsb, msb]) as f64 * CELSIUS_PER_LSB,
    }
}

/// A validated temperature reading
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub celsius: f64,
    pub raw: u16,
    pub resolution: Resolution,
    pub decoding: Decoding,
    pub scratchpad: Scratchpad,
}

impl Reading {
    /// Build a reading from a scratchpad whose CRC has already been checked.
    pub fn from_scratchpad(scratchpad: Scratchpad, decoding: Decoding) -> Self {
        let (lsb, msb) = scratchpad.temperature_bytes();
        Self {
            celsius: decode_celsius(lsb, msb, decoding),
            raw: scratchpad.raw_temperature(),
            resolution: scratchpad.resolution(),
            decoding,
            scratchpad,
        }
    }

    /// True when the register still holds the power-on value, meaning no
    /// conversion completed before the read.
    pub fn is_power_on_value(&self) -> bool {
        self.raw == POWER_ON_RESET_RAW
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! assert_close {
        ($left:expr, $right:expr) => {
            assert!(
                ($left - $right).abs() <= 1e-9,
                "left = {}, right = {}",
                $left,
                $right
            );
        };
    }

    #[test]
    fn test_decode_room_temperature() {
        assert_close!(decode_celsius(0x90, 0x01, Decoding::Unsigned), 25.0);
        assert_close!(decode_celsius(0x90, 0x01, Decoding::SignExtended), 25.0);
    }

    #[test]
    fn test_decode_power_on_value() {
        assert_close!(decode_celsius(0x50, 0x05, Decoding::Unsigned), 85.0);
    }

    #[test]
    fn test_decode_fraction() {
        // 0x0191 = 25.0625
        assert_close!(decode_celsius(0x91, 0x01, Decoding::Unsigned), 25.0625);
        // 0x00A2 = 10.125
        assert_close!(decode_celsius(0xA2, 0x00, Decoding::Unsigned), 10.125);
    }

    #[test]
    fn test_decode_negative_unsigned_is_unmasked() {
        // 0xFF5E read as unsigned: 65374 / 16
        assert_close!(decode_celsius(0x5E, 0xFF, Decoding::Unsigned), 4085.875);
    }

    #[test]
    fn test_decode_negative_sign_extended() {
        assert_close!(decode_celsius(0x5E, 0xFF, Decoding::SignExtended), -10.125);
        assert_close!(decode_celsius(0x90, 0xFC, Decoding::SignExtended), -55.0);
        assert_close!(decode_celsius(0xF8, 0xFF, Decoding::SignExtended), -0.5);
    }

    #[test]
    fn test_reading_from_scratchpad() {
        let scratchpad = Scratchpad::new([0x50, 0x05, 0x4B, 0x46, 0x7F, 0xFF, 0x0C, 0x10, 0x1C]);
        let reading = Reading::from_scratchpad(scratchpad, Decoding::Unsigned);

        assert_close!(reading.celsius, 85.0);
        assert_eq!(reading.raw, 0x0550);
        assert_eq!(reading.resolution, Resolution::TwelveBit);
        assert!(reading.is_power_on_value());
    }

    #[test]
    fn test_decoding_parse() {
        assert_eq!("unsigned".parse::<Decoding>().unwrap(), Decoding::Unsigned);
        assert_eq!(
            "Sign-Extended".parse::<Decoding>().unwrap(),
            Decoding::SignExtended
        );
        assert_eq!("signed".parse::<Decoding>().unwrap(), Decoding::SignExtended);
        assert!("kelvin".parse::<Decoding>().is_err());
    }

    #[test]
    fn test_reading_serializes_to_json() {
        let scratchpad = Scratchpad::new([0x90, 0x01, 0x4B, 0x46, 0x7F, 0xFF, 0x0C, 0x10, 0x33]);
        let reading = Reading::from_scratchpad(scratchpad, Decoding::Unsigned);
        let json = serde_json::to_value(reading).unwrap();

        assert_eq!(json["celsius"], 25.0);
        assert_eq!(json["raw"], 400);
        assert_eq!(json["resolution"], "twelve_bit");
        assert_eq!(json["decoding"], "unsigned");
        assert_eq!(json["scratchpad"][8], 0x33);
    }
}
