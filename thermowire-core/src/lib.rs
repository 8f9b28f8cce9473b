//! thermowire core library
//!
//! Shared types for reading DS18B20 sensors through a 1-Wire bus adapter:
//! scratchpad model, CRC-8, temperature decoding, bus commands, adapter
//! models, errors and configuration.

pub mod adapter;
pub mod command;
pub mod config;
pub mod crc;
pub mod error;
pub mod scratchpad;
pub mod temperature;

// Re-export commonly used types
pub use adapter::{validate_pin, AdapterModel, DefaultAdapter, Ds2480b};
pub use command::{convert_sequence, read_scratchpad_sequence, FunctionCommand, RomCommand};
pub use config::{
    config_dir, default_config_path, AdapterConfig, SensorConfig, StaticConfig, CONFIG_ENV_VAR,
    MAX_TIMEOUT_MS,
};
pub use crc::{check_crc, crc8, Crc8, CRC8_TABLE};
pub use error::*;
pub use scratchpad::{Resolution, Scratchpad, SCRATCHPAD_LEN};
pub use temperature::{
    decode_celsius, Decoding, Reading, CELSIUS_PER_LSB, POWER_ON_RESET_RAW, SENTINEL_CELSIUS,
};
