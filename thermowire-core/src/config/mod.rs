//! Configuration management for thermowire
//!
//! - [`static_config`] - TOML configuration file (`config.toml`)
//! - [`paths`] - Config file location

pub mod paths;
pub mod static_config;

pub use paths::{config_dir, default_config_path, CONFIG_ENV_VAR};
pub use static_config::{AdapterConfig, SensorConfig, StaticConfig, MAX_TIMEOUT_MS};
