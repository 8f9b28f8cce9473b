//! CLI configuration management
//!
//! Resolves the effective settings from the static config file, the
//! environment, and command-line flags.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thermowire_core::{default_config_path, Decoding, StaticConfig, MAX_TIMEOUT_MS};

/// Effective CLI configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CliConfig {
    /// Serial device path; located by USB VID/PID when unset
    pub device: Option<String>,

    /// Adapter pin the sensor is wired to
    pub pin: u8,

    /// Per-transfer timeout in milliseconds
    pub timeout_ms: u64,

    /// Longest wait for a temperature conversion in milliseconds
    pub conversion_timeout_ms: u64,

    /// Temperature register decoding
    pub decoding: Decoding,

    /// Default output format
    pub output_format: String,

    /// USB identity used for auto-detection
    pub usb_vid: u16,
    pub usb_pid: u16,

    /// Config file the settings were resolved against
    pub config_path: PathBuf,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self::from_static(&StaticConfig::default(), default_config_path())
    }
}

impl CliConfig {
    fn from_static(config: &StaticConfig, config_path: PathBuf) -> Self {
        Self {
            device: config.adapter.device.clone(),
            pin: config.sensor.pin,
            timeout_ms: config.adapter.timeout_ms,
            conversion_timeout_ms: config.adapter.conversion_timeout_ms,
            decoding: config.sensor.decoding,
            output_format: "table".to_string(),
            usb_vid: config.adapter.usb_vid,
            usb_pid: config.adapter.usb_pid,
            config_path,
        }
    }

    /// Create a new builder for constructing configuration
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }
}

/// Builder for CLI configuration with validation and priority chain support
///
/// Priority chain (lowest to highest):
/// 1. Defaults
/// 2. Config file
/// 3. Environment variables
/// 4. CLI arguments
///
/// Each layer overrides whatever the previous ones set, so the `with_*`
/// calls must be made in that order.
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config_path: Option<PathBuf>,
    file: Option<StaticConfig>,
    device: Option<String>,
    pin: Option<u8>,
    timeout_ms: Option<u64>,
    decoding: Option<Decoding>,
    output_format: Option<String>,
}

impl ConfigBuilder {
    /// Create a new configuration builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the static config file.
    ///
    /// `path` overrides the default location. A missing file yields the
    /// defaults; an unreadable or invalid one is an error.
    pub fn with_config_file(mut self, path: Option<&Path>, load_file: bool) -> Result<Self> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);

        if load_file {
            let config = StaticConfig::load(&path)
                .with_context(|| format!("Failed to load config file {}", path.display()))?;
            self.file = Some(config);
        }

        self.config_path = Some(path);
        Ok(self)
    }

    /// Set device path (with validation)
    pub fn with_device(mut self, device: impl Into<String>) -> Result<Self> {
        let device = device.into();
        Self::validate_device(&device)?;
        self.device = Some(device);
        Ok(self)
    }

    /// Set sensor pin
    pub fn with_pin(mut self, pin: u8) -> Self {
        self.pin = Some(pin);
        self
    }

    /// Set timeout (with validation)
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Result<Self> {
        Self::validate_timeout(timeout_ms)?;
        self.timeout_ms = Some(timeout_ms);
        Ok(self)
    }

    pub fn with_decoding(mut self, decoding: Decoding) -> Self {
        self.decoding = Some(decoding);
        self
    }

    /// Set output format (with validation)
    pub fn with_output_format(mut self, format: impl Into<String>) -> Result<Self> {
        let format = format.into();
        Self::validate_output_format(&format)?;
        self.output_format = Some(format);
        Ok(self)
    }

    /// Apply environment variable overrides
    ///
    /// Invalid values are ignored.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(device) = std::env::var("THERMOWIRE_DEVICE") {
            if Self::validate_device(&device).is_ok() {
                self.device = Some(device);
            }
        }

        if let Ok(pin) = std::env::var("THERMOWIRE_PIN") {
            if let Ok(pin) = pin.parse() {
                self.pin = Some(pin);
            }
        }

        if let Ok(timeout) = std::env::var("THERMOWIRE_TIMEOUT_MS") {
            if let Ok(timeout) = timeout.parse() {
                if Self::validate_timeout(timeout).is_ok() {
                    self.timeout_ms = Some(timeout);
                }
            }
        }

        if let Ok(decoding) = std::env::var("THERMOWIRE_DECODING") {
            if let Ok(decoding) = decoding.parse() {
                self.decoding = Some(decoding);
            }
        }

        if let Ok(format) = std::env::var("THERMOWIRE_FORMAT") {
            if Self::validate_output_format(&format).is_ok() {
                self.output_format = Some(format);
            }
        }

        self
    }

    /// Build the final configuration with validation
    pub fn build(self) -> Result<CliConfig> {
        let config_path = self.config_path.unwrap_or_else(default_config_path);
        let file = self.file.unwrap_or_default();
        let defaults = CliConfig::from_static(&file, config_path);

        let config = CliConfig {
            device: self.device.or(defaults.device),
            pin: self.pin.unwrap_or(defaults.pin),
            timeout_ms: self.timeout_ms.unwrap_or(defaults.timeout_ms),
            decoding: self.decoding.unwrap_or(defaults.decoding),
            output_format: self.output_format.unwrap_or(defaults.output_format),
            ..defaults
        };

        // Validate final values
        if let Some(device) = &config.device {
            Self::validate_device(device)?;
        }
        Self::validate_timeout(config.timeout_ms)?;
        Self::validate_timeout(config.conversion_timeout_ms)?;
        Self::validate_output_format(&config.output_format)?;

        Ok(config)
    }

    fn validate_device(device: &str) -> Result<()> {
        if device.trim().is_empty() {
            return Err(anyhow::anyhow!("Device path cannot be empty"));
        }
        Ok(())
    }

    /// Validate output format
    fn validate_output_format(format: &str) -> Result<()> {
        match format {
            "table" | "json" => Ok(()),
            _ => Err(anyhow::anyhow!(
                "Invalid output format '{}'. Must be 'table' or 'json'",
                format
            )),
        }
    }

    /// Validate timeout value
    fn validate_timeout(timeout_ms: u64) -> Result<()> {
        if timeout_ms == 0 {
            return Err(anyhow::anyhow!("Timeout must be greater than 0"));
        }

        if timeout_ms > MAX_TIMEOUT_MS {
            return Err(anyhow::anyhow!(
                "Timeout must be less than or equal to {} ms",
                MAX_TIMEOUT_MS
            ));
        }

        Ok(())
    }
}
