//! Static configuration loaded once at startup

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::adapter::{AdapterModel, DefaultAdapter};
use crate::error::{Result, ThermowireError};
use crate::temperature::Decoding;

/// Upper bound accepted for any timeout setting, in milliseconds
pub const MAX_TIMEOUT_MS: u64 = 60_000;

fn validate_timeout(name: &str, timeout_ms: u64) -> Result<()> {
    if timeout_ms == 0 || timeout_ms > MAX_TIMEOUT_MS {
        return Err(ThermowireError::Config(format!(
            "{} must be between 1 and {} ms, got {}",
            name, MAX_TIMEOUT_MS, timeout_ms
        )));
    }
    Ok(())
}

/// Adapter connection configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdapterConfig {
    /// Serial device path; located by USB VID/PID when unset
    pub device: Option<String>,
    /// Per-transfer timeout in milliseconds
    pub timeout_ms: u64,
    /// Longest time a write waits for the bus to be released
    pub conversion_timeout_ms: u64,
    /// USB vendor ID used for auto-detection
    pub usb_vid: u16,
    /// USB product ID used for auto-detection
    pub usb_pid: u16,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            device: None,
            timeout_ms: DefaultAdapter::DEFAULT_TIMEOUT_MS,
            conversion_timeout_ms: DefaultAdapter::DEFAULT_CONVERSION_TIMEOUT_MS,
            usb_vid: DefaultAdapter::USB_VID,
            usb_pid: DefaultAdapter::USB_PID,
        }
    }
}

/// Sensor configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    /// Adapter pin the sensor's DQ line is wired to
    pub pin: u8,
    /// Temperature register decoding
    pub decoding: Decoding,
}

/// Static configuration for thermowire.
///
/// Located at `~/.config/thermowire/config.toml` by default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticConfig {
    pub adapter: AdapterConfig,
    pub sensor: SensorConfig,
}

impl StaticConfig {
    /// Parse StaticConfig from TOML string.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize StaticConfig to TOML string.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| ThermowireError::Config(e.to_string()))
    }

    /// Load from `path`, falling back to defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Write to `path`, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        validate_timeout("adapter.timeout_ms", self.adapter.timeout_ms)?;
        validate_timeout(
            "adapter.conversion_timeout_ms",
            self.adapter.conversion_timeout_ms,
        )?;
        if let Some(device) = &self.adapter.device {
            if device.trim().is_empty() {
                return Err(ThermowireError::Config(
                    "adapter.device cannot be empty".to_string(),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_default_static_config() {
        let config = StaticConfig::default();
        assert_eq!(config.adapter.device, None);
        assert_eq!(config.adapter.timeout_ms, 1000);
        assert_eq!(config.adapter.usb_vid, 0x0403);
        assert_eq!(config.sensor.pin, 0);
        assert_eq!(config.sensor.decoding, Decoding::Unsigned);
    }

    #[test]
    fn test_static_config_serialization() {
        let config = StaticConfig::default();
        let toml_str = config.to_toml().unwrap();

        assert!(toml_str.contains("[adapter]"));
        assert!(toml_str.contains("[sensor]"));
        assert!(toml_str.contains("decoding = \"unsigned\""));
    }

    #[test]
    fn test_static_config_deserialization() {
        let toml_str = r#"
            [adapter]
            device = "/dev/ttyUSB1"
            timeout_ms = 250

            [sensor]
            pin = 0
            decoding = "sign_extended"
        "#;

        let config = StaticConfig::from_toml(toml_str).unwrap();
        assert_eq!(config.adapter.device.as_deref(), Some("/dev/ttyUSB1"));
        assert_eq!(config.adapter.timeout_ms, 250);
        // Unspecified fields keep their defaults
        assert_eq!(config.adapter.conversion_timeout_ms, 1000);
        assert_eq!(config.adapter.usb_pid, 0x6001);
        assert_eq!(config.sensor.decoding, Decoding::SignExtended);
    }

    #[test]
    fn test_empty_file_is_default() {
        let config = StaticConfig::from_toml("").unwrap();
        assert_eq!(config, StaticConfig::default());
    }

    #[test]
    fn test_validation_rejects_zero_timeout() {
        let toml_str = r#"
            [adapter]
            timeout_ms = 0
        "#;
        let err = StaticConfig::from_toml(toml_str).unwrap_err();
        assert!(matches!(err, ThermowireError::Config(_)));
    }

    #[test]
    fn test_validation_rejects_oversized_timeouts() {
        let err =
            StaticConfig::from_toml("[adapter]\nconversion_timeout_ms = 90000\n").unwrap_err();
        assert!(matches!(err, ThermowireError::Config(_)));
        assert!(err.to_string().contains("adapter.conversion_timeout_ms"));

        assert!(StaticConfig::from_toml("[adapter]\ntimeout_ms = 60001\n").is_err());
        assert!(StaticConfig::from_toml("[adapter]\nconversion_timeout_ms = 60000\n").is_ok());
    }

    #[test]
    fn test_validation_rejects_empty_device() {
        let mut config = StaticConfig::default();
        config.adapter.device = Some("  ".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_missing_file_returns_default() {
        let path = PathBuf::from("/nonexistent/thermowire/config.toml");
        let config = StaticConfig::load(&path).unwrap();
        assert_eq!(config, StaticConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = StaticConfig::default();
        config.adapter.device = Some("/dev/ttyUSB3".to_string());
        config.sensor.decoding = Decoding::SignExtended;
        config.save(&path).unwrap();

        let loaded = StaticConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }
}
