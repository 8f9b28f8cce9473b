//! Error types for thermowire

use thiserror::Error;

/// Core error type for thermowire operations
#[derive(Error, Debug)]
pub enum ThermowireError {
    /// The adapter rejected the pin or its configuration sequence failed
    #[error("Adapter configuration error: {0}")]
    AdapterConfiguration(String),

    /// A bus write or read through the adapter failed
    #[error("Adapter I/O error: {0}")]
    AdapterIo(String),

    /// Scratchpad CRC did not match the transmitted checksum
    #[error("CRC mismatch: computed 0x{computed:02X}, expected 0x{expected:02X}")]
    DataIntegrity { computed: u8, expected: u8 },

    /// No presence pulse after a bus reset
    #[error("No device answered the bus reset")]
    NoPresence,

    /// The 1-Wire line is held low
    #[error("1-Wire bus is shorted")]
    BusShorted,

    /// Timeout errors
    #[error("Operation timed out: {0}")]
    Timeout(String),

    /// Adapter not found on any serial port
    #[error("Adapter not found")]
    DeviceNotFound,

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input or arguments
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// The three failure classes a caller has to tell apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Pin setup or local configuration went wrong
    Configuration,
    /// Talking to the adapter or the bus went wrong
    Io,
    /// The sensor answered but the data is corrupt
    DataIntegrity,
}

impl ThermowireError {
    /// Classify this error.
    pub fn kind(&self) -> FailureKind {
        match self {
            ThermowireError::AdapterConfiguration(_)
            | ThermowireError::Config(_)
            | ThermowireError::InvalidInput(_) => FailureKind::Configuration,
            ThermowireError::DataIntegrity { .. } => FailureKind::DataIntegrity,
            ThermowireError::AdapterIo(_)
            | ThermowireError::NoPresence
            | ThermowireError::BusShorted
            | ThermowireError::Timeout(_)
            | ThermowireError::DeviceNotFound
            | ThermowireError::Io(_) => FailureKind::Io,
        }
    }
}

/// Result type alias for thermowire operations
pub type Result<T> = std::result::Result<T, ThermowireError>;

impl From<toml::de::Error> for ThermowireError {
    fn from(err: toml::de::Error) -> Self {
        ThermowireError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ThermowireError = io_err.into();

        match err {
            ThermowireError::Io(e) => {
                assert_eq!(e.kind(), std::io::ErrorKind::NotFound);
            }
            _ => panic!("Expected Io error"),
        }
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("= broken").unwrap_err();
        let err: ThermowireError = toml_err.into();
        assert!(matches!(err, ThermowireError::Config(_)));
    }

    #[test]
    fn test_error_display() {
        let err = ThermowireError::AdapterConfiguration("pin 7 rejected".to_string());
        assert_eq!(
            format!("{}", err),
            "Adapter configuration error: pin 7 rejected"
        );

        let err = ThermowireError::DataIntegrity {
            computed: 0x1A,
            expected: 0xFF,
        };
        assert_eq!(
            format!("{}", err),
            "CRC mismatch: computed 0x1A, expected 0xFF"
        );

        let err = ThermowireError::DeviceNotFound;
        assert_eq!(format!("{}", err), "Adapter not found");
    }

    #[test]
    fn test_error_kinds_are_distinguishable() {
        assert_eq!(
            ThermowireError::AdapterConfiguration(String::new()).kind(),
            FailureKind::Configuration
        );
        assert_eq!(
            ThermowireError::AdapterIo(String::new()).kind(),
            FailureKind::Io
        );
        assert_eq!(ThermowireError::NoPresence.kind(), FailureKind::Io);
        assert_eq!(
            ThermowireError::Timeout(String::new()).kind(),
            FailureKind::Io
        );
        assert_eq!(
            ThermowireError::DataIntegrity {
                computed: 0,
                expected: 1
            }
            .kind(),
            FailureKind::DataIntegrity
        );
    }
}
