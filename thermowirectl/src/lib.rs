//! thermowire CLI library
//!
//! Core functionality of the `thermowirectl` tool. Configuration types are
//! available via [`config::CliConfig`] and [`config::ConfigBuilder`].
//!
//! ```no_run
//! use thermowirectl::config::CliConfig;
//!
//! # fn example() -> anyhow::Result<()> {
//! let config = CliConfig::builder()
//!     .with_config_file(None, true)?
//!     .with_env_overrides()
//!     .with_pin(0)
//!     .build()?;
//! println!("Reading pin {} on {:?}", config.pin, config.device);
//! # Ok(())
//! # }
//! ```

// Internal CLI implementation - not part of public API
#[doc(hidden)]
pub mod cli;

/// Configuration types for the CLI tool.
pub mod config;

// Internal formatting functions - not part of public API
#[doc(hidden)]
pub mod format;
