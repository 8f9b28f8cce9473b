//! Command execution handlers

use anyhow::{Context, Result};
use thermowire_core::{StaticConfig, SENTINEL_CELSIUS};
use thermowire_hardware::{find_adapter, list_ports, SerialConnector, TemperatureReader};
use tracing::{debug, error, warn};

use crate::config::CliConfig;
use crate::format::{format_config, format_ports, format_reading, format_sentinel, format_success};

use super::commands::*;

/// Device path from the config, or the first port matching the adapter's USB identity
fn resolve_device(config: &CliConfig) -> Result<String> {
    match &config.device {
        Some(device) => Ok(device.clone()),
        None => {
            let device = find_adapter(config.usb_vid, config.usb_pid).with_context(|| {
                format!(
                    "No adapter found with USB ID {:04X}:{:04X}; pass --device",
                    config.usb_vid, config.usb_pid
                )
            })?;
            debug!("Auto-detected adapter at {}", device);
            Ok(device)
        }
    }
}

/// Handle read command
pub async fn handle_read(
    config: &CliConfig,
    sentinel: bool,
    debug_uart: bool,
    format: &OutputFormat,
) -> Result<()> {
    let device = match resolve_device(config) {
        Ok(device) => device,
        Err(e) if sentinel => {
            error!("{:#}", e);
            println!("{}", format_sentinel(SENTINEL_CELSIUS, &format.into())?);
            return Ok(());
        }
        Err(e) => return Err(e),
    };
    let connector = SerialConnector::new(&device, config.timeout_ms)
        .with_conversion_timeout_ms(config.conversion_timeout_ms)
        .with_debug_uart(debug_uart);
    let mut reader = TemperatureReader::new(connector).with_decoding(config.decoding);

    if sentinel {
        // A failed pin setup still goes on to read and yields the sentinel
        if reader.initialize(config.pin).await.is_err() {
            warn!("Continuing with an unconfigured pin");
        }
        let celsius = reader.read_temperature_or_sentinel().await;
        println!("{}", format_sentinel(celsius, &format.into())?);
        return Ok(());
    }

    reader
        .initialize(config.pin)
        .await
        .with_context(|| format!("Failed to configure pin {} on {}", config.pin, device))?;
    let reading = reader
        .read_temperature()
        .await
        .context("Failed to read temperature")?;

    println!("{}", format_reading(&reading, &format.into())?);
    Ok(())
}

/// Handle ports command
pub fn handle_ports(config: &CliConfig, format: &OutputFormat) -> Result<()> {
    let ports = list_ports()?;
    println!(
        "{}",
        format_ports(&ports, config.usb_vid, config.usb_pid, &format.into())?
    );
    Ok(())
}

/// Handle config commands
pub fn handle_config(
    command: ConfigCommands,
    current_config: &CliConfig,
    format: &OutputFormat,
) -> Result<()> {
    match command {
        ConfigCommands::Show => {
            println!("{}", format_config(current_config, &format.into())?);
        }
        ConfigCommands::Path => {
            println!("{}", current_config.config_path.display());
        }
        ConfigCommands::Init { force } => {
            let path = &current_config.config_path;
            init_config_file(path, force)?;
            println!(
                "{}",
                format_success(&format!("Wrote default configuration to {}", path.display()))
            );
        }
    }

    Ok(())
}

/// Write a default static config to `path`
pub fn init_config_file(path: &std::path::Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(anyhow::anyhow!(
            "Config file {} already exists (use --force to overwrite)",
            path.display()
        ));
    }

    StaticConfig::default()
        .save(path)
        .with_context(|| format!("Failed to write config file {}", path.display()))
}

/// Generate shell completion script
pub fn generate_completion(shell: clap_complete::Shell) {
    use clap::CommandFactory;
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}
