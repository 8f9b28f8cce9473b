//! Output formatting utilities for the CLI
//!
//! Provides table and JSON formatting with colors.

use anyhow::Result;
use colored::*;
use serde::Serialize;
use thermowire_core::{Reading, SENTINEL_CELSIUS};
use thermowire_hardware::PortInfo;

use tabled::{settings::Style, Table, Tabled};

use crate::config::CliConfig;

/// Output format options
#[derive(Debug, Clone)]
pub enum OutputFormat {
    Table,
    Json,
}

fn hex_bytes(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Format a validated reading
pub fn format_reading(reading: &Reading, format: &OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(reading)?),
        OutputFormat::Table => {
            let scratchpad = reading.scratchpad;
            let mut output = String::new();
            output.push_str(&"DS18B20 Reading".bold().to_string());
            output.push('\n');
            output.push_str(&format!(
                "Temperature: {}",
                format!("{:.4} °C", reading.celsius).green().bold()
            ));
            output.push('\n');
            output.push_str(&format!(
                "Raw: {}",
                format!("0x{:04X}", reading.raw).cyan()
            ));
            output.push('\n');
            output.push_str(&format!(
                "Resolution: {}-bit",
                reading.resolution.bits().to_string().yellow()
            ));
            output.push('\n');
            output.push_str(&format!("Decoding: {}", reading.decoding.as_str().cyan()));
            output.push('\n');
            output.push_str(&format!(
                "Alarm: TH {} / TL {}",
                scratchpad.alarm_high(),
                scratchpad.alarm_low()
            ));
            output.push('\n');
            output.push_str(&format!(
                "Scratchpad: {} (CRC {})",
                hex_bytes(scratchpad.as_bytes()).dimmed(),
                "OK".green()
            ));

            if reading.is_power_on_value() {
                output.push('\n');
                output.push_str(
                    &"Warning: power-on value, conversion may not have run"
                        .yellow()
                        .to_string(),
                );
            }

            Ok(output)
        }
    }
}

/// Result of a sentinel-mode read
#[derive(Debug, Serialize)]
struct SentinelOutput {
    celsius: f64,
    failed: bool,
}

/// Format a plain temperature value returned by the sentinel API
pub fn format_sentinel(celsius: f64, format: &OutputFormat) -> Result<String> {
    let failed = celsius == SENTINEL_CELSIUS;
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&SentinelOutput {
            celsius,
            failed,
        })?),
        OutputFormat::Table => {
            let value = format!("{:.4} °C", celsius);
            Ok(format!(
                "Temperature: {}",
                if failed {
                    value.red().bold()
                } else {
                    value.green().bold()
                }
            ))
        }
    }
}

#[derive(Debug, Serialize, Tabled)]
struct PortRow {
    #[tabled(rename = "Port")]
    name: String,
    #[tabled(rename = "VID:PID")]
    usb_id: String,
    #[tabled(rename = "Product")]
    product: String,
    #[tabled(rename = "Adapter")]
    adapter: bool,
}

/// Format serial ports, marking the ones matching the adapter's USB identity
pub fn format_ports(ports: &[PortInfo], vid: u16, pid: u16, format: &OutputFormat) -> Result<String> {
    let rows: Vec<PortRow> = ports
        .iter()
        .map(|port| PortRow {
            name: port.name.clone(),
            usb_id: match (port.usb_vid, port.usb_pid) {
                (Some(vid), Some(pid)) => format!("{:04X}:{:04X}", vid, pid),
                _ => "-".to_string(),
            },
            product: port.product.clone().unwrap_or_else(|| "-".to_string()),
            adapter: port.matches(vid, pid),
        })
        .collect();

    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&rows)?),
        OutputFormat::Table => {
            if rows.is_empty() {
                return Ok("No serial ports found".dimmed().to_string());
            }
            let table = Table::new(rows).with(Style::rounded()).to_string();
            Ok(format!("{}\n{}", "Serial Ports:".bold(), table))
        }
    }
}

/// Format the effective configuration
pub fn format_config(config: &CliConfig, format: &OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(config)?),
        OutputFormat::Table => {
            #[derive(Tabled)]
            struct ConfigRow {
                #[tabled(rename = "Setting")]
                key: &'static str,
                #[tabled(rename = "Value")]
                value: String,
            }

            let rows = vec![
                ConfigRow {
                    key: "Device",
                    value: config
                        .device
                        .clone()
                        .unwrap_or_else(|| "auto-detect".to_string()),
                },
                ConfigRow {
                    key: "Pin",
                    value: config.pin.to_string(),
                },
                ConfigRow {
                    key: "Timeout",
                    value: format!("{} ms", config.timeout_ms),
                },
                ConfigRow {
                    key: "Conversion timeout",
                    value: format!("{} ms", config.conversion_timeout_ms),
                },
                ConfigRow {
                    key: "Decoding",
                    value: config.decoding.to_string(),
                },
                ConfigRow {
                    key: "Output format",
                    value: config.output_format.clone(),
                },
                ConfigRow {
                    key: "USB VID:PID",
                    value: format!("{:04X}:{:04X}", config.usb_vid, config.usb_pid),
                },
                ConfigRow {
                    key: "Config file",
                    value: config.config_path.display().to_string(),
                },
            ];

            let table = Table::new(rows).with(Style::rounded()).to_string();
            Ok(format!("{}\n{}", "CLI Configuration:".bold(), table))
        }
    }
}

/// Format success message
pub fn format_success(message: &str) -> String {
    format!("{} {}", "✓".green().bold(), message)
}
