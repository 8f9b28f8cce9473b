//! CLI command and subcommand definitions

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use thermowire_core::Decoding;

/// DS18B20 temperature reader CLI
#[derive(Parser, Debug)]
#[command(name = "thermowirectl")]
#[command(version, about = "Read DS18B20 sensors through a USB 1-Wire adapter", long_about = None)]
pub struct Cli {
    /// Serial device of the adapter (default: auto-detect by USB VID/PID)
    #[arg(short, long, global = true)]
    pub device: Option<String>,

    /// Adapter pin the sensor is wired to
    #[arg(short, long, global = true)]
    pub pin: Option<u8>,

    /// Per-transfer timeout in milliseconds
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    /// Temperature register decoding
    #[arg(long, global = true, value_enum)]
    pub decoding: Option<DecodingArg>,

    /// Output format (overrides config file)
    #[arg(short, long, global = true, value_enum)]
    pub format: Option<OutputFormat>,

    /// Enable debug logging, including raw adapter traffic
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Don't load config file
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Config file path (default: ~/.config/thermowire/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum DecodingArg {
    /// Register read as an unsigned value
    Unsigned,
    /// Register read as two's complement
    SignExtended,
}

impl From<DecodingArg> for Decoding {
    fn from(arg: DecodingArg) -> Self {
        match arg {
            DecodingArg::Unsigned => Decoding::Unsigned,
            DecodingArg::SignExtended => Decoding::SignExtended,
        }
    }
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum OutputFormat {
    /// Pretty table output
    Table,
    /// JSON output
    Json,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Table => "table",
            OutputFormat::Json => "json",
        }
    }
}

impl From<&OutputFormat> for crate::format::OutputFormat {
    fn from(format: &OutputFormat) -> Self {
        match format {
            OutputFormat::Table => crate::format::OutputFormat::Table,
            OutputFormat::Json => crate::format::OutputFormat::Json,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Configure the pin and read the temperature once
    Read {
        /// Print 200 on any failure instead of an error
        #[arg(long)]
        sentinel: bool,
    },

    /// List serial ports and mark adapters
    Ports,

    /// Show or manage CLI configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completion for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,

    /// Print the config file path
    Path,

    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_read_with_global_flags() {
        let cli = Cli::try_parse_from([
            "thermowirectl",
            "read",
            "--sentinel",
            "--device",
            "/dev/ttyUSB1",
            "--decoding",
            "sign-extended",
            "-f",
            "json",
        ])
        .unwrap();

        assert!(matches!(cli.command, Commands::Read { sentinel: true }));
        assert_eq!(cli.device.as_deref(), Some("/dev/ttyUSB1"));
        assert!(matches!(cli.decoding, Some(DecodingArg::SignExtended)));
        assert!(matches!(cli.format, Some(OutputFormat::Json)));
    }

    #[test]
    fn test_parse_config_init() {
        let cli = Cli::try_parse_from(["thermowirectl", "config", "init", "--force"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Config {
                command: ConfigCommands::Init { force: true }
            }
        ));
    }

    #[test]
    fn test_decoding_arg_conversion() {
        assert_eq!(Decoding::from(DecodingArg::Unsigned), Decoding::Unsigned);
        assert_eq!(
            Decoding::from(DecodingArg::SignExtended),
            Decoding::SignExtended
        );
    }
}
