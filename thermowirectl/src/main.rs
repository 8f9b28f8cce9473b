//! thermowire CLI
//!
//! Command-line interface for reading a DS18B20 through a USB 1-Wire adapter.

use anyhow::Result;
use clap::Parser;
use thermowirectl::cli::{
    generate_completion, handle_config, handle_ports, handle_read, Cli, Commands, ConfigCommands,
    OutputFormat,
};
use thermowirectl::config::CliConfig;
use tracing::debug;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    if let Commands::Completion { shell } = cli.command {
        generate_completion(shell);
        return Ok(());
    }

    // Build configuration using priority chain: defaults → file → env → CLI args
    let mut builder = CliConfig::builder();

    // Load config file (unless --no-config is specified). `config init` and
    // `config path` only need its location, so a broken file can be replaced.
    let needs_file = !matches!(
        cli.command,
        Commands::Config {
            command: ConfigCommands::Init { .. } | ConfigCommands::Path
        }
    );
    builder = builder.with_config_file(cli.config.as_deref(), !cli.no_config && needs_file)?;

    // Apply environment variable overrides
    builder = builder.with_env_overrides();

    // Apply CLI argument overrides (highest priority)
    if let Some(ref device) = cli.device {
        builder = builder.with_device(device)?;
    }
    if let Some(pin) = cli.pin {
        builder = builder.with_pin(pin);
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        builder = builder.with_timeout_ms(timeout_ms)?;
    }
    if let Some(decoding) = cli.decoding {
        builder = builder.with_decoding(decoding.into());
    }
    if let Some(ref format) = cli.format {
        builder = builder.with_output_format(format.as_str())?;
    }

    // Build final configuration with validation
    let config = match builder.build() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            if cli.verbose {
                eprintln!("Error details: {:?}", e);
            }
            std::process::exit(1);
        }
    };

    let output_format = match config.output_format.as_str() {
        "json" => OutputFormat::Json,
        _ => OutputFormat::Table,
    };
    debug!("Effective configuration: {:?}", config);

    let result = match cli.command {
        Commands::Read { sentinel } => {
            handle_read(&config, sentinel, cli.verbose, &output_format).await
        }
        Commands::Ports => handle_ports(&config, &output_format),
        Commands::Config { command } => handle_config(command, &config, &output_format),
        Commands::Completion { .. } => Ok(()),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        if cli.verbose {
            eprintln!("Error details: {:?}", e);
        }
        std::process::exit(1);
    }

    Ok(())
}

/// Initialize tracing subscriber for logging
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
