use anyhow::{Context, Result};
use clap::Parser;
use lucy::cli::{handle_command, Cli, Command};
use lucy::core::ConfigManager;
use std::fs::OpenOptions;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;
    handle_command(cli).await
}

fn default_filter(cli: &Cli) -> &'static str {
    match (&cli.command, cli.verbose) {
        (_, v) if v >= 2 => "lucy=debug,rocket=info",
        (Command::Serve { .. }, _) | (_, 1) => "lucy=info,rocket=warn",
        _ => "lucy=warn,rocket=warn",
    }
}

fn init_logging(cli: &Cli) -> Result<()> {
    // Only the log file location is read here; the rest of the configuration
    // is loaded once the command runs.
    let log_file = ConfigManager::load_from(&cli.config)
        .ok()
        .and_then(|config| config.log_file);

    let json_layer = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            Some(
                fmt::layer()
                    .json()
                    .with_writer(file)
                    .with_current_span(true)
                    .with_span_list(false),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(json_layer)
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_filter(cli))),
        )
        .init();

    Ok(())
}
