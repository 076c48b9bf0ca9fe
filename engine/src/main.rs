// BCI Testbench
// Main entry point for the bci-testbench binary

use bci_testbench::cli::{Cli, Command};
use bci_testbench::config::Config;
use bci_testbench::handlers::{handle_relay, handle_signal};
use bci_testbench::telemetry::init_telemetry_with_level;
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration (or use custom path if provided)
    let config = if let Some(config_path) = &cli.config {
        Config::load_from_path(config_path)?
    } else {
        Config::load_or_create()?
    };

    // --log wins over the config file; RUST_LOG wins over both
    let level = cli.log.as_deref().unwrap_or(&config.core.log_level);
    init_telemetry_with_level(level);

    let version = env!("CARGO_PKG_VERSION");
    let commit = env!("GIT_COMMIT_HASH");
    let timestamp = env!("BUILD_TIMESTAMP");

    tracing::info!("BCI Testbench v{} ({} - {})", version, commit, timestamp);

    match cli.command {
        Command::Signal { action } => {
            tracing::debug!("Signal command: {:?}", action);
            handle_signal(action, &config).await
        }

        Command::Relay { action } => {
            tracing::debug!("Relay command: {:?}", action);
            handle_relay(action, &config).await
        }
    }
}
