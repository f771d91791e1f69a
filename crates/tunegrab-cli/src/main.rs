//! CLI entry point.
//!
//! Loads layered settings, wires stdout as the host transport and dispatches
//! to the command handlers. Logs go to stderr so stdout stays pure NDJSON.

use std::process::ExitCode;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::error;
use tracing_subscriber::EnvFilter;

use tunegrab_cli::{Cli, CliConfig, CliError, Commands, NdjsonEmitter, handlers};

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables before clap reads them
    dotenvy::dotenv().ok();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if cli.verbose { "debug" } else { "info" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!(error = %e, "tunegrab failed");
            eprintln!("Error: {e:#}");
            let code = e.downcast_ref::<CliError>().map_or(1, CliError::exit_code);
            ExitCode::from(code)
        }
    }
}

/// Run the selected command. `Ok(false)` means some session failed.
async fn run(cli: Cli) -> anyhow::Result<bool> {
    let config = CliConfig::load(cli.config.as_deref(), &cli.settings_overrides())?;
    let transport = NdjsonEmitter::new(std::io::stdout());

    let summary = match &cli.command {
        Commands::Track { inputs, collection } => {
            handlers::track::execute(inputs, collection, &config.settings, &transport).await?
        }
        Commands::Exec {
            collection,
            command,
        } => {
            handlers::exec::execute(
                command,
                collection,
                &config.settings,
                &transport,
                CancellationToken::new(),
            )
            .await?
        }
    };

    Ok(summary.is_success())
}
