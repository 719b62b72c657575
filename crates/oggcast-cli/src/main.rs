//! oggcast
//!
//! Reads an Ogg stream from standard input and relays it to an Icecast
//! server as a source client.

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use clap::error::ErrorKind;
use tracing::{error, info, warn};

use oggcast_cli::Cli;
use oggcast_core::tracing_init::init_tracing;
use oggcast_core::{ControlFlags, Orchestrator};
use oggcast_icecast::IcecastSession;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            // Usage errors and -h both exit 1; only --version is a success.
            return if e.kind() == ErrorKind::DisplayVersion {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            };
        }
    };

    init_tracing(&cli.log_level, cli.log_json);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    info!(version = env!("CARGO_PKG_VERSION"), "Starting oggcast");

    let config = cli.into_config();
    let flags = Arc::new(ControlFlags::new());
    let mut orchestrator = Orchestrator::new(
        IcecastSession::new(),
        tokio::io::stdin(),
        Arc::clone(&flags),
    );
    orchestrator.configure(&config)?;

    #[cfg(unix)]
    let mut signals = oggcast_core::signals::SignalBridge::new(Arc::clone(&flags));
    #[cfg(unix)]
    signals
        .install_reload()
        .context("Failed to install SIGUSR1 handler")?;

    orchestrator.prime().await;
    orchestrator.open().await.with_context(|| {
        format!(
            "Error connecting to {}:{}{}",
            config.host, config.port, config.mount
        )
    })?;

    #[cfg(unix)]
    signals
        .install_control()
        .context("Failed to install signal handlers")?;

    let outcome = orchestrator.forward().await;
    if let Some(e) = &outcome.send_error {
        warn!(error = %e, total = outcome.total, "Stream ended by send failure");
    }

    orchestrator.close().await;
    info!(total = outcome.total, sends = outcome.sends, "Stream finished");
    Ok(())
}
