//! Binary entry point for the harvester CLI

use clap::Parser;
use std::path::Path;
use tracing::error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer as _};
use zakupki_harvester::cli::{Cli, Commands};
use zakupki_harvester::shutdown::{self, ShutdownCoordinator};

/// Initialize tracing with console output plus a plain-text log file
/// next to the state file. The process is meant to run unattended for
/// months, so the file copy is what actually gets read after the fact.
fn init_tracing(log_dir: &Path) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let json_format = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("zakupki_harvester=info"));

    let console = if json_format {
        tracing_subscriber::fmt::layer().json().boxed()
    } else {
        tracing_subscriber::fmt::layer().boxed()
    };

    let (file_layer, guard) = match std::fs::create_dir_all(log_dir) {
        Ok(()) => {
            let appender = tracing_appender::rolling::never(log_dir, "harvester.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        Err(e) => {
            eprintln!("cannot create log directory {}: {e}", log_dir.display());
            (None, None)
        }
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file_layer)
        .init();

    guard
}

#[tokio::main]
async fn main() {
    // Arguments are parsed before tracing comes up because the log
    // file lives next to the state file the user pointed us at.
    let cli = Cli::parse();

    let log_dir = cli
        .state_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let _log_guard = init_tracing(log_dir);

    // Install global shutdown coordinator and Ctrl+C handler
    let shutdown = ShutdownCoordinator::shared();
    shutdown::install_global(shutdown.clone());
    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("Ctrl+C received - finishing the current window before exit");
                shutdown.request_shutdown();
            }
        }
    });

    let result = match &cli.command {
        Commands::Run(args) => args.execute(&cli).await,
        Commands::Status(args) => args.execute(&cli),
    };

    if let Err(e) = result {
        error!("Command failed: {e}");
        std::process::exit(1);
    }
}
