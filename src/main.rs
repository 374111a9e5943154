//! devcrew - local multi-agent development team
//!
//! CLI entry point.

#![forbid(unsafe_code)]

use clap::Parser;
use std::path::Path;
use std::process::ExitCode;
use tracing::debug;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;
mod config;

fn init_tracing(verbose: bool, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let default_filter = if verbose { "devcrew=debug" } else { "devcrew=info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "devcrew.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_writer(writer).with_ansi(false)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    guard
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();

    let cli = cli::Cli::parse();

    let app_config = match config::load_config() {
        Ok(app_config) => app_config,
        Err(e) => {
            eprintln!("❌ {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    let _guard = init_tracing(cli.verbose || app_config.verbose, cli.log_dir.as_deref());
    debug!(version = env!("CARGO_PKG_VERSION"), "devcrew starting");

    if cli.command.is_some() && !Path::new(".env").exists() {
        debug!(".env file not found, using defaults. Run 'devcrew setup' to create one.");
    }

    match cli::run(cli, app_config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            debug!(error = %e, "Command failed");
            eprintln!("{}", cli::render_error(&e));
            ExitCode::FAILURE
        }
    }
}
