//! atelier - command-line client for the content administration backend.

mod cli;
mod commands;
mod config;

use std::io;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::Cli;
use config::Config;

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` controls the level (default `warn`). When `ATELIER_LOG_DIR` is
/// set, a daily log file is written there as well; the returned guard must
/// live until exit to flush it.
fn init_tracing() -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let (file_layer, guard) = match std::env::var_os("ATELIER_LOG_DIR") {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "atelier.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_writer(writer).with_ansi(false)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .with(filter)
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let _guard = init_tracing();
    info!("atelier starting");

    let config = Config::load()?;
    commands::run(cli, config).await
}
