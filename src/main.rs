#![forbid(unsafe_code)]

mod cli;

use anyhow::Result;
use clap::Parser;
use tracing::{Level as TraceLevel, debug};
use tracing_subscriber::FmtSubscriber;

use easyini::constants::config::LOG_LEVEL_ENV;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Parse log level from environment variable
    let log_level = match std::env::var(LOG_LEVEL_ENV)
        .unwrap_or_else(|_| "info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => TraceLevel::TRACE,
        "debug" => TraceLevel::DEBUG,
        "warn" => TraceLevel::WARN,
        "error" => TraceLevel::ERROR,
        _ => TraceLevel::INFO,
    };

    // Logs go to stderr; stdout carries command output
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    debug!(level = %log_level, "Logging initialized");

    cli::run(cli::Cli::parse()).await
}
