//! Chatmate terminal client entry point.
//!
//! # Usage
//!
//! ```bash
//! # Talk to a local backend
//! chatmate
//!
//! # Talk to a deployed backend, with verbose logs
//! chatmate --base-url https://chat.example.com/api/chatmate/api/ --log-level debug
//! ```

use std::{fs::File, sync::Mutex};

use chatmate_client::transport::{DEFAULT_BASE_URL, TransportConfig};
use chatmate_tui::{Runtime, TerminalDriver};
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Chatmate terminal client
#[derive(Parser, Debug)]
#[command(name = "chatmate")]
#[command(about = "Terminal client for the Chatmate chat service")]
#[command(version)]
struct Args {
    /// Base URL of the Chatmate REST API
    #[arg(short, long, env = "CHATMATE_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// File to write logs to (the terminal is owned by the UI)
    #[arg(long, default_value = "chatmate.log")]
    log_file: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    let log_file = File::create(&args.log_file)?;

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(Mutex::new(log_file)).with_ansi(false))
        .with(filter)
        .init();

    tracing::info!(base_url = %args.base_url, "Chatmate starting");

    let config = TransportConfig { base_url: args.base_url };
    let driver = TerminalDriver::new(&config)?;

    Ok(Runtime::new(driver).run().await?)
}
