//! Parlour session host.
//!
//! Speaks JSON lines: client messages on stdin, replies and computer moves
//! on stdout. Logs go to stderr.

use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod host;
mod ledger;
mod protocol;

use config::HostConfig;
use host::HostState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = HostConfig::from_env();
    info!(?config, "Starting Parlour host...");

    let (state, outgoing) = HostState::new(config);
    let stdin = BufReader::new(tokio::io::stdin());

    host::run_host(state, outgoing, stdin, tokio::io::stdout()).await
}
