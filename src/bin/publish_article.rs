//! Publish the project article to dev.to.
//!
//! Exits non-zero when `DEVTO_API_KEY` is missing or the article file does
//! not exist. Any other API answer is printed and the program exits normally.

use std::process::ExitCode;

use supply_chain_watchdog::config::PublisherConfig;
use supply_chain_watchdog::publish;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "supply_chain_watchdog=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    publish::run(PublisherConfig::from_env()).await
}
