//! Render the project's Mermaid diagrams to PNG files via mermaid.ink.

use supply_chain_watchdog::config::DiagramConfig;
use supply_chain_watchdog::diagrams::{builtin_diagrams, DiagramRenderer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "supply_chain_watchdog=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = DiagramConfig::from_env();
    let renderer = DiagramRenderer::new(&config);

    let summary = renderer.render_all(&builtin_diagrams()).await?;

    for path in &summary.written {
        println!("✅ Saved {}", path.display());
    }
    for (name, error) in &summary.failed {
        println!("❌ Failed to generate {}: {}", name, error);
    }

    Ok(())
}
