//! HTTP API and web front end.
//!
//! ## Endpoints
//!
//! - `GET /` - Analysis form
//! - `POST /analyze` - Form submission, renders the report page
//! - `POST /api/analyze` - JSON analysis
//! - `GET /api/health` - Health check

mod routes;
pub mod types;
pub mod ui;

pub use routes::{router, AppState};

use std::sync::Arc;

use crate::agent::OpenAiRuntime;
use crate::config::Config;
use crate::tools::DuckDuckGoNews;

/// Start the HTTP server with the given configuration.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let search = DuckDuckGoNews::new(&config.news)?;
    let state = Arc::new(AppState {
        default_model: config.default_model,
        runtime: Arc::new(OpenAiRuntime::new(&config)),
        search: Arc::new(search),
    });

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(state)).await?;
    Ok(())
}
