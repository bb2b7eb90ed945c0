//! The report generation call.

use serde::Serialize;

use super::runtime::{AnalysisError, ModelRuntime};
use super::AgentConfig;

/// Final model output for one analysis. The four report sections live only
/// inside `content`; nothing is parsed out of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub content: String,
}

/// The request text sent to the runtime for `topic`.
pub fn analysis_request(topic: &str) -> String {
    format!("Analyze the supply chain risks regarding: {}", topic)
}

/// Run one analysis for `topic` and return the runtime's text verbatim.
pub async fn run_analysis(
    runtime: &dyn ModelRuntime,
    agent: &AgentConfig,
    topic: &str,
) -> Result<Report, AnalysisError> {
    tracing::info!(topic, model = %agent.model(), "Running supply chain analysis");

    let content = runtime.run(agent, &analysis_request(topic)).await?;

    tracing::info!(topic, chars = content.len(), "Analysis complete");
    Ok(Report { content })
}
