//! Agent module - the supply chain watchdog agent.
//!
//! An analysis is one call into a `ModelRuntime`:
//! 1. Build an `AgentConfig` (model, fixed instructions, news search capability)
//! 2. Send "Analyze the supply chain risks regarding: {topic}"
//! 3. The runtime may call `search_news` any number of times
//! 4. The runtime's final text becomes the `Report`

mod analysis;
mod config;
mod prompt;
mod runtime;

pub use analysis::{analysis_request, run_analysis, Report};
pub use config::{build_agent, AgentConfig, ModelId, AGENT_NAME, INSTRUCTIONS};
pub use prompt::build_system_prompt;
pub use runtime::{AnalysisError, ModelRuntime, OpenAiRuntime};
