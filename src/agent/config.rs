//! Agent configuration: model, instructions and the bound search capability.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::tools::{NewsSearch, NewsSearchTool, ToolRegistry};

/// Display name of the watchdog agent.
pub const AGENT_NAME: &str = "Supply Chain Watchdog";

/// Fixed instruction set handed to the model on every run.
pub const INSTRUCTIONS: [&str; 5] = [
    "You are an autonomous supply chain risk analyst. Your goal is to monitor news and assess risks for specific commodities or companies.",
    "When you receive a query, use the `search_news` tool to find the latest relevant information (limit to 5-10 results).",
    "Synthesize the gathered information into a comprehensive report.",
    "Your report MUST include:\n\
     1. **Risk Level**: Clearly state (Low, Medium, High).\n\
     2. **Key Drivers**: What factors are influencing this risk (e.g., strikes, shortages, policy).\n\
     3. **Summary**: A detailed summary of the news findings with citations if possible.\n\
     4. **Actionable Advice**: What should supply chain managers do?",
    "Be professional, concise, and data-driven in your analysis.",
];

/// Models selectable in the UI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelId {
    #[default]
    #[serde(rename = "gpt-4o")]
    Gpt4o,
    #[serde(rename = "gpt-3.5-turbo")]
    Gpt35Turbo,
}

impl ModelId {
    pub const ALL: [ModelId; 2] = [ModelId::Gpt4o, ModelId::Gpt35Turbo];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelId::Gpt4o => "gpt-4o",
            ModelId::Gpt35Turbo => "gpt-3.5-turbo",
        }
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModelId::ALL
            .into_iter()
            .find(|m| m.as_str() == s.trim())
            .ok_or_else(|| format!("unsupported model '{}'", s))
    }
}

/// Everything one analysis run needs. Built per request, never mutated.
#[derive(Clone)]
pub struct AgentConfig {
    model: ModelId,
    instructions: &'static [&'static str],
    search: Arc<dyn NewsSearch>,
}

impl AgentConfig {
    pub fn name(&self) -> &'static str {
        AGENT_NAME
    }

    pub fn model(&self) -> ModelId {
        self.model
    }

    pub fn instructions(&self) -> &'static [&'static str] {
        self.instructions
    }

    pub fn search(&self) -> &Arc<dyn NewsSearch> {
        &self.search
    }

    /// The tools exposed to the model: exactly the bound search capability.
    pub fn tools(&self) -> ToolRegistry {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(NewsSearchTool::new(Arc::clone(&self.search))));
        registry
    }
}

impl fmt::Debug for AgentConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentConfig")
            .field("model", &self.model)
            .field("instructions", &self.instructions.len())
            .finish_non_exhaustive()
    }
}

/// Build the watchdog agent for `model`, bound to `search`.
pub fn build_agent(model: ModelId, search: Arc<dyn NewsSearch>) -> AgentConfig {
    AgentConfig {
        model,
        instructions: &INSTRUCTIONS,
        search,
    }
}
