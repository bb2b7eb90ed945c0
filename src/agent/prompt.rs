//! System prompt assembly.

use crate::tools::ToolRegistry;

use super::AgentConfig;

/// Build the system prompt from the agent's instructions and tools.
pub fn build_system_prompt(agent: &AgentConfig, tools: &ToolRegistry) -> String {
    let instructions = agent
        .instructions()
        .iter()
        .map(|line| format!("- {}", line))
        .collect::<Vec<_>>()
        .join("\n");

    let tool_descriptions = tools
        .list_tools()
        .iter()
        .map(|t| format!("- **{}**: {}", t.name, t.description))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You are {name}.

## Instructions
{instructions}

## Available Tools
{tool_descriptions}

Use markdown to format your answers."#,
        name = agent.name(),
        instructions = instructions,
        tool_descriptions = tool_descriptions
    )
}
