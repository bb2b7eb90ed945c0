//! Model runtime: the opaque tool-calling loop behind one analysis call.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::Config;
use crate::llm::{ChatMessage, LlmClient, LlmError, OpenAiClient, Role, ToolCall};
use crate::tools::ToolRegistry;

use super::prompt::build_system_prompt;
use super::AgentConfig;

/// Failure of an analysis call. Search failures never surface here; they are
/// handed to the model as tool output.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error("model returned no final answer")]
    EmptyResponse,

    #[error("max iterations ({0}) reached without a final answer")]
    IterationLimit(usize),
}

/// Runs an agent against one request and returns its final text.
#[async_trait]
pub trait ModelRuntime: Send + Sync {
    async fn run(&self, agent: &AgentConfig, request: &str) -> Result<String, AnalysisError>;
}

/// Runtime backed by an OpenAI-compatible chat completion API.
pub struct OpenAiRuntime {
    llm: Arc<dyn LlmClient>,
    max_iterations: usize,
}

impl OpenAiRuntime {
    pub fn new(config: &Config) -> Self {
        let llm = Arc::new(OpenAiClient::new(
            config.api_key.clone(),
            config.api_base_url.clone(),
        ));
        Self::with_client(llm, config.max_iterations)
    }

    pub fn with_client(llm: Arc<dyn LlmClient>, max_iterations: usize) -> Self {
        Self {
            llm,
            max_iterations: max_iterations.max(1),
        }
    }

    async fn execute_tool_call(&self, tools: &ToolRegistry, tool_call: &ToolCall) -> String {
        let args: serde_json::Value = serde_json::from_str(&tool_call.function.arguments)
            .unwrap_or(serde_json::Value::Null);

        match tools.execute(&tool_call.function.name, args).await {
            Ok(output) => output,
            Err(e) => format!("Error: {}", e),
        }
    }
}

#[async_trait]
impl ModelRuntime for OpenAiRuntime {
    async fn run(&self, agent: &AgentConfig, request: &str) -> Result<String, AnalysisError> {
        let model = agent.model().as_str();
        let tools = agent.tools();
        let tool_schemas = tools.get_tool_schemas();

        let mut messages = vec![
            ChatMessage::system(build_system_prompt(agent, &tools)),
            ChatMessage::user(request),
        ];

        for iteration in 0..self.max_iterations {
            tracing::debug!("Runtime iteration {}", iteration + 1);

            let response = self
                .llm
                .chat_completion(model, &messages, Some(&tool_schemas))
                .await?;

            if let Some(tool_calls) = response.tool_calls.filter(|calls| !calls.is_empty()) {
                messages.push(ChatMessage {
                    role: Role::Assistant,
                    content: response.content.clone(),
                    tool_calls: Some(tool_calls.clone()),
                    tool_call_id: None,
                });

                for tool_call in &tool_calls {
                    tracing::info!(
                        tool = %tool_call.function.name,
                        args = %tool_call.function.arguments,
                        "Calling tool"
                    );

                    let result = self.execute_tool_call(&tools, tool_call).await;

                    tracing::debug!(
                        tool = %tool_call.function.name,
                        result = %truncate_for_log(&result, 1000),
                        "Tool returned"
                    );

                    messages.push(ChatMessage::tool_result(tool_call.id.clone(), result));
                }

                continue;
            }

            return response.content.ok_or(AnalysisError::EmptyResponse);
        }

        Err(AnalysisError::IterationLimit(self.max_iterations))
    }
}

/// Truncate a string for logging purposes.
fn truncate_for_log(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }
    let mut end = max_len;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... [truncated]", &s[..end])
}
