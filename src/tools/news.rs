//! News search capability and its tool binding.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

use super::Tool;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("query must not be empty")]
    EmptyQuery,

    #[error("{0}")]
    Http(#[from] reqwest::Error),

    #[error("could not obtain a search token for '{0}'")]
    MissingToken(String),
}

/// A single news lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    text: String,
    max_results: usize,
}

impl SearchQuery {
    pub const DEFAULT_MAX_RESULTS: usize = 5;

    /// Build a query; `max_results` defaults to 5 and is raised to at least 1.
    pub fn new(text: impl Into<String>, max_results: Option<usize>) -> Result<Self, SearchError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(SearchError::EmptyQuery);
        }
        Ok(Self {
            text,
            max_results: max_results.unwrap_or(Self::DEFAULT_MAX_RESULTS).max(1),
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn max_results(&self) -> usize {
        self.max_results
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub body: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// What the adapter hands back: results on success, a message on failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Results(Vec<SearchResult>),
    Error(String),
}

impl SearchOutcome {
    pub fn from_result(result: Result<Vec<SearchResult>, SearchError>) -> Self {
        match result {
            Ok(results) => Self::Results(results),
            Err(e) => Self::Error(format!("Error searching news: {}", e)),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Text form fed back to the model as the tool result.
    pub fn to_tool_output(&self) -> String {
        match self {
            Self::Results(results) => {
                serde_json::to_string(results).unwrap_or_else(|_| "[]".to_string())
            }
            Self::Error(message) => message.clone(),
        }
    }
}

/// The news search capability bound into an agent.
#[async_trait]
pub trait NewsSearch: Send + Sync {
    /// Return up to `query.max_results()` items in backend order. Failures
    /// come back as `SearchOutcome::Error`, never as a panic or `Err`.
    async fn search(&self, query: &SearchQuery) -> SearchOutcome;
}

/// Validate the raw arguments and run one search against `search`.
pub async fn search_news(
    search: &dyn NewsSearch,
    query: &str,
    max_results: Option<usize>,
) -> SearchOutcome {
    let query = match SearchQuery::new(query, max_results) {
        Ok(q) => q,
        Err(e) => return SearchOutcome::from_result(Err(e)),
    };

    match search.search(&query).await {
        SearchOutcome::Results(mut results) => {
            results.truncate(query.max_results());
            SearchOutcome::Results(results)
        }
        error => error,
    }
}

/// Exposes a `NewsSearch` to the model as the `search_news` function.
pub struct NewsSearchTool {
    search: Arc<dyn NewsSearch>,
}

impl NewsSearchTool {
    pub fn new(search: Arc<dyn NewsSearch>) -> Self {
        Self { search }
    }
}

#[async_trait]
impl Tool for NewsSearchTool {
    fn name(&self) -> &str {
        "search_news"
    }

    fn description(&self) -> &str {
        "Searches for news articles related to the query using DuckDuckGo. Returns a list of objects with title, body and url."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search query (e.g., \"Lithium supply chain shortage\")"
                },
                "max_results": {
                    "type": "integer",
                    "description": "Maximum number of results to return (default: 5)"
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, args: Value) -> anyhow::Result<String> {
        let query = args["query"].as_str().unwrap_or_default();
        let max_results = args["max_results"].as_u64().map(|n| n as usize);

        let outcome = search_news(self.search.as_ref(), query, max_results).await;
        if let SearchOutcome::Error(message) = &outcome {
            tracing::warn!(query, error = %message, "News search failed");
        }
        Ok(outcome.to_tool_output())
    }
}
