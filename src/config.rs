//! Configuration management for Supply Chain Watchdog.
//!
//! Each binary builds its own configuration once at startup and passes it
//! into the components it constructs. Values come from environment variables
//! (a `.env` file is loaded first by the binaries):
//!
//! Server (`Config`):
//! - `OPENAI_API_KEY` - Required. API key for the model runtime.
//! - `OPENAI_BASE_URL` - Optional. Defaults to `https://api.openai.com/v1`.
//! - `DEFAULT_MODEL` - Optional. `gpt-4o` or `gpt-3.5-turbo`. Defaults to `gpt-4o`.
//! - `HOST` - Optional. Server host. Defaults to `127.0.0.1`.
//! - `PORT` - Optional. Server port. Defaults to `8501`.
//! - `MAX_ITERATIONS` - Optional. Runtime tool-loop ceiling. Defaults to `10`.
//! - `NEWS_SEARCH_URL` - Optional. News backend base URL. Defaults to `https://duckduckgo.com`.
//! - `NEWS_REGION` - Optional. News region code. Defaults to `wt-wt`.
//!
//! Diagram generator (`DiagramConfig`):
//! - `MERMAID_INK_URL` - Optional. Defaults to `https://mermaid.ink/img/`.
//! - `DIAGRAM_OUTPUT_DIR` - Optional. Defaults to `images`.
//!
//! Article publisher (`PublisherConfig`):
//! - `DEVTO_API_KEY` - Required.
//! - `DEVTO_API_URL` - Optional. Defaults to `https://dev.to/api/articles`.
//! - `ARTICLE_PATH` - Optional. Defaults to `supply_chain_watchdog/article.md`.

use std::path::PathBuf;
use thiserror::Error;

use crate::agent::ModelId;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_NEWS_SEARCH_URL: &str = "https://duckduckgo.com";
pub const DEFAULT_MERMAID_INK_URL: &str = "https://mermaid.ink/img/";
pub const DEFAULT_DEVTO_API_URL: &str = "https://dev.to/api/articles";
pub const DEFAULT_ARTICLE_PATH: &str = "supply_chain_watchdog/article.md";

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Model runtime API key
    pub api_key: String,

    /// Model runtime base URL (OpenAI-compatible)
    pub api_base_url: String,

    /// Model preselected in the form
    pub default_model: ModelId,

    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Maximum tool-loop iterations inside the model runtime
    pub max_iterations: usize,

    /// News search backend
    pub news: NewsConfig,
}

/// News search backend configuration.
#[derive(Debug, Clone)]
pub struct NewsConfig {
    /// Base URL of the DuckDuckGo-compatible backend
    pub base_url: String,

    /// Region code sent with every query
    pub region: String,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_NEWS_SEARCH_URL.to_string(),
            region: "wt-wt".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if `OPENAI_API_KEY` is not set.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("OPENAI_API_KEY")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar("OPENAI_API_KEY".to_string()))?;

        let api_base_url =
            lookup("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string());

        let default_model = match lookup("DEFAULT_MODEL") {
            Some(raw) => raw
                .parse::<ModelId>()
                .map_err(|e| ConfigError::InvalidValue("DEFAULT_MODEL".to_string(), e))?,
            None => ModelId::default(),
        };

        let host = lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string());

        let port = lookup("PORT")
            .unwrap_or_else(|| "8501".to_string())
            .parse()
            .map_err(|e| ConfigError::InvalidValue("PORT".to_string(), format!("{}", e)))?;

        let max_iterations = lookup("MAX_ITERATIONS")
            .unwrap_or_else(|| "10".to_string())
            .parse()
            .map_err(|e| {
                ConfigError::InvalidValue("MAX_ITERATIONS".to_string(), format!("{}", e))
            })?;

        let defaults = NewsConfig::default();
        let news = NewsConfig {
            base_url: lookup("NEWS_SEARCH_URL").unwrap_or(defaults.base_url),
            region: lookup("NEWS_REGION").unwrap_or(defaults.region),
        };

        Ok(Self {
            api_key,
            api_base_url,
            default_model,
            host,
            port,
            max_iterations,
            news,
        })
    }
}

/// Diagram generator configuration.
#[derive(Debug, Clone)]
pub struct DiagramConfig {
    /// Rendering endpoint; the base64 payload is appended directly
    pub render_url: String,

    /// Directory the PNG files are written to
    pub output_dir: PathBuf,
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            render_url: DEFAULT_MERMAID_INK_URL.to_string(),
            output_dir: PathBuf::from("images"),
        }
    }
}

impl DiagramConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            render_url: lookup("MERMAID_INK_URL").unwrap_or(defaults.render_url),
            output_dir: lookup("DIAGRAM_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
        }
    }
}

/// Article publisher configuration.
#[derive(Debug, Clone)]
pub struct PublisherConfig {
    /// dev.to API key, sent in the `api-key` header
    pub api_key: String,

    /// Articles endpoint
    pub endpoint: String,

    /// Markdown file to publish
    pub article_path: PathBuf,
}

impl PublisherConfig {
    /// Load publisher configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if `DEVTO_API_KEY` is not set.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("DEVTO_API_KEY")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar("DEVTO_API_KEY".to_string()))?;

        Ok(Self {
            api_key,
            endpoint: lookup("DEVTO_API_URL").unwrap_or_else(|| DEFAULT_DEVTO_API_URL.to_string()),
            article_path: lookup("ARTICLE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_ARTICLE_PATH)),
        })
    }
}
