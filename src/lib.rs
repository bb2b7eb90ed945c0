//! # Supply Chain Watchdog
//!
//! AI-generated supply chain risk reports for a commodity, company or sector.
//!
//! This library provides:
//! - A web form and JSON API for requesting an analysis
//! - An agent bundle (model, fixed instructions, news search capability)
//! - A model runtime that lets the LLM call `search_news` before answering
//! - Utilities for rendering the project diagrams and publishing the article
//!
//! ## Flow
//!
//! 1. The user submits a topic and a model
//! 2. A fresh `AgentConfig` is built around the DuckDuckGo news adapter
//! 3. The runtime is asked to "Analyze the supply chain risks regarding: {topic}"
//! 4. Its final markdown is rendered as the report
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use supply_chain_watchdog::agent::{build_agent, run_analysis, ModelId, OpenAiRuntime};
//! use supply_chain_watchdog::{config::Config, tools::DuckDuckGoNews};
//!
//! let config = Config::from_env()?;
//! let runtime = OpenAiRuntime::new(&config);
//! let agent = build_agent(ModelId::Gpt4o, Arc::new(DuckDuckGoNews::new(&config.news)?));
//! let report = run_analysis(&runtime, &agent, "Lithium").await?;
//! ```

pub mod agent;
pub mod api;
pub mod config;
pub mod diagrams;
pub mod llm;
pub mod publish;
pub mod tools;

#[cfg(test)]
mod test_support;

pub use config::Config;
