//! API request and response types.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Form submitted by the web page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalyzeForm {
    /// Commodity, company or sector to analyze
    #[serde(default)]
    pub topic: String,

    /// Selected model id
    pub model: Option<String>,
}

/// JSON request to run an analysis.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeRequest {
    /// Commodity, company or sector to analyze
    #[serde(default)]
    pub topic: String,

    /// Optional model override (uses default if not specified)
    pub model: Option<String>,
}

/// JSON response for a completed analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    /// Unique analysis identifier
    pub id: Uuid,

    /// Topic as analyzed
    pub topic: String,

    /// Model used for this analysis
    pub model: String,

    /// Markdown report
    pub content: String,
}

/// JSON error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,
}
