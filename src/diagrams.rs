//! Mermaid diagram rendering through mermaid.ink.
//!
//! Each diagram is base64-encoded into the request URL and the returned PNG
//! is written to `{output_dir}/{name}.png`. A failed diagram is logged and
//! skipped; the rest are still attempted.

use std::path::PathBuf;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use thiserror::Error;

use crate::config::DiagramConfig;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("renderer returned status {0}")]
    Status(u16),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("could not write image: {0}")]
    Io(#[from] std::io::Error),
}

/// A named diagram description.
#[derive(Debug, Clone, Copy)]
pub struct Diagram {
    pub name: &'static str,
    pub source: &'static str,
}

/// Result of rendering a batch.
#[derive(Debug, Default)]
pub struct RenderSummary {
    pub written: Vec<PathBuf>,
    pub failed: Vec<(String, String)>,
}

pub struct DiagramRenderer {
    client: reqwest::Client,
    render_url: String,
    output_dir: PathBuf,
}

impl DiagramRenderer {
    pub fn new(config: &DiagramConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            render_url: config.render_url.clone(),
            output_dir: config.output_dir.clone(),
        }
    }

    /// Rendering URL for `source`.
    pub fn image_url(&self, source: &str) -> String {
        format!("{}{}", self.render_url, encode(source))
    }

    /// Render one diagram. Nothing is written unless the renderer answers 200.
    pub async fn render(&self, diagram: &Diagram) -> Result<PathBuf, RenderError> {
        let response = self.client.get(self.image_url(diagram.source)).send().await?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(RenderError::Status(status.as_u16()));
        }

        let bytes = response.bytes().await?;
        let path = self.output_dir.join(format!("{}.png", diagram.name));
        tokio::fs::write(&path, &bytes).await?;
        Ok(path)
    }

    /// Render every diagram in order, continuing past failures.
    ///
    /// Only failing to create the output directory aborts the batch.
    pub async fn render_all(&self, diagrams: &[Diagram]) -> std::io::Result<RenderSummary> {
        tokio::fs::create_dir_all(&self.output_dir).await?;

        let mut summary = RenderSummary::default();
        for diagram in diagrams {
            tracing::info!(name = diagram.name, "Generating diagram");
            match self.render(diagram).await {
                Ok(path) => {
                    tracing::info!(path = %path.display(), "Saved diagram");
                    summary.written.push(path);
                }
                Err(e) => {
                    tracing::warn!(name = diagram.name, error = %e, "Failed to generate diagram");
                    summary.failed.push((diagram.name.to_string(), e.to_string()));
                }
            }
        }
        Ok(summary)
    }
}

/// Base64 (standard alphabet) of the UTF-8 diagram text.
pub fn encode(source: &str) -> String {
    STANDARD.encode(source.as_bytes())
}

/// The diagrams shipped with the project.
pub fn builtin_diagrams() -> [Diagram; 4] {
    [
        Diagram {
            name: "title_diagram",
            source: TITLE_DIAGRAM,
        },
        Diagram {
            name: "architecture_diagram",
            source: ARCHITECTURE_DIAGRAM,
        },
        Diagram {
            name: "sequence_diagram",
            source: SEQUENCE_DIAGRAM,
        },
        Diagram {
            name: "workflow_diagram",
            source: WORKFLOW_DIAGRAM,
        },
    ]
}

const TITLE_DIAGRAM: &str = r#"
graph LR
    subgraph Title[Autonomous Supply Chain Watchdog]
        direction TB
        A[<b>Global News Stream</b><br/>Monitor Real-time Data]:::input
        B[<b>AI Reasoning Agent</b><br/>Analyze, Filter, Assess]:::core
        C[<b>Actionable Intelligence</b><br/>Risk Reports & Alerts]:::output

        A --> B --> C
    end

    classDef input fill:#e1f5fe,stroke:#01579b,stroke-width:2px;
    classDef core fill:#fff3e0,stroke:#ff6f00,stroke-width:4px;
    classDef output fill:#e8f5e9,stroke:#2e7d32,stroke-width:2px;

    style Title fill:#ffffff,stroke:#333,stroke-width:2px
"#;

const ARCHITECTURE_DIAGRAM: &str = r#"
flowchart TB
    User[User / Analyst] -->|Topic Query| UI[Web Dashboard]
    UI -->|Input| Agent[Watchdog Agent]

    subgraph AgentLogic [Model Runtime]
        Planner[Reasoning Engine]
        Tools[search_news]
    end

    Agent --> Planner
    Planner -->|Search Request| Tools
    Tools -->|DuckDuckGo News| Web((The Internet))
    Web -->|News Snippets| Tools
    Tools -->|Context| Planner
    Planner -->|Risk Assessment| Agent
    Agent -->|Final Report| UI

    style User fill:#f9f9f9,stroke:#333
    style UI fill:#e3f2fd,stroke:#2196f3
    style AgentLogic fill:#fff3e0,stroke:#ff9800
    style Web fill:#f3e5f5,stroke:#9c27b0
"#;

const SEQUENCE_DIAGRAM: &str = r#"
sequenceDiagram
    actor U as User
    participant App as Web App
    participant Ag as AI Agent
    participant Tool as Search Tool

    U->>App: Enter Commodity (e.g., "Cobalt")
    App->>Ag: Run Analysis("Cobalt")
    loop Reasoning Loop
        Ag->>Ag: Plan Search Strategy
        Ag->>Tool: search_news("Cobalt supply chain")
        Tool-->>Ag: Returns Article Snippets
        Ag->>Ag: Analyze Supply Risks
    end
    Ag-->>App: Return Risk Report (High/Med/Low)
    App-->>U: Display Report & Actions
"#;

const WORKFLOW_DIAGRAM: &str = r#"
graph TD
    start((Start)) --> input[Input Commodity]
    input --> search[Search Live News]
    search --> analyze{Analyze Impact}

    analyze -->|Disruption Found| assess_risk[Assess Risk Level]
    analyze -->|No Major News| low_risk[Mark as Low Risk]

    assess_risk -->|Critical| high[High Risk Alert]
    assess_risk -->|Moderate| med[Medium Risk Alert]

    high --> report[Generate Report]
    med --> report
    low_risk --> report

    report --> stop((End))

    style start fill:#cfc,stroke:#333
    style stop fill:#cfc,stroke:#333
    style high fill:#ffcdd2,stroke:#f44336
    style med fill:#fff9c4,stroke:#fbc02d
    style low_risk fill:#c8e6c9,stroke:#4caf50
"#;
