//! Publishing the project article to dev.to.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

use crate::config::{ConfigError, PublisherConfig};

/// Frontmatter line that makes dev.to publish instead of saving a draft.
pub const PUBLISHED_MARKER: &str = "published: true";

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("Article file not found at {}", .0.display())]
    NotFound(PathBuf),

    #[error("could not read article: {0}")]
    Io(#[from] std::io::Error),

    #[error("request to publishing API failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// What the publishing API said.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    /// 201 Created
    Published { url: String },
    /// Any other status; reported, never retried
    Rejected { status: u16, body: String },
}

#[derive(Deserialize)]
struct CreatedArticle {
    url: String,
}

pub struct Publisher {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
}

impl Publisher {
    pub fn new(config: &PublisherConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: config.api_key.clone(),
            endpoint: config.endpoint.clone(),
        }
    }

    /// POST `body_markdown` as a new article.
    pub async fn publish(&self, body_markdown: &str) -> Result<PublishOutcome, PublishError> {
        let payload = json!({
            "article": {
                "body_markdown": body_markdown
            }
        });

        let response = self
            .client
            .post(&self.endpoint)
            .header("api-key", &self.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::CREATED {
            let created: CreatedArticle = response.json().await?;
            return Ok(PublishOutcome::Published { url: created.url });
        }

        let body = response.text().await.unwrap_or_default();
        Ok(PublishOutcome::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

/// Read the article, failing if the file does not exist.
pub async fn load_article(path: &Path) -> Result<String, PublishError> {
    if !tokio::fs::try_exists(path).await? {
        return Err(PublishError::NotFound(path.to_path_buf()));
    }
    Ok(tokio::fs::read_to_string(path).await?)
}

pub fn has_published_marker(content: &str) -> bool {
    content.contains(PUBLISHED_MARKER)
}

/// Load the configured article and publish it. A missing marker only warns.
pub async fn publish_article(config: &PublisherConfig) -> Result<PublishOutcome, PublishError> {
    let content = load_article(&config.article_path).await?;

    if !has_published_marker(&content) {
        tracing::warn!(
            "'{}' not found in frontmatter. Article might be saved as draft.",
            PUBLISHED_MARKER
        );
    }

    tracing::info!(endpoint = %config.endpoint, "Publishing article");
    Publisher::new(config).publish(&content).await
}

/// Publisher command body. Missing credentials, a missing article and
/// transport errors fail the process; any API answer is reported and exits 0.
pub async fn run(config: Result<PublisherConfig, ConfigError>) -> ExitCode {
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    println!("🚀 Publishing article to dev.to...");

    match publish_article(&config).await {
        Ok(PublishOutcome::Published { url }) => {
            println!("✅ Success! Article published.");
            println!("🔗 URL: {}", url);
            ExitCode::SUCCESS
        }
        Ok(PublishOutcome::Rejected { status, body }) => {
            println!("❌ Failed to publish article. Status Code: {}", status);
            println!("Response: {}", body);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::spawn_server;
    use axum::{
        extract::State,
        http::{HeaderMap, StatusCode},
        routing::post,
        Json, Router,
    };
    use serde_json::Value;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Captured {
        requests: Mutex<Vec<(Option<String>, Value)>>,
    }

    fn devto_router(captured: Arc<Captured>, status: StatusCode) -> Router {
        Router::new()
            .route(
                "/api/articles",
                post(
                    move |State(captured): State<Arc<Captured>>,
                          headers: HeaderMap,
                          Json(body): Json<Value>| async move {
                        let key = headers
                            .get("api-key")
                            .and_then(|v| v.to_str().ok())
                            .map(str::to_string);
                        captured.requests.lock().unwrap().push((key, body));
                        if status == StatusCode::CREATED {
                            (status, Json(json!({"url": "https://dev.to/watchdog/article-1"})))
                        } else {
                            (status, Json(json!({"error": "unprocessable"})))
                        }
                    },
                ),
            )
            .with_state(captured)
    }

    fn config_for(base: &str, article_path: PathBuf) -> PublisherConfig {
        PublisherConfig {
            api_key: "devto-key".to_string(),
            endpoint: format!("{}/api/articles", base),
            article_path,
        }
    }

    fn same_code(a: ExitCode, b: ExitCode) -> bool {
        format!("{:?}", a) == format!("{:?}", b)
    }

    #[test]
    fn detects_marker() {
        assert!(has_published_marker("---\ntitle: x\npublished: true\n---"));
        assert!(!has_published_marker("---\ntitle: x\npublished: false\n---"));
    }

    #[tokio::test]
    async fn missing_file_fails_before_any_request() {
        let captured = Arc::new(Captured::default());
        let base = spawn_server(devto_router(captured.clone(), StatusCode::CREATED)).await;
        let dir = tempfile::tempdir().unwrap();

        let err = publish_article(&config_for(&base, dir.path().join("nope.md")))
            .await
            .unwrap_err();

        assert!(matches!(err, PublishError::NotFound(_)));
        assert!(captured.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn article_without_marker_is_still_posted() {
        let captured = Arc::new(Captured::default());
        let base = spawn_server(devto_router(captured.clone(), StatusCode::CREATED)).await;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("article.md");
        let content = "---\ntitle: Watchdog\n---\n\n# Hello";
        std::fs::write(&path, content).unwrap();

        let outcome = publish_article(&config_for(&base, path)).await.unwrap();

        assert_eq!(
            outcome,
            PublishOutcome::Published {
                url: "https://dev.to/watchdog/article-1".to_string()
            }
        );
        let requests = captured.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].0.as_deref(), Some("devto-key"));
        assert_eq!(requests[0].1["article"]["body_markdown"], content);
    }

    #[tokio::test]
    async fn non_created_status_is_reported_once() {
        let captured = Arc::new(Captured::default());
        let base = spawn_server(devto_router(
            captured.clone(),
            StatusCode::UNPROCESSABLE_ENTITY,
        ))
        .await;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("article.md");
        std::fs::write(&path, "---\npublished: true\n---\nbody").unwrap();

        let outcome = publish_article(&config_for(&base, path)).await.unwrap();

        match outcome {
            PublishOutcome::Rejected { status, body } => {
                assert_eq!(status, 422);
                assert!(body.contains("unprocessable"));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(captured.requests.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn unreadable_path_is_an_io_error_not_missing() {
        let dir = tempfile::tempdir().unwrap();
        let plain = dir.path().join("plain.txt");
        std::fs::write(&plain, "not a directory").unwrap();

        let err = load_article(&plain.join("article.md")).await.unwrap_err();
        assert!(matches!(err, PublishError::Io(_)));
    }

    #[tokio::test]
    async fn run_without_api_key_fails_and_sends_nothing() {
        let captured = Arc::new(Captured::default());
        let base = spawn_server(devto_router(captured.clone(), StatusCode::CREATED)).await;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("article.md");
        std::fs::write(&path, "---\npublished: true\n---\nbody").unwrap();
        let endpoint = format!("{}/api/articles", base);
        let article_path = path.to_string_lossy().into_owned();

        let config = PublisherConfig::from_lookup(|key: &str| match key {
            "DEVTO_API_URL" => Some(endpoint.clone()),
            "ARTICLE_PATH" => Some(article_path.clone()),
            _ => None,
        });

        assert!(same_code(run(config).await, ExitCode::FAILURE));
        assert!(captured.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn run_with_missing_article_fails() {
        let captured = Arc::new(Captured::default());
        let base = spawn_server(devto_router(captured.clone(), StatusCode::CREATED)).await;
        let dir = tempfile::tempdir().unwrap();

        let code = run(Ok(config_for(&base, dir.path().join("nope.md")))).await;

        assert!(same_code(code, ExitCode::FAILURE));
        assert!(captured.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn run_reports_rejection_and_exits_normally() {
        let captured = Arc::new(Captured::default());
        let base = spawn_server(devto_router(
            captured.clone(),
            StatusCode::UNPROCESSABLE_ENTITY,
        ))
        .await;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("article.md");
        std::fs::write(&path, "---\npublished: true\n---\nbody").unwrap();

        let code = run(Ok(config_for(&base, path))).await;

        assert!(same_code(code, ExitCode::SUCCESS));
        assert_eq!(captured.requests.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn run_succeeds_on_created() {
        let captured = Arc::new(Captured::default());
        let base = spawn_server(devto_router(captured.clone(), StatusCode::CREATED)).await;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("article.md");
        std::fs::write(&path, "---\npublished: true\n---\nbody").unwrap();

        let code = run(Ok(config_for(&base, path))).await;

        assert!(same_code(code, ExitCode::SUCCESS));
        assert!(!same_code(ExitCode::SUCCESS, ExitCode::FAILURE));
    }
}
