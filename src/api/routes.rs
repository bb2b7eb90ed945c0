//! Router, shared state and the JSON endpoints.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use super::types::{AnalyzeRequest, AnalyzeResponse, ErrorResponse, HealthResponse};
use super::ui;
use crate::agent::{build_agent, run_analysis, ModelId, ModelRuntime};
use crate::tools::NewsSearch;

/// Shared application state.
pub struct AppState {
    /// Model preselected when the request does not name one
    pub default_model: ModelId,

    /// Runtime every analysis is delegated to
    pub runtime: Arc<dyn ModelRuntime>,

    /// Search capability bound into each fresh agent
    pub search: Arc<dyn NewsSearch>,
}

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(ui::index))
        .route("/analyze", post(ui::analyze_form))
        .route("/api/analyze", post(analyze))
        .route("/api/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Check user input before any outbound call is made.
///
/// Returns the trimmed topic and the resolved model, or a message for the user.
pub(super) fn validate_input(
    topic: &str,
    model: Option<&str>,
    default_model: ModelId,
) -> Result<(String, ModelId), String> {
    let topic = topic.trim();
    if topic.is_empty() {
        return Err("Please enter a topic to analyze.".to_string());
    }

    let model = match model.map(str::trim).filter(|m| !m.is_empty()) {
        Some(raw) => raw
            .parse::<ModelId>()
            .map_err(|e| format!("Please select a supported model: {}", e))?,
        None => default_model,
    };

    Ok((topic.to_string(), model))
}

/// POST /api/analyze - Run one analysis and return the markdown report.
async fn analyze(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, (StatusCode, Json<ErrorResponse>)> {
    let (topic, model) = validate_input(&req.topic, req.model.as_deref(), state.default_model)
        .map_err(|error| (StatusCode::BAD_REQUEST, Json(ErrorResponse { error })))?;

    let id = Uuid::new_v4();
    tracing::info!(%id, topic = %topic, "Analysis requested via API");

    let agent = build_agent(model, Arc::clone(&state.search));
    let report = run_analysis(state.runtime.as_ref(), &agent, &topic)
        .await
        .map_err(|e| {
            tracing::error!(%id, error = %e, "Analysis failed");
            (
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse {
                    error: format!("An error occurred: {}", e),
                }),
            )
        })?;

    Ok(Json(AnalyzeResponse {
        id,
        topic,
        model: model.to_string(),
        content: report.content,
    }))
}

/// GET /api/health - Liveness probe.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{AgentConfig, AnalysisError};
    use crate::llm::LlmError;
    use crate::tools::{SearchOutcome, SearchQuery};
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request};
    use http_body_util::BodyExt;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tower::ServiceExt;

    /// Echoes the request and records the model of every call.
    #[derive(Default)]
    struct CountingRuntime {
        calls: AtomicUsize,
        models: Mutex<Vec<ModelId>>,
        fail: bool,
    }

    #[async_trait]
    impl ModelRuntime for CountingRuntime {
        async fn run(&self, agent: &AgentConfig, request: &str) -> Result<String, AnalysisError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.models.lock().unwrap().push(agent.model());
            if self.fail {
                return Err(AnalysisError::Llm(LlmError::Api {
                    status: 500,
                    body: "model exploded".to_string(),
                }));
            }
            Ok(format!("## Risk Level\n\n**Medium**\n\n{}", request))
        }
    }

    struct NoNews;

    #[async_trait]
    impl NewsSearch for NoNews {
        async fn search(&self, _query: &SearchQuery) -> SearchOutcome {
            SearchOutcome::Results(Vec::new())
        }
    }

    fn app(runtime: Arc<CountingRuntime>) -> Router {
        router(Arc::new(AppState {
            default_model: ModelId::Gpt4o,
            runtime,
            search: Arc::new(NoNews),
        }))
    }

    fn form_post(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/analyze")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn json_post(body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/analyze")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn validation_trims_topic_and_resolves_model() {
        assert_eq!(
            validate_input("  Lithium ", Some("gpt-3.5-turbo"), ModelId::Gpt4o),
            Ok(("Lithium".to_string(), ModelId::Gpt35Turbo))
        );
        assert_eq!(
            validate_input("TSMC", None, ModelId::Gpt4o),
            Ok(("TSMC".to_string(), ModelId::Gpt4o))
        );
        assert!(validate_input("TSMC", Some("llama"), ModelId::Gpt4o).is_err());
    }

    #[tokio::test]
    async fn index_renders_form() {
        let response = app(Arc::default())
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("Analyze Risks"));
        assert!(html.contains(r#"<option value="gpt-4o" selected>"#));
    }

    #[tokio::test]
    async fn blank_topics_warn_without_calling_runtime() {
        let runtime = Arc::new(CountingRuntime::default());
        for body in ["topic=&model=gpt-4o", "topic=+++&model=gpt-4o", "topic=%09%0A"] {
            let response = app(runtime.clone()).oneshot(form_post(body)).await.unwrap();
            let html = body_text(response).await;
            assert!(html.contains("Please enter a topic to analyze."), "{body}");
        }
        assert_eq!(runtime.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn one_submission_issues_exactly_one_call() {
        let runtime = Arc::new(CountingRuntime::default());
        let response = app(runtime.clone())
            .oneshot(form_post("topic=Cobalt&model=gpt-3.5-turbo"))
            .await
            .unwrap();

        let html = body_text(response).await;
        assert_eq!(runtime.calls.load(Ordering::SeqCst), 1);
        assert_eq!(*runtime.models.lock().unwrap(), vec![ModelId::Gpt35Turbo]);
        assert!(html.contains("Risk Analysis Report"));
        assert!(html.contains("<h2>Risk Level</h2>"));
        assert!(html.contains("Analyze the supply chain risks regarding: Cobalt"));
    }

    #[tokio::test]
    async fn runtime_failure_renders_error_banner() {
        let runtime = Arc::new(CountingRuntime {
            fail: true,
            ..Default::default()
        });
        let response = app(runtime.clone())
            .oneshot(form_post("topic=Nickel"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("An error occurred:"));
        assert!(html.contains("model exploded"));
        assert_eq!(runtime.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unknown_model_in_form_is_a_warning() {
        let runtime = Arc::new(CountingRuntime::default());
        let response = app(runtime.clone())
            .oneshot(form_post("topic=Nickel&model=gpt-5"))
            .await
            .unwrap();

        let html = body_text(response).await;
        assert!(html.contains("Please select a supported model"));
        assert_eq!(runtime.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn json_analyze_returns_report() {
        let runtime = Arc::new(CountingRuntime::default());
        let response = app(runtime.clone())
            .oneshot(json_post(serde_json::json!({"topic": "Cobalt"})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: AnalyzeResponse = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body.topic, "Cobalt");
        assert_eq!(body.model, "gpt-4o");
        assert!(body.content.contains("Cobalt"));
        assert_eq!(runtime.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn json_analyze_rejects_blank_topic() {
        let runtime = Arc::new(CountingRuntime::default());
        let response = app(runtime.clone())
            .oneshot(json_post(serde_json::json!({"topic": "   "})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: ErrorResponse = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body.error, "Please enter a topic to analyze.");
        assert_eq!(runtime.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn json_analyze_without_topic_is_a_bad_request() {
        let runtime = Arc::new(CountingRuntime::default());
        let response = app(runtime.clone())
            .oneshot(json_post(serde_json::json!({"model": "gpt-4o"})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: ErrorResponse = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body.error, "Please enter a topic to analyze.");
        assert_eq!(runtime.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn json_analyze_maps_runtime_failure_to_bad_gateway() {
        let runtime = Arc::new(CountingRuntime {
            fail: true,
            ..Default::default()
        });
        let response = app(runtime)
            .oneshot(json_post(serde_json::json!({"topic": "Cobalt"})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn health_reports_version() {
        let response = app(Arc::default())
            .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let body: HealthResponse = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body.status, "ok");
        assert_eq!(body.version, env!("CARGO_PKG_VERSION"));
    }
}
