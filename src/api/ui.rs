//! HTML front end: the analysis form and the rendered report.

use std::fmt::Write as _;
use std::sync::Arc;

use axum::{extract::State, response::Html, Form};
use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag};

use super::routes::{validate_input, AppState};
use super::types::AnalyzeForm;
use crate::agent::{build_agent, run_analysis, ModelId, Report};

/// Banner shown above the report area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Warning(String),
    Error(String),
}

/// Everything the page template needs.
#[derive(Debug, Default)]
pub struct PageView<'a> {
    pub topic: &'a str,
    pub selected: ModelId,
    pub notice: Option<Notice>,
    pub report: Option<&'a Report>,
}

/// GET / - Render the empty form.
pub async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(render_page(&PageView {
        selected: state.default_model,
        ..PageView::default()
    }))
}

/// POST /analyze - Validate the form, run one analysis, render the result.
pub async fn analyze_form(
    State(state): State<Arc<AppState>>,
    Form(form): Form<AnalyzeForm>,
) -> Html<String> {
    let selected = form
        .model
        .as_deref()
        .and_then(|m| m.parse().ok())
        .unwrap_or(state.default_model);

    let validated = validate_input(&form.topic, form.model.as_deref(), state.default_model);
    let (topic, model) = match validated {
        Ok(valid) => valid,
        Err(message) => {
            return Html(render_page(&PageView {
                topic: &form.topic,
                selected,
                notice: Some(Notice::Warning(message)),
                report: None,
            }));
        }
    };

    let agent = build_agent(model, Arc::clone(&state.search));
    match run_analysis(state.runtime.as_ref(), &agent, &topic).await {
        Ok(report) => Html(render_page(&PageView {
            topic: &topic,
            selected: model,
            notice: None,
            report: Some(&report),
        })),
        Err(e) => {
            tracing::error!(topic = %topic, error = %e, "Analysis failed");
            Html(render_page(&PageView {
                topic: &topic,
                selected: model,
                notice: Some(Notice::Error(format!("An error occurred: {}", e))),
                report: None,
            }))
        }
    }
}

/// Render the whole page.
pub fn render_page(view: &PageView<'_>) -> String {
    let mut options = String::new();
    for model in ModelId::ALL {
        let selected = if model == view.selected { " selected" } else { "" };
        let _ = write!(
            options,
            r#"<option value="{id}"{selected}>{id}</option>"#,
            id = model.as_str(),
            selected = selected
        );
    }

    let notice = match &view.notice {
        Some(Notice::Warning(msg)) => {
            format!(r#"<div class="notice warning">{}</div>"#, escape_html(msg))
        }
        Some(Notice::Error(msg)) => {
            format!(r#"<div class="notice error">❌ {}</div>"#, escape_html(msg))
        }
        None => String::new(),
    };

    let report = view
        .report
        .map(|r| {
            format!(
                r#"<hr><section class="report"><h2>🛡️ Risk Analysis Report</h2>{}</section>"#,
                render_markdown(&r.content)
            )
        })
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Autonomous Supply Chain Watchdog</title>
<style>
  body {{ font-family: sans-serif; background: #f0f2f6; margin: 0; display: flex; }}
  aside {{ width: 260px; padding: 1.5rem; background: #fff; min-height: 100vh; }}
  main {{ flex: 1; padding: 2rem; }}
  h1 {{ font-size: 2.5rem; color: #1f77b4; }}
  .notice {{ padding: .75rem 1rem; border-radius: 4px; margin: 1rem 0; }}
  .warning {{ background: #fff9c4; }}
  .error {{ background: #ffcdd2; }}
  #status {{ margin: 1rem 0; font-style: italic; }}
  footer {{ margin-top: 2rem; color: #666; font-size: .85rem; }}
</style>
</head>
<body>
<form method="post" action="/analyze" onsubmit="document.getElementById('status').hidden = false;" style="display: contents">
<aside>
  <h3>Configuration</h3>
  <label for="model">Select Model</label>
  <select id="model" name="model">{options}</select>
  <p>This agent uses DuckDuckGo Search to find real-time supply chain news.</p>
</aside>
<main>
  <h1>📦 Autonomous Supply Chain Watchdog</h1>
  <h3>AI-Powered Supply Chain Risk Analysis &amp; Monitoring</h3>
  <label for="topic">Enter a commodity, company, or sector to analyze:</label><br>
  <input id="topic" name="topic" type="text" size="60" value="{topic}" placeholder="e.g., Lithium, TSMC, Automotive Chips">
  <button type="submit">Analyze Risks</button>
  <div id="status" hidden>🔍 Agent is working... searching for news on your topic.</div>
  {notice}
  {report}
  <hr>
  <footer>Experimental PoC | Powered by OpenAI &amp; DuckDuckGo</footer>
</main>
</form>
</body>
</html>"#,
        options = options,
        topic = escape_html(view.topic),
        notice = notice,
        report = report
    )
}

/// Render report markdown to HTML. Raw HTML in the model output is shown as
/// text, and link or image targets outside `http`, `https` and `mailto`
/// become `#`.
pub fn render_markdown(markdown: &str) -> String {
    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS;
    let parser = Parser::new_ext(markdown, options).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        Event::Start(Tag::Link {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Link {
            link_type,
            dest_url: safe_url(dest_url),
            title,
            id,
        }),
        Event::Start(Tag::Image {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Image {
            link_type,
            dest_url: safe_url(dest_url),
            title,
            id,
        }),
        other => other,
    });

    let mut out = String::new();
    html::push_html(&mut out, parser);
    out
}

/// Keep relative URLs and the allowed schemes; anything else becomes `#`.
fn safe_url(url: CowStr<'_>) -> CowStr<'_> {
    let head = url.split(['/', '?', '#']).next().unwrap_or_default();
    let Some((scheme, _)) = head.split_once(':') else {
        return url;
    };

    let scheme: String = scheme
        .chars()
        .filter(|c| !c.is_ascii_whitespace() && !c.is_ascii_control())
        .collect::<String>()
        .to_ascii_lowercase();

    match scheme.as_str() {
        "http" | "https" | "mailto" => url,
        _ => CowStr::Borrowed("#"),
    }
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
