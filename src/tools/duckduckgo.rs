//! DuckDuckGo news backend.
//!
//! A search is two requests: the landing page is posted the query to obtain a
//! `vqd` token, then `news.js` is asked for JSON results with that token.

use std::sync::OnceLock;

use async_trait::async_trait;
use chrono::DateTime;
use regex::Regex;
use serde::Deserialize;

use super::news::{NewsSearch, SearchError, SearchOutcome, SearchQuery, SearchResult};
use crate::config::NewsConfig;

pub struct DuckDuckGoNews {
    client: reqwest::Client,
    base_url: String,
    region: String,
}

#[derive(Deserialize)]
struct NewsResponse {
    #[serde(default)]
    results: Vec<NewsRow>,
}

#[derive(Deserialize)]
struct NewsRow {
    #[serde(default)]
    date: Option<i64>,
    #[serde(default)]
    title: String,
    #[serde(default)]
    excerpt: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    source: Option<String>,
}

impl DuckDuckGoNews {
    pub fn new(config: &NewsConfig) -> Result<Self, SearchError> {
        let client = reqwest::Client::builder()
            .user_agent("Mozilla/5.0 (compatible; SupplyChainWatchdog/1.0)")
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            region: config.region.clone(),
        })
    }

    async fn token(&self, keywords: &str) -> Result<String, SearchError> {
        let page = self
            .client
            .post(&self.base_url)
            .form(&[("q", keywords)])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        extract_vqd(&page).ok_or_else(|| SearchError::MissingToken(keywords.to_string()))
    }

    async fn fetch(&self, query: &SearchQuery) -> Result<Vec<SearchResult>, SearchError> {
        let vqd = self.token(query.text()).await?;

        let response: NewsResponse = self
            .client
            .get(format!("{}/news.js", self.base_url))
            .query(&[
                ("l", self.region.as_str()),
                ("o", "json"),
                ("noamp", "1"),
                ("q", query.text()),
                ("vqd", vqd.as_str()),
                ("p", "-1"),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(response
            .results
            .into_iter()
            .take(query.max_results())
            .map(|row| SearchResult {
                title: row.title,
                body: normalize(&row.excerpt),
                url: row.url,
                date: row
                    .date
                    .and_then(|ts| DateTime::from_timestamp(ts, 0))
                    .map(|dt| dt.to_rfc3339()),
                source: row.source,
            })
            .collect())
    }
}

#[async_trait]
impl NewsSearch for DuckDuckGoNews {
    async fn search(&self, query: &SearchQuery) -> SearchOutcome {
        tracing::debug!(query = query.text(), max_results = query.max_results(), "Searching news");
        SearchOutcome::from_result(self.fetch(query).await)
    }
}

/// Pull the `vqd` token out of the landing page.
fn extract_vqd(page: &str) -> Option<String> {
    static VQD: OnceLock<Regex> = OnceLock::new();
    let re = VQD.get_or_init(|| {
        Regex::new(r#"vqd=(?:"([^"]+)"|'([^']+)'|([0-9][0-9-]*))"#).expect("valid vqd regex")
    });

    let caps = re.captures(page)?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .or_else(|| caps.get(3))
        .map(|m| m.as_str().to_string())
}

/// Strip markup from an excerpt and decode entities.
fn normalize(raw: &str) -> String {
    static TAGS: OnceLock<Regex> = OnceLock::new();
    let re = TAGS.get_or_init(|| Regex::new(r"<.*?>").expect("valid tag regex"));
    html_decode(&re.replace_all(raw, ""))
}

/// Basic HTML entity decoding.
fn html_decode(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}
