use crate::search::{SearchClient, cap_results};
use crate::types::{AppError, Result, SearchResult};
use crate::utils::config::SearchConfig;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Client for the Tavily search API (`POST {base_url}/search`).
pub struct TavilyClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    search_depth: String,
}

#[derive(Debug, Serialize)]
struct TavilyRequest<'a> {
    query: &'a str,
    max_results: usize,
    search_depth: &'a str,
    include_answer: bool,
}

#[derive(Debug, Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<TavilyHit>,
}

#[derive(Debug, Deserialize)]
struct TavilyHit {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    score: Option<f32>,
}

impl From<TavilyHit> for SearchResult {
    fn from(hit: TavilyHit) -> Self {
        SearchResult {
            title: hit.title.trim().to_string(),
            url: hit.url.trim().to_string(),
            snippet: hit.content.trim().to_string(),
            score: hit.score,
        }
    }
}

impl TavilyClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        search_depth: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            search_depth: search_depth.into(),
        })
    }

    pub fn from_config(config: &SearchConfig) -> Result<Self> {
        Self::new(
            config.base_url.clone(),
            config.api_key.as_ref().map(|k| k.expose().to_string()),
            config.search_depth.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }
}

#[async_trait]
impl SearchClient for TavilyClient {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchResult>> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            AppError::SearchUnavailable("Tavily API key is not configured".to_string())
        })?;

        let body = TavilyRequest {
            query,
            max_results,
            search_depth: &self.search_depth,
            include_answer: false,
        };

        let response = self
            .http
            .post(format!("{}/search", self.base_url))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AppError::SearchUnavailable(format!("Tavily request timed out: {}", e))
                } else {
                    AppError::SearchUnavailable(format!("Tavily request failed: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(AppError::SearchUnavailable(format!(
                "Tavily returned status {}: {}",
                status, detail
            )));
        }

        let payload: TavilyResponse = response.json().await.map_err(|e| {
            AppError::SearchUnavailable(format!("Failed to parse Tavily response: {}", e))
        })?;

        let results = payload.results.into_iter().map(SearchResult::from).collect();

        Ok(cap_results(results, max_results))
    }

    fn provider_name(&self) -> &str {
        "tavily"
    }
}
