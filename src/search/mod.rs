//! Web Search Backends
//!
//! The research orchestrator only needs one capability from a search engine:
//! `search(query, max_results) -> results`. That capability is the
//! [`SearchClient`] trait; this module provides two implementations.
//!
//! - [`tavily::TavilyClient`] - Tavily search API (default, needs an API key)
//! - [`duckduckgo::DuckDuckGoClient`] - keyless DuckDuckGo search via daedra
//!
//! Every backend must cap its output at `max_results`, return an empty list
//! for a query with no hits, and report transport, auth and timeout failures
//! as [`AppError::SearchUnavailable`](crate::types::AppError::SearchUnavailable).

use crate::types::{Result, SearchResult};
use crate::utils::config::{SearchConfig, SearchProviderKind};
use async_trait::async_trait;
use std::sync::Arc;

/// DuckDuckGo search through daedra.
pub mod duckduckgo;
/// Tavily search API client.
pub mod tavily;

#[async_trait]
pub trait SearchClient: Send + Sync {
    /// Run one query, returning at most `max_results` hits in backend order.
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchResult>>;

    /// Short backend identifier used in logs and health output
    fn provider_name(&self) -> &str;
}

/// Build the backend selected by the `[search]` configuration section.
pub fn create_search_client(config: &SearchConfig) -> Result<Arc<dyn SearchClient>> {
    match config.provider {
        SearchProviderKind::Tavily => Ok(Arc::new(tavily::TavilyClient::from_config(config)?)),
        SearchProviderKind::DuckDuckGo => Ok(Arc::new(duckduckgo::DuckDuckGoClient::new())),
    }
}

/// Drop hits without a URL and enforce the result cap.
pub(crate) fn cap_results(results: Vec<SearchResult>, max_results: usize) -> Vec<SearchResult> {
    results
        .into_iter()
        .filter(|r| !r.url.trim().is_empty())
        .take(max_results)
        .collect()
}
