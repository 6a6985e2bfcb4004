//! Keyless search backend using daedra
//!
//! daedra scrapes DuckDuckGo, so it needs no API key. Useful for local
//! development; results carry no relevance score.

use crate::search::{SearchClient, cap_results};
use crate::types::{AppError, Result, SearchResult};
use async_trait::async_trait;

pub struct DuckDuckGoClient;

impl DuckDuckGoClient {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DuckDuckGoClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SearchClient for DuckDuckGoClient {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchResult>> {
        let search_args = daedra::SearchArgs {
            query: query.to_string(),
            options: Some(daedra::SearchOptions {
                num_results: max_results,
                ..Default::default()
            }),
        };

        let response = daedra::tools::search::perform_search(&search_args)
            .await
            .map_err(|e| AppError::SearchUnavailable(format!("DuckDuckGo search failed: {}", e)))?;

        let results = response
            .data
            .iter()
            .map(|r| SearchResult::new(r.title.clone(), r.url.clone(), r.description.clone()))
            .collect();

        Ok(cap_results(results, max_results))
    }

    fn provider_name(&self) -> &str {
        "duckduckgo"
    }
}
