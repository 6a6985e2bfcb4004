//! Mock implementations for testing.
//!
//! This module provides scripted search and LLM clients that can be used
//! across different test files without duplication.

use async_trait::async_trait;
use company_research::llm::LLMClient;
use company_research::research::prompts::ESG_SYSTEM_PROMPT;
use company_research::search::SearchClient;
use company_research::types::{AppError, EsgCategory, Result, SearchResult};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Mock search backend with scripted per-query behaviour.
///
/// By default every query returns `results_per_query` hits with URLs derived
/// from the query text, so different queries yield different sources.
///
/// # Examples
///
/// ```ignore
/// // Two results per query, plus one URL every query returns
/// let search = MockSearchClient::new(2).with_shared_url("https://acme.example");
///
/// // Queries containing "latest news" fail
/// let search = MockSearchClient::new(2).failing_on("latest news");
///
/// // Every query fails
/// let search = MockSearchClient::failing();
/// ```
#[derive(Clone, Default)]
pub struct MockSearchClient {
    results_per_query: usize,
    shared_url: Option<String>,
    failing_on: Vec<String>,
    fail_all: bool,
    delays: Vec<(String, Duration)>,
    calls: Arc<Mutex<Vec<String>>>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

impl MockSearchClient {
    pub fn new(results_per_query: usize) -> Self {
        Self {
            results_per_query,
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_all: true,
            ..Default::default()
        }
    }

    /// Every query returns no results.
    pub fn empty() -> Self {
        Self::new(0)
    }

    /// Put `url` first in every successful query's results.
    pub fn with_shared_url(mut self, url: &str) -> Self {
        self.shared_url = Some(url.to_string());
        self
    }

    /// Fail every query containing `fragment`.
    pub fn failing_on(mut self, fragment: &str) -> Self {
        self.failing_on.push(fragment.to_string());
        self
    }

    /// Sleep before answering queries containing `fragment`.
    pub fn delayed(mut self, fragment: &str, delay: Duration) -> Self {
        self.delays.push((fragment.to_string(), delay));
        self
    }

    /// Delay every query by `delay`.
    pub fn delayed_all(self, delay: Duration) -> Self {
        self.delayed("", delay)
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Highest number of queries that were in flight at once.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn url_for(query: &str, index: usize) -> String {
        let slug: String = query
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
            .collect();
        format!("https://example.com/{}/{}", slug, index)
    }
}

#[async_trait]
impl SearchClient for MockSearchClient {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchResult>> {
        self.calls.lock().unwrap().push(query.to_string());

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        if let Some((_, delay)) = self.delays.iter().find(|(f, _)| query.contains(f.as_str())) {
            tokio::time::sleep(*delay).await;
        } else {
            tokio::task::yield_now().await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.fail_all || self.failing_on.iter().any(|f| query.contains(f.as_str())) {
            return Err(AppError::SearchUnavailable(format!("mock failure for '{}'", query)));
        }

        let mut results = Vec::new();
        if self.results_per_query > 0 {
            if let Some(url) = &self.shared_url {
                results.push(SearchResult::new("Shared source", url.clone(), "Shared snippet"));
            }
        }
        for i in 0..self.results_per_query {
            results.push(SearchResult::new(
                format!("{} #{}", query, i),
                Self::url_for(query, i),
                format!("Snippet {} for {}", i, query),
            ));
        }
        results.truncate(max_results);

        Ok(results)
    }

    fn provider_name(&self) -> &str {
        "mock"
    }
}

/// Markdown general summary citing sources 1-3.
pub fn general_response() -> String {
    "## Narrative\nAcme Inc makes anvils [1]. Its founders are Jane Doe and John Roe [2].\n\n\
     ## Facility Summary\nA plant in Springfield [2].\n\n\
     ## Sustainability Summary\nPublishes an annual CDP response [3]."
        .to_string()
}

/// ESG analysis with one section per category, each citing source 1.
pub fn esg_response() -> String {
    EsgCategory::ALL
        .iter()
        .map(|c| format!("### {}\n{} finding [1]. Risk level: Low.", c.label(), c.label()))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Mock LLM client answering the general and ESG prompts separately.
///
/// The ESG answer is chosen when the system prompt is the ESG prompt.
#[derive(Clone)]
pub struct MockLLMClient {
    general: String,
    esg: String,
    should_fail: bool,
    prompts: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockLLMClient {
    pub fn new() -> Self {
        Self::with_responses(&general_response(), &esg_response())
    }

    pub fn with_responses(general: &str, esg: &str) -> Self {
        Self {
            general: general.to_string(),
            esg: esg.to_string(),
            should_fail: false,
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::new()
        }
    }

    /// `(system, prompt)` pairs received so far.
    pub fn prompts(&self) -> Vec<(String, String)> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn esg_calls(&self) -> usize {
        self.prompts()
            .iter()
            .filter(|(system, _)| system == ESG_SYSTEM_PROMPT)
            .count()
    }
}

impl Default for MockLLMClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LLMClient for MockLLMClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.generate_with_system("", prompt).await
    }

    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String> {
        self.prompts
            .lock()
            .unwrap()
            .push((system.to_string(), prompt.to_string()));

        if self.should_fail {
            return Err(AppError::SummarizationUnavailable(
                "Mock LLM failure".to_string(),
            ));
        }

        if system == ESG_SYSTEM_PROMPT {
            Ok(self.esg.clone())
        } else {
            Ok(self.general.clone())
        }
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}
