use crate::{
    llm::LLMClient,
    research::{
        citations::CitationList,
        planner::{extract_domain, plan_queries},
        prompts::{self, PromptContext},
        report::{self, ReportParts},
        sections,
    },
    search::SearchClient,
    types::{
        AppError, EsgCategory, PlannedQuery, QueryOutcome, QueryPurpose, ResearchReport,
        ResearchRequest, ResearchStats, Result, SearchResult,
    },
    utils::config::SearchConfig,
};
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::Instrument;
use uuid::Uuid;

/// Search fan-out limits for a research run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResearchSettings {
    /// Results requested from the backend per query
    pub max_results: usize,
    /// Queries in flight at the same time
    pub max_concurrent: usize,
    /// Deadline for a single query
    pub search_timeout: Duration,
}

impl Default for ResearchSettings {
    fn default() -> Self {
        Self::from(&SearchConfig::default())
    }
}

impl From<&SearchConfig> for ResearchSettings {
    fn from(config: &SearchConfig) -> Self {
        Self {
            max_results: config.max_results,
            max_concurrent: config.max_concurrent.max(1),
            search_timeout: Duration::from_secs(config.timeout_secs),
        }
    }
}

/// Search results gathered for a plan, reduced in plan order.
struct Gathered {
    citations: CitationList,
    general: Vec<usize>,
    esg: Vec<(EsgCategory, Vec<usize>)>,
    outcomes: Vec<QueryOutcome>,
    total_results: usize,
}

impl Gathered {
    fn new() -> Self {
        Self {
            citations: CitationList::new(),
            general: Vec::new(),
            esg: EsgCategory::ALL.iter().map(|c| (*c, Vec::new())).collect(),
            outcomes: Vec::new(),
            total_results: 0,
        }
    }

    fn record(&mut self, planned: PlannedQuery, outcome: Result<Vec<SearchResult>>) {
        let (result_count, error) = match outcome {
            Ok(results) => {
                let count = results.len();
                for result in results {
                    let number = self.citations.insert(result);
                    let bucket = match planned.purpose {
                        QueryPurpose::General => &mut self.general,
                        QueryPurpose::Esg(category) => match self
                            .esg
                            .iter_mut()
                            .find(|(c, _)| *c == category)
                        {
                            Some((_, numbers)) => numbers,
                            None => continue,
                        },
                    };
                    if !bucket.contains(&number) {
                        bucket.push(number);
                    }
                }
                (count, None)
            }
            Err(e) => (0, Some(e.to_string())),
        };

        self.total_results += result_count;
        self.outcomes.push(QueryOutcome {
            query: planned.query,
            purpose: planned.purpose,
            result_count,
            error,
        });
    }

    fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.error.is_some()).count()
    }
}

/// Runs a full research request: plan, search, summarize, assemble.
pub struct ResearchOrchestrator {
    search: Arc<dyn SearchClient>,
    llm: Arc<dyn LLMClient>,
    settings: ResearchSettings,
}

impl ResearchOrchestrator {
    pub fn new(
        search: Arc<dyn SearchClient>,
        llm: Arc<dyn LLMClient>,
        settings: ResearchSettings,
    ) -> Self {
        Self {
            search,
            llm,
            settings,
        }
    }

    pub fn settings(&self) -> &ResearchSettings {
        &self.settings
    }

    /// Research a company and build the cited report.
    ///
    /// Individual query failures are tolerated and recorded in the stats.
    /// The run fails with [`AppError::ResearchFailed`] only when no query
    /// produced any result.
    pub async fn research(&self, request: &ResearchRequest) -> Result<ResearchReport> {
        let request_id = Uuid::new_v4();
        let company_name = request.validated_name()?.to_string();

        let span = tracing::info_span!(
            "research",
            %request_id,
            company = %company_name,
            esg = request.include_esg_analysis
        );

        self.run(request_id, company_name, request)
            .instrument(span)
            .await
    }

    async fn run(
        &self,
        request_id: Uuid,
        company_name: String,
        request: &ResearchRequest,
    ) -> Result<ResearchReport> {
        let started = Instant::now();
        let plan = plan_queries(request)?;

        tracing::info!(
            "Planned {} queries (backend: {}, concurrency: {})",
            plan.len(),
            self.search.provider_name(),
            self.settings.max_concurrent
        );

        let gathered = self.gather(plan).await;
        let failed = gathered.failed();
        let total_queries = gathered.outcomes.len();

        if failed == total_queries {
            tracing::warn!("All {} search queries failed", total_queries);
            return Err(AppError::ResearchFailed(format!(
                "all {} search queries failed",
                total_queries
            )));
        }
        if gathered.citations.is_empty() {
            tracing::warn!("Search returned no results for any query");
            return Err(AppError::ResearchFailed(
                "search returned no results for any query".to_string(),
            ));
        }
        if failed > 0 {
            tracing::warn!("{}/{} search queries failed", failed, total_queries);
        }

        tracing::info!(
            "Collected {} results from {} unique sources",
            gathered.total_results,
            gathered.citations.len()
        );

        let keywords = request.clean_keywords();
        let partners = request.clean_partners();
        // A URL without a usable host is treated as absent.
        let company_url = request
            .company_url
            .as_deref()
            .filter(|url| extract_domain(url).is_some())
            .map(str::trim);
        let context = PromptContext {
            company_name: &company_name,
            company_url,
            keywords: &keywords,
            partners: &partners,
        };

        // General queries may all have failed; the summary then works from
        // whatever the ESG queries found.
        let general_numbers: Vec<usize> = if gathered.general.is_empty() {
            gathered.citations.iter().map(|(n, _)| n).collect()
        } else {
            gathered.general.clone()
        };

        let general_prompt = prompts::general_prompt(&context, &gathered.citations, &general_numbers);
        let esg_prompt = request
            .include_esg_analysis
            .then(|| prompts::esg_prompt(&context, &gathered.citations, &gathered.esg));

        let general_call = self
            .llm
            .generate_with_system(prompts::GENERAL_SYSTEM_PROMPT, &general_prompt);
        let esg_call = async {
            match &esg_prompt {
                Some(prompt) => self
                    .llm
                    .generate_with_system(prompts::ESG_SYSTEM_PROMPT, prompt)
                    .await
                    .map(Some),
                None => Ok(None),
            }
        };

        let (general_text, esg_text) = tokio::join!(general_call, esg_call);
        let general = sections::parse_general(&general_text?)?;
        let esg = esg_text?.map(|text| sections::parse_esg(&text)).transpose()?;

        let duration_ms = started.elapsed().as_millis() as u64;
        let stats = ResearchStats {
            total_queries,
            failed_queries: failed,
            total_results: gathered.total_results,
            unique_sources: gathered.citations.len(),
            duration_ms,
            queries: gathered.outcomes,
        };

        let report = report::assemble(ReportParts {
            request_id,
            company_name,
            partners: partners.iter().map(|p| p.to_string()).collect(),
            general,
            esg,
            citations: gathered.citations,
            stats,
        });

        tracing::info!(
            "Research complete in {}ms with {} citations",
            duration_ms,
            report.citations.len()
        );

        Ok(report)
    }

    /// Run every planned query with bounded concurrency. Results are reduced
    /// in plan order regardless of completion order, so citation numbers are
    /// deterministic for a given set of search responses.
    async fn gather(&self, plan: Vec<PlannedQuery>) -> Gathered {
        let search = &self.search;
        let settings = self.settings;

        let outcomes: Vec<(PlannedQuery, Result<Vec<SearchResult>>)> = stream::iter(plan)
            .map(|planned| async move {
                let outcome = match tokio::time::timeout(
                    settings.search_timeout,
                    search.search(&planned.query, settings.max_results),
                )
                .await
                {
                    Ok(Ok(mut results)) => {
                        results.truncate(settings.max_results);
                        tracing::debug!("{} results for '{}'", results.len(), planned.query);
                        Ok(results)
                    }
                    Ok(Err(e)) => {
                        tracing::warn!("Search failed for '{}': {}", planned.query, e);
                        Err(e)
                    }
                    Err(_) => {
                        tracing::warn!(
                            "Search timed out after {:?} for '{}'",
                            settings.search_timeout,
                            planned.query
                        );
                        Err(AppError::SearchUnavailable(format!(
                            "timed out after {}s",
                            settings.search_timeout.as_secs()
                        )))
                    }
                };
                (planned, outcome)
            })
            .buffered(settings.max_concurrent)
            .collect()
            .await;

        let mut gathered = Gathered::new();
        for (planned, outcome) in outcomes {
            gathered.record(planned, outcome);
        }
        gathered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct FixedSearch;

    #[async_trait]
    impl SearchClient for FixedSearch {
        async fn search(&self, query: &str, _max_results: usize) -> Result<Vec<SearchResult>> {
            if query.contains("latest news") {
                return Err(AppError::SearchUnavailable("HTTP 500".to_string()));
            }
            Ok(vec![
                SearchResult::new("Shared", "https://shared.example", "shared"),
                SearchResult::new(query, format!("https://example.com/{}", query.len()), "x"),
            ])
        }

        fn provider_name(&self) -> &str {
            "fixed"
        }
    }

    #[tokio::test]
    async fn test_gather_reduces_in_plan_order() {
        let llm: Arc<dyn LLMClient> = Arc::new(NoopLlm);
        let orchestrator =
            ResearchOrchestrator::new(Arc::new(FixedSearch), llm, ResearchSettings::default());

        let plan = plan_queries(&ResearchRequest::new("Acme Inc")).unwrap();
        let planned = plan.len();
        let gathered = orchestrator.gather(plan).await;

        assert_eq!(gathered.outcomes.len(), planned);
        assert_eq!(gathered.failed(), 1);
        assert_eq!(gathered.citations.get(1).unwrap().url, "https://shared.example");
        assert!(gathered.general.contains(&1));
        assert!(gathered.esg.iter().all(|(_, numbers)| numbers.contains(&1)));
    }

    struct NoopLlm;

    #[async_trait]
    impl LLMClient for NoopLlm {
        async fn generate(&self, _prompt: &str) -> Result<String> {
            Ok(String::new())
        }

        async fn generate_with_system(&self, _system: &str, _prompt: &str) -> Result<String> {
            Ok(String::new())
        }

        fn model_name(&self) -> &str {
            "noop"
        }
    }

    #[test]
    fn test_settings_from_config() {
        let config = SearchConfig {
            max_concurrent: 0,
            timeout_secs: 7,
            ..Default::default()
        };
        let settings = ResearchSettings::from(&config);

        assert_eq!(settings.max_concurrent, 1);
        assert_eq!(settings.search_timeout, Duration::from_secs(7));
        assert_eq!(settings.max_results, 10);
    }
}
