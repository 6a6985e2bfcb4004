//! # Company Research Server
//!
//! An HTTP service that researches a company on the web and returns a cited
//! report: a business narrative, facility and sustainability summaries, and
//! an optional ESG analysis over seven fixed categories.
//!
//! ## Overview
//!
//! A research run plans a set of search queries, runs them concurrently
//! against a web search backend, numbers every unique source once, asks a
//! language model for a general summary and an ESG analysis, and assembles
//! the answers into a [`types::ResearchReport`]. Every citation number in
//! the report resolves to an entry of its citation list.
//!
//! ## Quick Start (Library Usage)
//!
//! ```rust,ignore
//! use company_research::research::{ResearchOrchestrator, ResearchSettings};
//! use company_research::search::create_search_client;
//! use company_research::types::ResearchRequest;
//! use company_research::utils::config::AppConfig;
//! use company_research::Provider;
//! use std::sync::Arc;
//!
//! let config = AppConfig::from_sources("research.toml".as_ref())?;
//! let search = create_search_client(&config.search)?;
//! let llm = Arc::from(Provider::from_config(&config.llm).create_client()?);
//!
//! let orchestrator =
//!     ResearchOrchestrator::new(search, llm, ResearchSettings::from(&config.search));
//! let report = orchestrator.research(&ResearchRequest::new("Acme Inc")).await?;
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `openai` | OpenAI chat completions (default) |
//! | `ollama` | Ollama local inference |
//! | `swagger-ui` | Interactive API docs at `/swagger-ui` |
//! | `full` | All of the above |
//!
//! ## Modules
//!
//! - [`api`] - REST API handlers and routes
//! - [`llm`] - LLM client implementations
//! - [`research`] - Query planning, search fan-out, summarization, assembly
//! - [`search`] - Web search backends
//! - [`types`] - Request, report and error types
//! - [`utils`] - Configuration loading

#![cfg_attr(docsrs, feature(doc_cfg))]

/// HTTP API handlers and routes.
pub mod api;
/// LLM provider clients and abstractions.
pub mod llm;
/// Company research pipeline.
pub mod research;
/// Web search backends.
pub mod search;
/// Core types (requests, reports, errors).
pub mod types;
/// Configuration utilities.
pub mod utils;

pub use llm::{LLMClient, Provider};
pub use research::{ResearchOrchestrator, ResearchSettings};
pub use search::SearchClient;
pub use types::{AppError, Result};
pub use utils::config::AppConfig;

use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Startup configuration, used by the health endpoint
    pub config: Arc<AppConfig>,
    /// Research pipeline bound to the configured search and LLM clients
    pub orchestrator: Arc<ResearchOrchestrator>,
}

impl AppState {
    /// Build the state for a configuration with explicit clients.
    pub fn new(
        config: AppConfig,
        search: Arc<dyn SearchClient>,
        llm: Arc<dyn LLMClient>,
    ) -> Self {
        let settings = ResearchSettings::from(&config.search);
        Self {
            config: Arc::new(config),
            orchestrator: Arc::new(ResearchOrchestrator::new(search, llm, settings)),
        }
    }

    /// Build the state with the clients the configuration selects.
    pub fn from_config(config: AppConfig) -> Result<Self> {
        let search = search::create_search_client(&config.search)?;
        let llm: Arc<dyn LLMClient> = Arc::from(Provider::from_config(&config.llm).create_client()?);
        Ok(Self::new(config, search, llm))
    }
}
