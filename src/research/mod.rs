//! Company Research Pipeline
//!
//! One research run goes through these stages:
//!
//! 1. **Planning** - [`planner::plan_queries`] turns the request into general
//!    queries plus one query per ESG category
//! 2. **Searching** - [`orchestrator::ResearchOrchestrator`] runs the plan
//!    with bounded concurrency and a per-query timeout
//! 3. **Numbering** - results are reduced in plan order into a
//!    [`citations::CitationList`], which fixes every citation number
//! 4. **Summarizing** - the general and ESG prompts ([`prompts`]) are sent to
//!    the language model concurrently
//! 5. **Assembly** - [`sections`] splits the output and [`report`] strips
//!    out-of-range citation markers and builds the final report
//!
//! # Usage
//!
//! ```ignore
//! use company_research::research::orchestrator::{ResearchOrchestrator, ResearchSettings};
//! use company_research::types::ResearchRequest;
//!
//! let orchestrator = ResearchOrchestrator::new(search, llm, ResearchSettings::default());
//! let report = orchestrator
//!     .research(&ResearchRequest::new("Acme Inc").with_partners(["Jane Doe"]))
//!     .await?;
//!
//! for citation in &report.citations {
//!     println!("[{}] {}", citation.number, citation.url);
//! }
//! ```

/// Citation numbering and marker checks.
pub mod citations;
/// Search, summarize and assemble a research run.
pub mod orchestrator;
/// Query planning.
pub mod planner;
/// Summarization prompts.
pub mod prompts;
/// Report assembly and markdown rendering.
pub mod report;
/// Model output section parsing.
pub mod sections;

pub use orchestrator::{ResearchOrchestrator, ResearchSettings};
