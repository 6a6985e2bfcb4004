//! LLM Provider Clients and Abstractions
//!
//! The research pipeline talks to a language model through the narrow
//! [`LLMClient`] trait, so the orchestrator can be exercised against
//! deterministic stand-ins without network access.
//!
//! # Supported Providers
//!
//! Enable providers via Cargo features:
//! - `openai` - OpenAI API and compatible endpoints (default)
//! - `ollama` - Local Ollama server
//!
//! # Example
//!
//! ```ignore
//! use company_research::llm::Provider;
//!
//! let provider = Provider::from_config(&config.llm);
//! let client = provider.create_client()?;
//!
//! let text = client.generate_with_system("You are terse.", "What is 2+2?").await?;
//! ```

/// Core LLM client trait and provider selection.
pub mod client;

#[cfg(feature = "ollama")]
pub mod ollama;

#[cfg(feature = "openai")]
pub mod openai;

pub use client::{LLMClient, Provider};
