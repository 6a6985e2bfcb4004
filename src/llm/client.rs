//! LLM Client abstractions and provider management
//!
//! The research pipeline needs exactly one capability from a language model:
//! turn a (system, user) prompt pair into text. Providers:
//! - **OpenAI**: OpenAI and compatible chat-completion endpoints (default)
//! - **Ollama**: local inference through an Ollama server

use crate::types::{AppError, Result};
use crate::utils::config::{LlmConfig, LlmProviderKind};
use async_trait::async_trait;

/// Generic LLM client trait for provider abstraction
///
/// Transport and authentication failures are reported as
/// [`AppError::SummarizationUnavailable`].
#[async_trait]
pub trait LLMClient: Send + Sync {
    /// Generate a completion from a prompt
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Generate with system prompt
    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String>;

    /// Get the model name/identifier
    fn model_name(&self) -> &str;
}

/// Provider enum for runtime selection
#[derive(Debug, Clone)]
pub enum Provider {
    /// OpenAI API provider (including Azure OpenAI and compatible APIs)
    ///
    /// # Example
    /// ```rust,ignore
    /// let provider = Provider::OpenAI {
    ///     api_key: "sk-...".to_string(),
    ///     api_base: "https://api.openai.com/v1".to_string(),
    ///     model: "gpt-4o".to_string(),
    ///     temperature: 0.3,
    /// };
    /// ```
    OpenAI {
        api_key: String,
        api_base: String,
        model: String,
        temperature: f32,
    },

    /// Ollama local LLM provider
    Ollama { base_url: String, model: String },
}

impl Provider {
    /// Select the provider described by the `[llm]` configuration section.
    ///
    /// A missing OpenAI key is not an error here; the client reports it on
    /// first use so the server can still start and answer health checks.
    pub fn from_config(config: &LlmConfig) -> Self {
        match config.provider {
            LlmProviderKind::OpenAI => Provider::OpenAI {
                api_key: config
                    .api_key
                    .as_ref()
                    .map(|key| key.expose().to_string())
                    .unwrap_or_default(),
                api_base: config.api_base.clone(),
                model: config.model.clone(),
                temperature: config.temperature,
            },
            LlmProviderKind::Ollama => Provider::Ollama {
                base_url: config.ollama_url.clone(),
                model: config.model.clone(),
            },
        }
    }

    /// Create a client instance for this provider
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Config`] if the provider was not compiled in.
    pub fn create_client(&self) -> Result<Box<dyn LLMClient>> {
        match self {
            #[cfg(feature = "openai")]
            Provider::OpenAI {
                api_key,
                api_base,
                model,
                temperature,
            } => Ok(Box::new(super::openai::OpenAIClient::new(
                api_key.clone(),
                api_base.clone(),
                model.clone(),
                *temperature,
            ))),

            #[cfg(feature = "ollama")]
            Provider::Ollama { base_url, model } => Ok(Box::new(
                super::ollama::OllamaClient::new(base_url, model.clone()),
            )),

            #[allow(unreachable_patterns)]
            other => Err(AppError::Config(format!(
                "{} provider is not enabled; rebuild with the '{}' feature",
                other.name(),
                other.name().to_lowercase()
            ))),
        }
    }

    /// Get a human-readable name for this provider
    pub fn name(&self) -> &'static str {
        match self {
            Provider::OpenAI { .. } => "OpenAI",
            Provider::Ollama { .. } => "Ollama",
        }
    }

    pub fn model(&self) -> &str {
        match self {
            Provider::OpenAI { model, .. } | Provider::Ollama { model, .. } => model,
        }
    }
}
