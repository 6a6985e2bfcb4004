//! Process-wide configuration.
//!
//! Settings come from an optional TOML file (`research.toml`), then from
//! environment variable overrides. Like the secrets handling elsewhere in the
//! server, the TOML file never contains API keys directly: it names the
//! environment variables that hold them, and those are resolved once at load.
//!
//! The resulting [`AppConfig`] is immutable and shared behind an `Arc`.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Root configuration structure loaded from research.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub llm: LlmConfig,
}

// ============= Server Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Maximum accepted request body in bytes
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_body_limit() -> usize {
    64 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            log_format: LogFormat::default(),
            body_limit_bytes: default_body_limit(),
        }
    }
}

// ============= Search Configuration =============

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchProviderKind {
    #[default]
    Tavily,
    DuckDuckGo,
}

impl SearchProviderKind {
    pub fn name(&self) -> &'static str {
        match self {
            SearchProviderKind::Tavily => "tavily",
            SearchProviderKind::DuckDuckGo => "duckduckgo",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default)]
    pub provider: SearchProviderKind,

    /// Environment variable name containing the search API key
    #[serde(default = "default_search_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_search_base_url")]
    pub base_url: String,

    #[serde(default = "default_max_results")]
    pub max_results: usize,

    #[serde(default = "default_search_depth")]
    pub search_depth: String,

    #[serde(default = "default_search_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,

    /// Resolved from `api_key_env` at load time
    #[serde(skip)]
    pub api_key: Option<ApiKey>,
}

fn default_search_key_env() -> String {
    "TAVILY_API_KEY".to_string()
}

fn default_search_base_url() -> String {
    "https://api.tavily.com".to_string()
}

fn default_max_results() -> usize {
    10
}

fn default_search_depth() -> String {
    "advanced".to_string()
}

fn default_search_timeout() -> u64 {
    30
}

fn default_max_concurrent() -> usize {
    5
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            provider: SearchProviderKind::default(),
            api_key_env: default_search_key_env(),
            base_url: default_search_base_url(),
            max_results: default_max_results(),
            search_depth: default_search_depth(),
            timeout_secs: default_search_timeout(),
            max_concurrent: default_max_concurrent(),
            api_key: None,
        }
    }
}

impl SearchConfig {
    /// Whether the configured backend has everything it needs to run
    pub fn is_configured(&self) -> bool {
        match self.provider {
            SearchProviderKind::Tavily => self.api_key.is_some(),
            SearchProviderKind::DuckDuckGo => true,
        }
    }
}

// ============= LLM Configuration =============

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProviderKind {
    #[default]
    OpenAI,
    Ollama,
}

impl LlmProviderKind {
    pub fn name(&self) -> &'static str {
        match self {
            LlmProviderKind::OpenAI => "openai",
            LlmProviderKind::Ollama => "ollama",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default)]
    pub provider: LlmProviderKind,

    /// Environment variable name containing the LLM API key
    #[serde(default = "default_llm_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_openai_base")]
    pub api_base: String,

    #[serde(default = "default_ollama_url")]
    pub ollama_url: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Resolved from `api_key_env` at load time
    #[serde(skip)]
    pub api_key: Option<ApiKey>,
}

fn default_llm_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_openai_base() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_ollama_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_model() -> String {
    "gpt-4o".to_string()
}

fn default_temperature() -> f32 {
    0.3
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LlmProviderKind::default(),
            api_key_env: default_llm_key_env(),
            api_base: default_openai_base(),
            ollama_url: default_ollama_url(),
            model: default_model(),
            temperature: default_temperature(),
            api_key: None,
        }
    }
}

impl LlmConfig {
    pub fn is_configured(&self) -> bool {
        match self.provider {
            LlmProviderKind::OpenAI => self.api_key.is_some(),
            LlmProviderKind::Ollama => true,
        }
    }
}

// ============= Secrets =============

/// An API key read from the environment. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

// ============= Configuration Loading & Validation =============

/// Errors that can occur during configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Environment variable '{name}' has invalid value '{value}'")]
    InvalidEnv { name: String, value: String },

    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&content)?;

        Ok(config)
    }

    /// Build the startup configuration: file (if present), `.env`, process
    /// environment, then validation.
    ///
    /// A missing file is not an error; defaults are used instead.
    pub fn from_sources(path: &Path) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let mut config = match Self::load(path) {
            Ok(config) => config,
            Err(ConfigError::FileNotFound(_)) => Self::default(),
            Err(e) => return Err(e),
        };

        config.apply_env(|name| std::env::var(name).ok())?;
        config.validate()?;

        Ok(config)
    }

    /// Log a warning for each backend that is missing its API key.
    pub fn warn_unconfigured(&self) {
        if !self.search.is_configured() {
            warn!(
                "Search API key not set (expected in ${}); research requests will fail",
                self.search.api_key_env
            );
        }
        if !self.llm.is_configured() {
            warn!(
                "LLM API key not set (expected in ${}); research requests will fail",
                self.llm.api_key_env
            );
        }
    }

    /// Apply environment overrides and resolve API keys through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(host) = get("HOST") {
            self.server.host = host;
        }
        if let Some(port) = get("PORT") {
            self.server.port = parse_env("PORT", &port)?;
        }
        if let Some(model) = get("OPENAI_MODEL") {
            self.llm.model = model;
        }
        if let Some(max_results) = get("TAVILY_MAX_RESULTS") {
            self.search.max_results = parse_env("TAVILY_MAX_RESULTS", &max_results)?;
        }

        self.search.api_key = get(&self.search.api_key_env).map(ApiKey::new);
        self.llm.api_key = get(&self.llm.api_key_env).map(ApiKey::new);

        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=20).contains(&self.search.max_results) {
            return Err(ConfigError::ValidationError(format!(
                "search.max_results must be between 1 and 20, got {}",
                self.search.max_results
            )));
        }
        if self.search.max_concurrent == 0 {
            return Err(ConfigError::ValidationError(
                "search.max_concurrent must be at least 1".to_string(),
            ));
        }
        if self.search.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "search.timeout_secs must be at least 1".to_string(),
            ));
        }
        if self.llm.model.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "llm.model must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
        name: name.to_string(),
        value: value.to_string(),
    })
}
