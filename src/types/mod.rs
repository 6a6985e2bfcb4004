use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

// ============= API Request Types =============

/// Company research request.
///
/// Optional fields are parsed leniently: a value of the wrong JSON type or a
/// blank string is treated as absent instead of rejecting the request.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ResearchRequest {
    #[serde(default, deserialize_with = "lenient_string")]
    #[schema(example = "Acme Inc")]
    pub company_name: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    #[schema(example = "https://www.acme.example")]
    pub company_url: Option<String>,

    #[serde(default, deserialize_with = "lenient_list")]
    pub keywords: Vec<String>,

    #[serde(default, deserialize_with = "lenient_list")]
    pub partners: Vec<String>,

    #[serde(default = "default_true", deserialize_with = "lenient_bool")]
    pub include_esg_analysis: bool,
}

impl ResearchRequest {
    pub fn new(company_name: impl Into<String>) -> Self {
        Self {
            company_name: Some(company_name.into()),
            company_url: None,
            keywords: vec![],
            partners: vec![],
            include_esg_analysis: true,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.company_url = Some(url.into());
        self
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_partners<I, S>(mut self, partners: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.partners = partners.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_esg(mut self, include: bool) -> Self {
        self.include_esg_analysis = include;
        self
    }

    /// Returns the trimmed company name, or a validation error when it is
    /// missing or blank.
    pub fn validated_name(&self) -> Result<&str> {
        self.company_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| AppError::InvalidInput("company_name is required".to_string()))
    }

    /// Keywords with blank entries removed.
    pub fn clean_keywords(&self) -> Vec<&str> {
        clean_entries(&self.keywords)
    }

    /// Partner names with blank entries removed.
    pub fn clean_partners(&self) -> Vec<&str> {
        clean_entries(&self.partners)
    }
}

fn clean_entries(items: &[String]) -> Vec<&str> {
    items
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect()
}

fn default_true() -> bool {
    true
}

fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    })
}

/// Accepts an array of strings or a single comma-separated string.
fn lenient_list<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let items = match value {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        Some(Value::String(s)) => s.split(',').map(str::to_string).collect(),
        _ => vec![],
    };

    Ok(items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect())
}

fn lenient_bool<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Bool(b)) => b,
        Some(Value::String(s)) => !matches!(s.trim().to_ascii_lowercase().as_str(), "false" | "no" | "0"),
        _ => default_true(),
    })
}

// ============= Search Types =============

/// A single hit returned by a search backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub snippet: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
}

impl SearchResult {
    pub fn new(title: impl Into<String>, url: impl Into<String>, snippet: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            snippet: snippet.into(),
            score: None,
        }
    }
}

// ============= ESG Types =============

/// The seven fixed ESG evaluation dimensions, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum EsgCategory {
    FacilityLocations,
    SustainabilityReporting,
    EsgPolicies,
    EnvironmentalManagement,
    LegalIssues,
    Governance,
    ClimateAction,
}

impl EsgCategory {
    pub const ALL: [EsgCategory; 7] = [
        EsgCategory::FacilityLocations,
        EsgCategory::SustainabilityReporting,
        EsgCategory::EsgPolicies,
        EsgCategory::EnvironmentalManagement,
        EsgCategory::LegalIssues,
        EsgCategory::Governance,
        EsgCategory::ClimateAction,
    ];

    /// Human-readable heading used in prompts and markdown.
    pub fn label(&self) -> &'static str {
        match self {
            EsgCategory::FacilityLocations => "Facility Locations",
            EsgCategory::SustainabilityReporting => "Sustainability Reporting",
            EsgCategory::EsgPolicies => "ESG Policies",
            EsgCategory::EnvironmentalManagement => "Environmental Management",
            EsgCategory::LegalIssues => "Legal Issues",
            EsgCategory::Governance => "Governance",
            EsgCategory::ClimateAction => "Climate Action",
        }
    }

    /// Search terms appended to the company name for this category.
    pub fn search_terms(&self) -> &'static str {
        match self {
            EsgCategory::FacilityLocations => "factory facility locations address coordinates",
            EsgCategory::SustainabilityReporting => "sustainability report CDP GRI disclosure",
            EsgCategory::EsgPolicies => "ESG policy ISO 14001 ISO 45001 standards",
            EsgCategory::EnvironmentalManagement => {
                "environmental management system certification waste energy"
            }
            EsgCategory::LegalIssues => "environmental lawsuit penalty fine violation",
            EsgCategory::Governance => "governance ethics bribery tax competition investigation",
            EsgCategory::ClimateAction => "climate change strategy carbon emission net zero target",
        }
    }

    /// What the model is asked to evaluate for this category.
    pub fn description(&self) -> &'static str {
        match self {
            EsgCategory::FacilityLocations => {
                "factory and facility locations (city, district, address, coordinates)"
            }
            EsgCategory::SustainabilityReporting => {
                "sustainability reports, CDP responses and environmental performance disclosures"
            }
            EsgCategory::EsgPolicies => {
                "ESG, environmental and social policies and standards such as ISO 14001 and ISO 45001"
            }
            EsgCategory::EnvironmentalManagement => {
                "environmental management systems and certifications"
            }
            EsgCategory::LegalIssues => {
                "environmental lawsuits, penalties, impact assessment decisions and workplace accidents"
            }
            EsgCategory::Governance => {
                "tax, competition, bribery and human rights cases involving the company or its partners"
            }
            EsgCategory::ClimateAction => "climate change mitigation and adaptation plans",
        }
    }

    /// Lowercase headings, other than the label itself, that identify this
    /// category in model output.
    pub(crate) fn heading_aliases(&self) -> &'static [&'static str] {
        match self {
            EsgCategory::FacilityLocations => &["facilities", "facility locations and addresses"],
            EsgCategory::SustainabilityReporting => &["sustainability reports", "cdp reporting"],
            EsgCategory::EsgPolicies => &["esg policies and standards", "policies and standards"],
            EsgCategory::EnvironmentalManagement => {
                &["environmental management system", "environmental management systems"]
            }
            EsgCategory::LegalIssues => &["legal issues and lawsuits", "lawsuits"],
            EsgCategory::Governance => &["governance issues"],
            EsgCategory::ClimateAction => &["climate change", "climate action plans"],
        }
    }
}

impl std::fmt::Display for EsgCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// What a planned search query is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum QueryPurpose {
    General,
    Esg(EsgCategory),
}

impl QueryPurpose {
    pub fn is_general(&self) -> bool {
        matches!(self, QueryPurpose::General)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedQuery {
    pub query: String,
    pub purpose: QueryPurpose,
}

// ============= Report Types =============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Citation {
    pub number: usize,
    pub title: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EsgFinding {
    pub category: EsgCategory,
    pub finding: String,
    /// Sorted, de-duplicated citation numbers referenced by the finding.
    pub citations: Vec<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct QueryOutcome {
    pub query: String,
    pub purpose: QueryPurpose,
    pub result_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ResearchStats {
    pub total_queries: usize,
    pub failed_queries: usize,
    pub total_results: usize,
    pub unique_sources: usize,
    pub duration_ms: u64,
    pub queries: Vec<QueryOutcome>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ResearchReport {
    pub request_id: Uuid,
    pub company_name: String,
    pub partners: Vec<String>,
    pub narrative: String,
    pub facility_summary: String,
    pub sustainability_summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub esg_findings: Option<Vec<EsgFinding>>,
    pub citations: Vec<Citation>,
    /// Out-of-range citation numbers the model produced; dropped from the text.
    pub unmatched_citations: Vec<usize>,
    pub stats: ResearchStats,
    pub generated_at: DateTime<Utc>,
}

// ============= Health Types =============

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub components: HealthComponents,
    pub configuration: HealthConfiguration,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthComponents {
    pub search_provider: String,
    pub search_api: String,
    pub llm_provider: String,
    pub llm_api: String,
    pub model: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthConfiguration {
    pub max_search_results: usize,
    pub search_timeout_secs: u64,
    pub max_concurrent_searches: usize,
}

// ============= Error Types =============

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Search unavailable: {0}")]
    SearchUnavailable(String),

    #[error("Research failed: {0}")]
    ResearchFailed(String),

    #[error("Summarization unavailable: {0}")]
    SummarizationUnavailable(String),

    #[error("Summarization malformed: {0}")]
    SummarizationMalformed(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Stable machine-readable name used in error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::InvalidInput(_) => "validation_error",
            AppError::SearchUnavailable(_) => "search_unavailable",
            AppError::ResearchFailed(_) => "research_failed",
            AppError::SummarizationUnavailable(_) => "summarization_unavailable",
            AppError::SummarizationMalformed(_) => "summarization_malformed",
            AppError::Config(_) => "configuration_error",
            AppError::Internal(_) => "internal_error",
        }
    }

    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;

        match self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::SearchUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::ResearchFailed(_) => StatusCode::BAD_GATEWAY,
            AppError::SummarizationUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::SummarizationMalformed(_) => StatusCode::BAD_GATEWAY,
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();

        let body = serde_json::json!({
            "error": self.to_string(),
            "kind": self.kind(),
        });

        (status, axum::Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_defaults() {
        let request: ResearchRequest =
            serde_json::from_value(json!({"company_name": "Acme Inc"})).unwrap();

        assert_eq!(request.validated_name().unwrap(), "Acme Inc");
        assert!(request.include_esg_analysis);
        assert!(request.partners.is_empty());
        assert!(request.keywords.is_empty());
        assert!(request.company_url.is_none());
    }

    #[test]
    fn test_missing_or_blank_name_is_invalid() {
        let missing: ResearchRequest = serde_json::from_value(json!({"partners": []})).unwrap();
        assert!(matches!(missing.validated_name(), Err(AppError::InvalidInput(_))));

        let blank: ResearchRequest =
            serde_json::from_value(json!({"company_name": "   "})).unwrap();
        assert!(matches!(blank.validated_name(), Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn test_malformed_optional_fields_are_absent() {
        let request: ResearchRequest = serde_json::from_value(json!({
            "company_name": "Acme Inc",
            "company_url": 42,
            "keywords": [1, "steel", "  ", null],
            "partners": {"name": "Jane Doe"},
            "include_esg_analysis": "nope"
        }))
        .unwrap();

        assert!(request.company_url.is_none());
        assert_eq!(request.keywords, vec!["steel".to_string()]);
        assert!(request.partners.is_empty());
        assert!(request.include_esg_analysis);
    }

    #[test]
    fn test_comma_separated_keywords() {
        let request: ResearchRequest = serde_json::from_value(json!({
            "company_name": "Acme Inc",
            "keywords": "steel, recycling,,",
            "include_esg_analysis": false
        }))
        .unwrap();

        assert_eq!(request.keywords, vec!["steel", "recycling"]);
        assert!(!request.include_esg_analysis);
    }

    #[test]
    fn test_esg_category_order_and_serde() {
        assert_eq!(EsgCategory::ALL.len(), 7);
        assert_eq!(EsgCategory::ALL[0], EsgCategory::FacilityLocations);
        assert_eq!(EsgCategory::ALL[6], EsgCategory::ClimateAction);

        let value = serde_json::to_value(EsgCategory::LegalIssues).unwrap();
        assert_eq!(value, json!("legal_issues"));
    }

    #[test]
    fn test_error_status_codes() {
        use axum::http::StatusCode;

        assert_eq!(
            AppError::InvalidInput("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::SearchUnavailable("x".into()).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AppError::ResearchFailed("x".into()).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            AppError::SummarizationMalformed("x".into()).kind(),
            "summarization_malformed"
        );
    }
}
