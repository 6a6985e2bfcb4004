use crate::{
    AppState,
    types::{HealthComponents, HealthConfiguration, HealthResponse, StatusResponse},
};
use axum::{Json, extract::State};

const SERVICE: &str = "Company Research API";
const VERSION: &str = env!("CARGO_PKG_VERSION");

fn configured(ok: bool) -> String {
    let state = if ok { "configured" } else { "not_configured" };
    state.to_string()
}

/// Liveness check
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Service is running", body = StatusResponse)),
    tag = "health"
)]
pub async fn root() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "healthy".to_string(),
        service: SERVICE.to_string(),
        version: VERSION.to_string(),
    })
}

/// Component and configuration status
///
/// Reports `degraded` when the search or LLM backend is missing its API key.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service health", body = HealthResponse)),
    tag = "health"
)]
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let config = &state.config;
    let search_ok = config.search.is_configured();
    let llm_ok = config.llm.is_configured();

    Json(HealthResponse {
        status: if search_ok && llm_ok { "healthy" } else { "degraded" }.to_string(),
        service: SERVICE.to_string(),
        version: VERSION.to_string(),
        components: HealthComponents {
            search_provider: config.search.provider.name().to_string(),
            search_api: configured(search_ok),
            llm_provider: config.llm.provider.name().to_string(),
            llm_api: configured(llm_ok),
            model: config.llm.model.clone(),
        },
        configuration: HealthConfiguration {
            max_search_results: config.search.max_results,
            search_timeout_secs: config.search.timeout_secs,
            max_concurrent_searches: config.search.max_concurrent,
        },
    })
}
