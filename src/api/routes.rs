use crate::AppState;
use crate::api::handlers::{health, research};
use crate::types::{
    Citation, EsgCategory, EsgFinding, HealthComponents, HealthConfiguration,
    HealthResponse, QueryOutcome, QueryPurpose, ResearchReport, ResearchRequest, ResearchStats,
    StatusResponse,
};
use axum::{
    Json, Router,
    routing::{get, post},
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::root,
        health::health,
        research::research,
        research::research_markdown,
    ),
    components(schemas(
        ResearchRequest,
        ResearchReport,
        ResearchStats,
        QueryOutcome,
        QueryPurpose,
        Citation,
        EsgFinding,
        EsgCategory,
        StatusResponse,
        HealthResponse,
        HealthComponents,
        HealthConfiguration,
    )),
    tags(
        (name = "research", description = "Company research and ESG analysis"),
        (name = "health", description = "Service status"),
    ),
    info(title = "Company Research API", description = "Cited company research reports with optional ESG analysis")
)]
pub struct ApiDoc;

#[cfg(not(feature = "swagger-ui"))]
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn create_router() -> Router<AppState> {
    let router = Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health))
        .route("/research", post(research::research))
        .route("/research/markdown", post(research::research_markdown));

    // Swagger UI serves the document itself at the same path.
    #[cfg(feature = "swagger-ui")]
    let router = router.merge(
        utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
            .url("/api-docs/openapi.json", ApiDoc::openapi()),
    );
    #[cfg(not(feature = "swagger-ui"))]
    let router = router.route("/api-docs/openapi.json", get(openapi_json));

    router
}
