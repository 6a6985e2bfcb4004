use crate::{
    AppState,
    research::report::render_markdown,
    types::{AppError, ResearchReport, ResearchRequest, Result},
};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::header,
    response::IntoResponse,
};

fn payload(body: std::result::Result<Json<ResearchRequest>, JsonRejection>) -> Result<ResearchRequest> {
    body.map(|Json(request)| request)
        .map_err(|rejection| AppError::InvalidInput(rejection.body_text()))
}

async fn run(state: &AppState, request: ResearchRequest) -> Result<ResearchReport> {
    request.validated_name()?;
    state.orchestrator.research(&request).await.inspect_err(|e| {
        tracing::error!(kind = e.kind(), "Research request failed: {}", e);
    })
}

/// Research a company and return the structured report
#[utoipa::path(
    post,
    path = "/research",
    request_body = ResearchRequest,
    responses(
        (status = 200, description = "Research completed", body = ResearchReport),
        (status = 400, description = "Missing company name or invalid JSON"),
        (status = 502, description = "Every search query failed or the model output was unusable"),
        (status = 503, description = "Search or language model service unavailable")
    ),
    tag = "research"
)]
pub async fn research(
    State(state): State<AppState>,
    body: std::result::Result<Json<ResearchRequest>, JsonRejection>,
) -> Result<Json<ResearchReport>> {
    let report = run(&state, payload(body)?).await?;
    Ok(Json(report))
}

/// Research a company and return the report as a markdown document
#[utoipa::path(
    post,
    path = "/research/markdown",
    request_body = ResearchRequest,
    responses(
        (status = 200, description = "Research completed", body = String, content_type = "text/markdown"),
        (status = 400, description = "Missing company name or invalid JSON"),
        (status = 502, description = "Every search query failed or the model output was unusable"),
        (status = 503, description = "Search or language model service unavailable")
    ),
    tag = "research"
)]
pub async fn research_markdown(
    State(state): State<AppState>,
    body: std::result::Result<Json<ResearchRequest>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let report = run(&state, payload(body)?).await?;
    Ok((
        [(header::CONTENT_TYPE, "text/markdown; charset=utf-8")],
        render_markdown(&report),
    ))
}
