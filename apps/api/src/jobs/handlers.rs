//! Axum route handlers for step 3 of the wizard.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::email::tracker::DUPLICATE_WINDOW_DAYS;
use crate::errors::AppError;
use crate::jobs::models::{JobData, JobOverrides, ScrapedJob};
use crate::jobs::parser::{parse_job_description, scrape_and_parse_job};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ParseJobRequest {
    pub job_description: String,
}

#[derive(Debug, Deserialize)]
pub struct ScrapeJobRequest {
    pub url: String,
    #[serde(flatten)]
    pub overrides: JobOverrides,
}

#[derive(Debug, Deserialize)]
pub struct ScrapePreviewRequest {
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct JobResponse {
    pub job: JobData,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scraped: Option<ScrapedJob>,
    /// Set when outreach for the same title and company was recorded recently.
    pub duplicate_warning: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/jobs/parse
pub async fn handle_parse_job(
    State(state): State<AppState>,
    Json(request): Json<ParseJobRequest>,
) -> Result<Json<JobResponse>, AppError> {
    let job = parse_job_description(&request.job_description, &state.llm).await?;
    Ok(Json(store_job(&state, job, None).await))
}

/// POST /api/v1/jobs/scrape
///
/// Scrapes the posting, parses it with the LLM and applies manual title/company overrides.
pub async fn handle_scrape_job(
    State(state): State<AppState>,
    Json(request): Json<ScrapeJobRequest>,
) -> Result<Json<JobResponse>, AppError> {
    if request.url.trim().is_empty() {
        return Err(AppError::Validation("url cannot be empty".to_string()));
    }
    let (scraped, job) =
        scrape_and_parse_job(&request.url, &state.scraper, &state.llm, &request.overrides)
            .await?;
    Ok(Json(store_job(&state, job, Some(scraped)).await))
}

/// POST /api/v1/jobs/scrape/preview
///
/// Runs only the scraper so the user can check what was pulled from the page.
pub async fn handle_scrape_preview(
    State(state): State<AppState>,
    Json(request): Json<ScrapePreviewRequest>,
) -> Result<Json<ScrapedJob>, AppError> {
    let scraped = state.scraper.scrape(&request.url).await?;
    Ok(Json(scraped))
}

/// GET /api/v1/jobs/current
pub async fn handle_current_job(
    State(state): State<AppState>,
) -> Result<Json<JobData>, AppError> {
    state
        .session
        .read()
        .await
        .job
        .clone()
        .map(Json)
        .ok_or_else(|| AppError::NotFound("No job has been parsed yet".to_string()))
}

async fn store_job(state: &AppState, job: JobData, scraped: Option<ScrapedJob>) -> JobResponse {
    let is_duplicate = state.tracker.read().await.check_duplicate(
        &job.job_title,
        &job.company_name,
        DUPLICATE_WINDOW_DAYS,
    );
    let duplicate_warning = is_duplicate.then(|| {
        format!(
            "An email has already been sent for this job/company in the last {DUPLICATE_WINDOW_DAYS} days"
        )
    });

    state.session.write().await.set_job(job.clone());

    JobResponse {
        job,
        scraped,
        duplicate_warning,
    }
}
