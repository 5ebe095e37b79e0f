//! Axum route handlers for email generation, export and tracking.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::cv::models::CvExtraction;
use crate::email::export::{email_export_file_name, EmailExport};
use crate::email::generator::{generate_email, SenderProfile};
use crate::email::models::{EmailDraft, GenerateEmailRequest};
use crate::email::tracker::{
    EmailRecord, EmailStatistics, EmailStatus, DUPLICATE_WINDOW_DAYS, HISTORY_LIMIT,
};
use crate::errors::AppError;
use crate::jobs::models::JobData;
use crate::session::WizardSession;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct GenerateEmailResponse {
    pub draft: EmailDraft,
    pub duplicate_warning: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EmailExportResponse {
    pub file_name: String,
    pub data: EmailExport,
}

#[derive(Debug, Default, Deserialize)]
pub struct MarkSentRequest {
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: EmailStatus,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/emails/generate
///
/// Needs both an extracted CV and a parsed job in the session.
pub async fn handle_generate_email(
    State(state): State<AppState>,
    request: Option<Json<GenerateEmailRequest>>,
) -> Result<Json<GenerateEmailResponse>, AppError> {
    let request = request.map(|Json(r)| r).unwrap_or_default();

    let (cv, links, job) = {
        let session = state.session.read().await;
        let (cv, job) = require_cv_and_job(&session)?;
        (cv, session.links.clone(), job)
    };

    let sender = SenderProfile::resolve(&cv, &state.config);
    let email = generate_email(&request, &cv, &links, &job, &sender, &state.llm).await?;

    let draft = EmailDraft {
        email,
        email_type: request.email_type,
        tone: request.tone,
        recipient_name: non_blank(request.recipient_name),
        recipient_email: non_blank(request.recipient_email),
        generated_at: Utc::now(),
    };

    let duplicate_warning = state
        .tracker
        .read()
        .await
        .check_duplicate(&job.job_title, &job.company_name, DUPLICATE_WINDOW_DAYS)
        .then(|| {
            format!(
                "An email has already been sent for this job/company in the last {DUPLICATE_WINDOW_DAYS} days"
            )
        });

    state.session.write().await.email = Some(draft.clone());

    Ok(Json(GenerateEmailResponse {
        draft,
        duplicate_warning,
    }))
}

/// GET /api/v1/emails/current
pub async fn handle_current_email(
    State(state): State<AppState>,
) -> Result<Json<EmailDraft>, AppError> {
    state
        .session
        .read()
        .await
        .email
        .clone()
        .map(Json)
        .ok_or_else(no_draft)
}

/// DELETE /api/v1/emails/current
pub async fn handle_clear_email(State(state): State<AppState>) -> StatusCode {
    state.session.write().await.email = None;
    StatusCode::NO_CONTENT
}

/// GET /api/v1/emails/export
pub async fn handle_export_email(
    State(state): State<AppState>,
) -> Result<Json<EmailExportResponse>, AppError> {
    let session = state.session.read().await;
    let draft = session.email.as_ref().ok_or_else(no_draft)?;
    let (cv, job) = require_cv_and_job(&session)?;

    Ok(Json(EmailExportResponse {
        file_name: email_export_file_name(&job.company_name, Utc::now()),
        data: EmailExport::new(draft, &cv, &job),
    }))
}

/// POST /api/v1/emails/mark-sent
///
/// Records the current draft in the tracker. No email is sent.
pub async fn handle_mark_sent(
    State(state): State<AppState>,
    request: Option<Json<MarkSentRequest>>,
) -> Result<(StatusCode, Json<EmailRecord>), AppError> {
    let notes = request.and_then(|Json(r)| r.notes);

    let record = {
        let session = state.session.read().await;
        let draft = session.email.as_ref().ok_or_else(no_draft)?;
        let (cv, job) = require_cv_and_job(&session)?;
        EmailRecord::from_draft(draft, &cv, &job, notes)
    };

    state.tracker.write().await.add_record(record.clone());
    Ok((StatusCode::CREATED, Json(record)))
}

/// PATCH /api/v1/emails/:id/status
pub async fn handle_update_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<EmailRecord>, AppError> {
    state
        .tracker
        .write()
        .await
        .update_status(id, request.status)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Email record {id} not found")))
}

/// GET /api/v1/emails/history
pub async fn handle_email_history(State(state): State<AppState>) -> Json<Vec<EmailRecord>> {
    Json(state.tracker.read().await.recent_history(HISTORY_LIMIT))
}

/// GET /api/v1/emails/stats
pub async fn handle_email_stats(State(state): State<AppState>) -> Json<EmailStatistics> {
    Json(state.tracker.read().await.statistics())
}

fn require_cv_and_job(session: &WizardSession) -> Result<(CvExtraction, JobData), AppError> {
    let cv = session.cv.clone().ok_or_else(|| {
        AppError::MissingStep("Extract your CV data before generating an email".to_string())
    })?;
    let job = session.job.clone().ok_or_else(|| {
        AppError::MissingStep("Parse a job description before generating an email".to_string())
    })?;
    Ok((cv, job))
}

fn no_draft() -> AppError {
    AppError::NotFound("No email has been generated yet".to_string())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
