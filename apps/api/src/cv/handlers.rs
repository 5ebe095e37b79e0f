//! Axum route handlers for steps 1 and 2 of the wizard.

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::cv::extractor::extract_cv_data;
use crate::cv::links::{extract_links_from_text, LinkUsernames, SocialLinks};
use crate::cv::models::{CvExport, CvExtraction, ExtractionValidation, CV_EXPORT_FILE_NAME};
use crate::cv::pdf::{extract_text_from_pdf, UploadedPdf};
use crate::errors::AppError;
use crate::state::AppState;

const TEXT_PREVIEW_CHARS: usize = 500;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct LinksResponse {
    pub links: SocialLinks,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub file_name: String,
    pub characters: usize,
    pub preview: String,
    /// Links found in the PDF text that were not already in the session.
    pub links_found: SocialLinks,
}

#[derive(Debug, Default, Deserialize)]
pub struct ExtractCvRequest {
    /// Raw CV text. When absent, the text of the last upload is used.
    pub cv_text: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ExtractCvResponse {
    pub cv: CvExtraction,
    pub validation: ExtractionValidation,
}

#[derive(Debug, Serialize)]
pub struct CvResponse {
    pub cv: CvExtraction,
    pub links: SocialLinks,
}

#[derive(Debug, Serialize)]
pub struct CvExportResponse {
    pub file_name: &'static str,
    pub data: CvExport,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// PUT /api/v1/cv/links
///
/// Replaces the session's links with profile URLs built from usernames.
pub async fn handle_set_links(
    State(state): State<AppState>,
    Json(request): Json<LinkUsernames>,
) -> Result<Json<LinksResponse>, AppError> {
    let links = SocialLinks::from_usernames(&request);
    info!("Collected {} social links", links.len());

    let mut session = state.session.write().await;
    session.links = links.clone();
    session.links_confirmed = true;

    Ok(Json(LinksResponse {
        count: links.len(),
        links,
    }))
}

/// POST /api/v1/cv/upload
///
/// Accepts a multipart `file` field holding a PDF and stores its text.
pub async fn handle_upload_cv(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let limit_mb = state.config.max_file_size_mb;
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, "Invalid multipart body", limit_mb))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(String::from);
        let data = field
            .bytes()
            .await
            .map_err(|e| multipart_error(e, "Could not read upload", limit_mb))?;
        upload = Some(UploadedPdf {
            file_name,
            content_type,
            data,
        });
        break;
    }

    let upload =
        upload.ok_or_else(|| AppError::Validation("Missing multipart field 'file'".to_string()))?;
    if !upload.looks_like_pdf() {
        return Err(AppError::Validation(
            "Only PDF files are supported".to_string(),
        ));
    }
    if upload.data.len() > state.config.max_upload_bytes() {
        return Err(file_too_large(limit_mb));
    }
    if upload.data.is_empty() {
        return Err(AppError::Validation("Uploaded file is empty".to_string()));
    }

    let text = extract_text_from_pdf(upload.data.clone()).await?;
    let mined = extract_links_from_text(&text);
    info!(
        "Extracted {} characters from {} ({} links found)",
        text.len(),
        upload.file_name,
        mined.len()
    );

    let mut session = state.session.write().await;
    let before = session.links.clone();
    session.links.merge_missing(&mined);
    let mut links_found = SocialLinks::default();
    for (label, url) in session.links.iter() {
        if before.iter().all(|(_, known)| known != url) {
            links_found.insert(label, url);
        }
    }
    session.cv_text = Some(text.clone());

    Ok(Json(UploadResponse {
        file_name: upload.file_name,
        characters: text.chars().count(),
        preview: text.chars().take(TEXT_PREVIEW_CHARS).collect(),
        links_found,
    }))
}

fn file_too_large(limit_mb: usize) -> AppError {
    AppError::Validation(format!("File exceeds the {limit_mb} MB limit"))
}

/// Bodies cut off by the route's body limit report the same error as the exact size check.
fn multipart_error(e: MultipartError, context: &str, limit_mb: usize) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        file_too_large(limit_mb)
    } else {
        AppError::Validation(format!("{context}: {e}"))
    }
}

/// POST /api/v1/cv/extract
///
/// Runs LLM extraction and rejects results that look like placeholder data.
pub async fn handle_extract_cv(
    State(state): State<AppState>,
    request: Option<Json<ExtractCvRequest>>,
) -> Result<Json<ExtractCvResponse>, AppError> {
    let provided = request
        .and_then(|Json(r)| r.cv_text)
        .filter(|text| !text.trim().is_empty());

    let cv_text = match provided.clone() {
        Some(text) => text,
        None => state.session.read().await.cv_text.clone().ok_or_else(|| {
            AppError::MissingStep("Upload a CV or provide cv_text before extracting".to_string())
        })?,
    };

    let cv = extract_cv_data(&cv_text, &state.llm).await?;
    let validation = cv.validate();
    if !validation.passed {
        return Err(AppError::UnprocessableEntity(validation.message));
    }

    let mut session = state.session.write().await;
    if let Some(text) = provided {
        session.cv_text = Some(text);
    }
    session.set_cv(cv.clone());

    Ok(Json(ExtractCvResponse { cv, validation }))
}

/// GET /api/v1/cv
pub async fn handle_get_cv(State(state): State<AppState>) -> Result<Json<CvResponse>, AppError> {
    let session = state.session.read().await;
    let cv = session
        .cv
        .clone()
        .ok_or_else(|| AppError::NotFound("No CV has been extracted yet".to_string()))?;
    Ok(Json(CvResponse {
        cv,
        links: session.links.clone(),
    }))
}

/// GET /api/v1/cv/export
pub async fn handle_export_cv(
    State(state): State<AppState>,
) -> Result<Json<CvExportResponse>, AppError> {
    let session = state.session.read().await;
    let cv = session
        .cv
        .clone()
        .ok_or_else(|| AppError::NotFound("No CV has been extracted yet".to_string()))?;
    Ok(Json(CvExportResponse {
        file_name: CV_EXPORT_FILE_NAME,
        data: CvExport {
            cv,
            manual_links: session.links.clone(),
        },
    }))
}
