//! PDF text extraction for uploaded CVs.

use std::sync::OnceLock;

use bytes::Bytes;
use regex::Regex;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("Error reading PDF: {0}")]
    Unreadable(String),

    #[error(
        "No text could be extracted from the PDF. The PDF might be image-based or corrupted."
    )]
    NoText,

    #[error("PDF extraction task failed: {0}")]
    Task(String),
}

/// A CV file received from a multipart upload.
#[derive(Debug, Clone)]
pub struct UploadedPdf {
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl UploadedPdf {
    /// Accepts `.pdf` file names or an `application/pdf` content type.
    pub fn looks_like_pdf(&self) -> bool {
        self.file_name.to_lowercase().ends_with(".pdf")
            || self.content_type.as_deref() == Some("application/pdf")
    }
}

/// Extracts and tidies the text of every page. Runs the parser on the blocking pool.
pub async fn extract_text_from_pdf(data: Bytes) -> Result<String, PdfError> {
    let raw = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&data))
        .await
        .map_err(|e| PdfError::Task(e.to_string()))?
        .map_err(|e| PdfError::Unreadable(e.to_string()))?;

    debug!("Extracted {} raw characters from PDF", raw.len());
    clean_extracted_text(&raw).ok_or(PdfError::NoText)
}

/// Collapses blank-line runs and repeated spaces. Returns `None` when nothing is left.
pub fn clean_extracted_text(raw: &str) -> Option<String> {
    static BLANK_LINES: OnceLock<Regex> = OnceLock::new();
    static SPACES: OnceLock<Regex> = OnceLock::new();

    let blank_lines = BLANK_LINES.get_or_init(|| Regex::new(r"\n\s*\n").unwrap());
    let spaces = SPACES.get_or_init(|| Regex::new(r" +").unwrap());

    // Form feeds separate pages in extractor output
    let text = raw.replace('\u{c}', "\n\n");
    let text = blank_lines.replace_all(text.trim(), "\n\n");
    let text = spaces.replace_all(&text, " ");
    let text = text.trim();

    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}
