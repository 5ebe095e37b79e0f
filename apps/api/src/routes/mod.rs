pub mod health;
pub mod session;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post, put},
    Router,
};

use crate::cv::handlers as cv;
use crate::email::handlers as email;
use crate::jobs::handlers as jobs;
use crate::state::AppState;

/// Multipart framing on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes() + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/model", get(health::model_handler))
        .route(
            "/api/v1/session",
            get(session::session_handler).delete(session::clear_session_handler),
        )
        // Steps 1-2: links and CV
        .route("/api/v1/cv", get(cv::handle_get_cv))
        .route("/api/v1/cv/links", put(cv::handle_set_links))
        .route(
            "/api/v1/cv/upload",
            post(cv::handle_upload_cv).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/api/v1/cv/extract", post(cv::handle_extract_cv))
        .route("/api/v1/cv/export", get(cv::handle_export_cv))
        // Step 3: job
        .route("/api/v1/jobs/parse", post(jobs::handle_parse_job))
        .route("/api/v1/jobs/scrape", post(jobs::handle_scrape_job))
        .route(
            "/api/v1/jobs/scrape/preview",
            post(jobs::handle_scrape_preview),
        )
        .route("/api/v1/jobs/current", get(jobs::handle_current_job))
        // Steps 4-5: email and tracking
        .route("/api/v1/emails/generate", post(email::handle_generate_email))
        .route(
            "/api/v1/emails/current",
            get(email::handle_current_email).delete(email::handle_clear_email),
        )
        .route("/api/v1/emails/export", get(email::handle_export_email))
        .route("/api/v1/emails/mark-sent", post(email::handle_mark_sent))
        .route(
            "/api/v1/emails/:id/status",
            patch(email::handle_update_status),
        )
        .route("/api/v1/emails/history", get(email::handle_email_history))
        .route("/api/v1/emails/stats", get(email::handle_email_stats))
        .with_state(state)
}
