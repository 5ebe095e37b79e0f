use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::cv::pdf::PdfError;
use crate::jobs::scraper::ScrapeError;
use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unprocessable entity: {0}")]
    UnprocessableEntity(String),

    /// A wizard step was called before the step it depends on.
    #[error("Missing prerequisite: {0}")]
    MissingStep(String),

    #[error("{context} failed: {source}")]
    Llm {
        context: &'static str,
        #[source]
        source: LlmError,
    },

    #[error("Scraping failed: {0}")]
    Scrape(#[from] ScrapeError),

    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Wraps an LLM failure with the operation it interrupted.
    pub fn llm(context: &'static str) -> impl FnOnce(LlmError) -> AppError {
        move |source| AppError::Llm { context, source }
    }
}

const NO_HINTS: &[&str] = &[];

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut details = serde_json::Value::Null;
        let (status, code, message, hints): (StatusCode, &str, String, &[&str]) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone(), NO_HINTS),
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone(), NO_HINTS)
            }
            AppError::UnprocessableEntity(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "UNPROCESSABLE_ENTITY",
                msg.clone(),
                NO_HINTS,
            ),
            AppError::MissingStep(msg) => (StatusCode::CONFLICT, "MISSING_STEP", msg.clone(), NO_HINTS),
            AppError::Llm { context, source } => {
                tracing::error!("LLM error during {context}: {source}");
                let (status, code) = match source {
                    LlmError::RateLimited { info, .. } => {
                        details = json!(info);
                        (StatusCode::TOO_MANY_REQUESTS, "RATE_LIMITED")
                    }
                    LlmError::Unauthorized => (StatusCode::BAD_GATEWAY, "LLM_AUTH_ERROR"),
                    LlmError::ModelNotFound(_) => (StatusCode::BAD_GATEWAY, "LLM_MODEL_ERROR"),
                    LlmError::Timeout => (StatusCode::GATEWAY_TIMEOUT, "LLM_TIMEOUT"),
                    _ => (StatusCode::BAD_GATEWAY, "LLM_ERROR"),
                };
                (status, code, format!("{context} failed: {source}"), source.hints())
            }
            AppError::Scrape(e) => {
                tracing::warn!("Scrape error: {e}");
                let status = match e {
                    ScrapeError::InvalidUrl(_) => StatusCode::BAD_REQUEST,
                    ScrapeError::Fetch(_) => StatusCode::BAD_GATEWAY,
                    ScrapeError::InsufficientDescription { .. } => {
                        StatusCode::UNPROCESSABLE_ENTITY
                    }
                };
                (status, "SCRAPE_ERROR", e.to_string(), e.hints())
            }
            AppError::Pdf(PdfError::Task(e)) => {
                tracing::error!("PDF extraction task failed: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                    NO_HINTS,
                )
            }
            AppError::Pdf(e) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "PDF_ERROR",
                e.to_string(),
                NO_HINTS,
            ),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                    NO_HINTS,
                )
            }
        };

        let mut error = json!({
            "code": code,
            "message": message,
            "hints": hints,
        });
        if !details.is_null() {
            error["details"] = details;
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::parse_rate_limit_info;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_validation_maps_to_bad_request() {
        let response = AppError::Validation("job_description cannot be empty".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(body["error"]["message"], "job_description cannot be empty");
    }

    #[tokio::test]
    async fn test_rate_limit_carries_usage_details_and_hints() {
        let message = "Limit 1000, Used 990. Please try again in 5m0.1s.".to_string();
        let err = AppError::Llm {
            context: "CV extraction",
            source: LlmError::RateLimited {
                info: parse_rate_limit_info(&message),
                message,
            },
        };
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "RATE_LIMITED");
        assert_eq!(body["error"]["details"]["used"], 990);
        assert_eq!(body["error"]["details"]["time_remaining"], "5m0.1s");
        assert!(body["error"]["hints"].as_array().unwrap().len() >= 2);
    }

    #[tokio::test]
    async fn test_llm_auth_maps_to_bad_gateway() {
        let err = AppError::llm("job parsing")(LlmError::Unauthorized);
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "LLM_AUTH_ERROR");
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .starts_with("job parsing failed"));
    }

    #[tokio::test]
    async fn test_insufficient_description_is_unprocessable() {
        let err = AppError::from(ScrapeError::InsufficientDescription { length: 12 });
        assert_eq!(err.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_pdf_errors_split_client_and_server_faults() {
        let response = AppError::from(PdfError::NoText).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body_json(response).await["error"]["code"], "PDF_ERROR");

        let response = AppError::from(PdfError::Task("task panicked".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["error"]["code"], "INTERNAL_ERROR");
    }

    #[tokio::test]
    async fn test_internal_hides_details() {
        let response = AppError::Internal(anyhow::anyhow!("secret path")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["error"]["message"], "An internal server error occurred");
    }
}
