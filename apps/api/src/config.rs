use anyhow::{Context, Result};

use crate::llm_client::{DEFAULT_API_URL, DEFAULT_MODEL};

/// Application configuration loaded from environment variables.
/// Fails at startup if `GROQ_API_KEY` is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub groq_api_key: String,
    pub groq_model: String,
    pub groq_api_url: String,
    pub llm_temperature: f32,
    /// Used as the signature when the CV carries no name.
    pub sender_name: String,
    /// Used as the contact address when the CV carries no email.
    pub email_address: Option<String>,
    pub max_file_size_mb: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            groq_api_key: require_env("GROQ_API_KEY")?,
            groq_model: std::env::var("GROQ_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            groq_api_url: std::env::var("GROQ_API_URL")
                .unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            llm_temperature: std::env::var("LLM_TEMPERATURE")
                .unwrap_or_else(|_| "0.1".to_string())
                .parse::<f32>()
                .context("LLM_TEMPERATURE must be a number")?,
            sender_name: std::env::var("SENDER_NAME").unwrap_or_else(|_| "Your Name".to_string()),
            email_address: std::env::var("EMAIL_ADDRESS")
                .ok()
                .filter(|v| !v.trim().is_empty()),
            max_file_size_mb: std::env::var("MAX_FILE_SIZE_MB")
                .unwrap_or_else(|_| "10".to_string())
                .parse::<usize>()
                .context("MAX_FILE_SIZE_MB must be a positive integer")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Upload limit in bytes, applied to the multipart CV route.
    pub fn max_upload_bytes(&self) -> usize {
        self.max_file_size_mb * 1024 * 1024
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        Config {
            groq_api_key: "test-key".to_string(),
            groq_model: DEFAULT_MODEL.to_string(),
            groq_api_url: "http://127.0.0.1:9/unreachable".to_string(),
            llm_temperature: 0.1,
            sender_name: "Test Sender".to_string(),
            email_address: None,
            max_file_size_mb: 1,
            port: 0,
            rust_log: "debug".to_string(),
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .with_context(|| format!("Required environment variable '{key}' is not set"))
}
