/// LLM Client: the single point of entry for all LLM calls in Outreach.
///
/// ARCHITECTURAL RULE: No other module may call the provider API directly.
/// All LLM interactions MUST go through this module.
///
/// Provider: Groq, via its OpenAI-compatible chat completions endpoint.
/// Calls are made once; failures are classified into user-facing kinds
/// instead of being retried (daily token limits do not clear on retry).
use std::sync::OnceLock;
use std::time::Duration;

use regex::Regex;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

pub const DEFAULT_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";
const MAX_TOKENS: u32 = 4096;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Models known to work with the structured extraction prompts.
pub const AVAILABLE_MODELS: &[(&str, &str)] = &[
    ("llama-3.3-70b-versatile", "High performance, versatile model"),
    ("llama-3.1-8b-instant", "Fast, lightweight model"),
    ("mixtral-8x7b-32768", "Mixtral model with large context"),
    ("gemma-7b-it", "Google's Gemma model"),
];

/// Usage details parsed out of a provider rate-limit message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateLimitInfo {
    pub limit: Option<u64>,
    pub used: Option<u64>,
    pub percentage: Option<f64>,
    pub time_remaining: Option<String>,
}

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request to the LLM provider timed out")]
    Timeout,

    #[error("Rate limit exceeded: {message}")]
    RateLimited {
        message: String,
        info: RateLimitInfo,
    },

    #[error("Invalid or missing API key")]
    Unauthorized,

    #[error("Model not available: {0}")]
    ModelNotFound(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,
}

impl LlmError {
    /// Classifies a failed provider response into a user-facing error kind.
    pub fn from_api_failure(status: u16, message: String) -> Self {
        let lower = message.to_lowercase();
        if status == 429 || lower.contains("rate_limit_exceeded") {
            let info = parse_rate_limit_info(&message);
            LlmError::RateLimited { message, info }
        } else if status == 401 || lower.contains("unauthorized") {
            LlmError::Unauthorized
        } else if lower.contains("model") && lower.contains("not found") {
            LlmError::ModelNotFound(message)
        } else if lower.contains("timeout") {
            LlmError::Timeout
        } else {
            LlmError::Api { status, message }
        }
    }

    /// Suggested next steps shown alongside the error message.
    pub fn hints(&self) -> &'static [&'static str] {
        match self {
            LlmError::RateLimited { .. } => &[
                "Wait for the rate limit to reset",
                "Upgrade your plan at https://console.groq.com/settings/billing",
                "Try again later",
            ],
            LlmError::Unauthorized => &[
                "Check GROQ_API_KEY in your .env file",
                "Get a new API key from https://console.groq.com/keys",
                "Restart the server after updating the key",
            ],
            LlmError::ModelNotFound(_) => &[
                "Check GROQ_MODEL in your environment",
                "Pick one of the models listed at /api/v1/model",
            ],
            LlmError::Timeout | LlmError::Http(_) => &[
                "Check your internet connection",
                "Try again in a few minutes",
                "The request might be too large",
            ],
            LlmError::Api { .. } | LlmError::Parse(_) | LlmError::EmptyContent => &[
                "Verify your Groq API key is valid",
                "Try again with different input",
            ],
        }
    }
}

/// Pulls `Limit N`, `Used N` and `Please try again in ...` out of a rate-limit message.
pub fn parse_rate_limit_info(message: &str) -> RateLimitInfo {
    static RETRY_RE: OnceLock<Regex> = OnceLock::new();
    static LIMIT_RE: OnceLock<Regex> = OnceLock::new();
    static USED_RE: OnceLock<Regex> = OnceLock::new();

    let retry_re =
        RETRY_RE.get_or_init(|| Regex::new(r"Please try again in (\d[\dhms.]*)").unwrap());
    let limit_re = LIMIT_RE.get_or_init(|| Regex::new(r"Limit (\d+)").unwrap());
    let used_re = USED_RE.get_or_init(|| Regex::new(r"Used (\d+)").unwrap());

    let capture_u64 = |re: &Regex| {
        re.captures(message)
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse::<u64>().ok())
    };

    let limit = capture_u64(limit_re);
    let used = capture_u64(used_re);
    let percentage = match (limit, used) {
        (Some(limit), Some(used)) if limit > 0 => Some(used as f64 / limit as f64 * 100.0),
        _ => None,
    };
    let time_remaining = retry_re
        .captures(message)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim_end_matches('.').to_string());

    RateLimitInfo {
        limit,
        used,
        percentage,
        time_remaining,
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    max_tokens: u32,
    messages: Vec<ChatMessage<'a>>,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct LlmResponse {
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl LlmResponse {
    /// Extracts the text content of the first choice.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .filter(|t| !t.trim().is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    error: ProviderErrorBody,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    message: String,
    #[serde(default)]
    code: Option<String>,
}

/// The single LLM client used by all services in Outreach.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    api_url: String,
    model: String,
    temperature: f32,
}

impl LlmClient {
    pub fn new(
        api_key: String,
        api_url: String,
        model: String,
        temperature: f32,
    ) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().timeout(REQUEST_TIMEOUT).build()?,
            api_key,
            api_url,
            model,
            temperature,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Makes a single call to the chat completions API, returning the full response object.
    pub async fn call(&self, prompt: &str, system: &str) -> Result<LlmResponse, LlmError> {
        let request_body = ChatRequest {
            model: &self.model,
            temperature: self.temperature,
            max_tokens: MAX_TOKENS,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            response_format: ResponseFormat {
                format_type: "json_object",
            },
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout
                } else {
                    LlmError::Http(e)
                }
            })?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("LLM API returned {}: {}", status, body);
            // Prefer the provider's message, but keep its error code visible for classification
            let message = serde_json::from_str::<ProviderError>(&body)
                .map(|e| match e.error.code {
                    Some(code) => format!("{} ({code})", e.error.message),
                    None => e.error.message,
                })
                .unwrap_or(body);
            return Err(LlmError::from_api_failure(status.as_u16(), message));
        }

        let llm_response: LlmResponse = response.json().await?;

        if let Some(usage) = &llm_response.usage {
            debug!(
                "LLM call succeeded: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        Ok(llm_response)
    }

    /// Convenience method that calls the LLM and deserializes the text response as JSON.
    /// The prompt must instruct the model to return valid JSON.
    pub async fn call_json<T: DeserializeOwned>(
        &self,
        prompt: &str,
        system: &str,
    ) -> Result<T, LlmError> {
        let response = self.call(prompt, system).await?;
        let text = response.text().ok_or(LlmError::EmptyContent)?;
        decode_json(text)
    }
}

/// Decodes model output as JSON, tolerating markdown code fences.
pub fn decode_json<T: DeserializeOwned>(text: &str) -> Result<T, LlmError> {
    serde_json::from_str(strip_json_fences(text)).map_err(LlmError::Parse)
}

/// Field deserializer for model output: an explicit `null` reads as the default.
pub fn null_as_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(d).map(Option::unwrap_or_default)
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let inner = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"));
    match inner {
        Some(stripped) => stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start()),
        None => text,
    }
}
