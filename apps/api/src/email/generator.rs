//! Email generator. Combines CV, links and job into a personalized cold email.

use serde::Deserialize;
use tracing::info;

use crate::config::Config;
use crate::cv::links::SocialLinks;
use crate::cv::models::{CvExport, CvExtraction};
use crate::email::models::{GenerateEmailRequest, GeneratedEmail};
use crate::email::prompts::{EMAIL_PROMPT_TEMPLATE, EMAIL_ROLE};
use crate::errors::AppError;
use crate::jobs::models::JobData;
use crate::llm_client::prompts::system_prompt;
use crate::llm_client::LlmClient;
use crate::llm_client::null_as_default;

pub const DEFAULT_RECIPIENT_NAME: &str = "Hiring Manager";
pub const DEFAULT_RECIPIENT_EMAIL: &str = "Not specified";

/// Who signs the email. The CV wins; configuration fills the gaps.
#[derive(Debug, Clone, PartialEq)]
pub struct SenderProfile {
    pub name: String,
    pub email: Option<String>,
}

impl SenderProfile {
    pub fn resolve(cv: &CvExtraction, config: &Config) -> Self {
        let name = match cv.name.trim() {
            "" => config.sender_name.clone(),
            name => name.to_string(),
        };
        let email = match cv.email.trim() {
            "" => config.email_address.clone(),
            email => Some(email.to_string()),
        };
        Self { name, email }
    }
}

/// Model output before the score is clamped. Scores arrive as ints or floats.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct EmailReply {
    #[serde(deserialize_with = "null_as_default")]
    subject_line: String,
    #[serde(deserialize_with = "null_as_default")]
    greeting: String,
    #[serde(deserialize_with = "null_as_default")]
    introduction: String,
    #[serde(deserialize_with = "null_as_default")]
    body: String,
    #[serde(deserialize_with = "null_as_default")]
    call_to_action: String,
    #[serde(deserialize_with = "null_as_default")]
    closing: String,
    #[serde(deserialize_with = "null_as_default")]
    full_email: String,
    #[serde(deserialize_with = "null_as_default")]
    personalization_score: f64,
}

impl From<EmailReply> for GeneratedEmail {
    fn from(reply: EmailReply) -> Self {
        let full_email = if reply.full_email.trim().is_empty() {
            [
                &reply.greeting,
                &reply.introduction,
                &reply.body,
                &reply.call_to_action,
                &reply.closing,
            ]
            .iter()
            .map(|part| part.trim())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n")
        } else {
            reply.full_email
        };

        GeneratedEmail {
            subject_line: reply.subject_line,
            greeting: reply.greeting,
            introduction: reply.introduction,
            body: reply.body,
            call_to_action: reply.call_to_action,
            closing: reply.closing,
            full_email,
            personalization_score: clamp_score(reply.personalization_score),
        }
    }
}

fn clamp_score(raw: f64) -> u8 {
    if raw.is_nan() {
        return 1;
    }
    raw.round().clamp(1.0, 10.0) as u8
}

pub fn build_email_prompt(
    request: &GenerateEmailRequest,
    cv: &CvExtraction,
    links: &SocialLinks,
    job: &JobData,
    sender: &SenderProfile,
) -> String {
    let cv_with_links = CvExport {
        cv: cv.clone(),
        manual_links: links.clone(),
    };
    let cv_json = serde_json::to_string_pretty(&cv_with_links).unwrap_or_default();
    let job_json = serde_json::to_string_pretty(job).unwrap_or_default();

    let or_default = |value: &Option<String>, default: &str| {
        value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(default)
            .to_string()
    };

    EMAIL_PROMPT_TEMPLATE
        .replace("{email_type}", request.email_type.label())
        .replace("{tone}", request.tone.label())
        .replace(
            "{recipient_name}",
            &or_default(&request.recipient_name, DEFAULT_RECIPIENT_NAME),
        )
        .replace(
            "{recipient_email}",
            &or_default(&request.recipient_email, DEFAULT_RECIPIENT_EMAIL),
        )
        .replace("{sender_name}", &sender.name)
        .replace("{sender_email}", &or_default(&sender.email, DEFAULT_RECIPIENT_EMAIL))
        .replace("{cv_json}", &cv_json)
        .replace("{job_json}", &job_json)
}

pub async fn generate_email(
    request: &GenerateEmailRequest,
    cv: &CvExtraction,
    links: &SocialLinks,
    job: &JobData,
    sender: &SenderProfile,
    llm: &LlmClient,
) -> Result<GeneratedEmail, AppError> {
    let prompt = build_email_prompt(request, cv, links, job, sender);
    let reply: EmailReply = llm
        .call_json(&prompt, &system_prompt(EMAIL_ROLE))
        .await
        .map_err(AppError::llm("Email generation"))?;

    let email = GeneratedEmail::from(reply);
    info!(
        "Generated {} email for {:?} at {:?} (personalization {}/10)",
        request.email_type.label(),
        job.job_title,
        job.company_name,
        email.personalization_score
    );
    Ok(email)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::email::models::{EmailType, Tone};
    use crate::llm_client::decode_json;

    fn cv() -> CvExtraction {
        CvExtraction {
            name: "Amara Okafor".to_string(),
            experience: vec!["ML Engineer at Contoso, 2021-2024".to_string()],
            ..Default::default()
        }
    }

    fn job() -> JobData {
        JobData {
            job_title: "Senior ML Engineer".to_string(),
            company_name: "Fabrikam".to_string(),
            ..Default::default()
        }
    }

    fn links() -> SocialLinks {
        let mut links = SocialLinks::default();
        links.insert("GitHub", "https://github.com/amarao");
        links
    }

    #[test]
    fn test_sender_prefers_cv_over_config() {
        let config = Config {
            email_address: Some("fallback@mailbox.org".to_string()),
            ..Config::for_tests()
        };
        let sender = SenderProfile::resolve(&cv(), &config);
        assert_eq!(sender.name, "Amara Okafor");
        assert_eq!(sender.email.as_deref(), Some("fallback@mailbox.org"));

        let sender = SenderProfile::resolve(&CvExtraction::default(), &config);
        assert_eq!(sender.name, "Test Sender");
    }

    #[test]
    fn test_prompt_uses_recipient_defaults_and_links() {
        let request = GenerateEmailRequest {
            recipient_name: Some("  ".to_string()),
            ..Default::default()
        };
        let sender = SenderProfile {
            name: "Amara Okafor".to_string(),
            email: None,
        };
        let prompt = build_email_prompt(&request, &cv(), &links(), &job(), &sender);
        assert!(prompt.contains("RECIPIENT NAME: Hiring Manager"));
        assert!(prompt.contains("RECIPIENT EMAIL: Not specified"));
        assert!(prompt.contains("https://github.com/amarao"));
        assert!(prompt.contains("\"company_name\": \"Fabrikam\""));
        assert!(prompt.contains("EMAIL TYPE: Industry Position"));
        assert!(!prompt.contains("{tone}"));
    }

    #[test]
    fn test_prompt_carries_type_and_tone() {
        let request = GenerateEmailRequest {
            email_type: EmailType::Academic,
            tone: Tone::Authentic,
            recipient_name: Some("Prof. Lindqvist".to_string()),
            recipient_email: Some("lindqvist@uni.example".to_string()),
        };
        let sender = SenderProfile {
            name: "Amara Okafor".to_string(),
            email: Some("amara@mailbox.org".to_string()),
        };
        let prompt = build_email_prompt(&request, &cv(), &links(), &job(), &sender);
        assert!(prompt.contains("TONE: Authentic"));
        assert!(prompt.contains("EMAIL TYPE: Academic Research"));
        assert!(prompt.contains("RECIPIENT NAME: Prof. Lindqvist"));
        assert!(prompt.contains("SENDER CONTACT EMAIL: amara@mailbox.org"));
    }

    #[test]
    fn test_score_is_clamped() {
        assert_eq!(clamp_score(14.0), 10);
        assert_eq!(clamp_score(0.0), 1);
        assert_eq!(clamp_score(-3.0), 1);
        assert_eq!(clamp_score(7.6), 8);
        assert_eq!(clamp_score(f64::NAN), 1);
    }

    #[test]
    fn test_reply_without_full_email_is_assembled() {
        let reply: EmailReply = decode_json(
            r#"{"subject_line": "Ex Contoso ML Engineer interested in Fabrikam",
                "greeting": "Hi Hiring Manager,",
                "body": "I built ranking at Contoso.",
                "closing": "Best,\nAmara",
                "personalization_score": 12}"#,
        )
        .unwrap();
        let email = GeneratedEmail::from(reply);
        assert_eq!(
            email.full_email,
            "Hi Hiring Manager,\n\nI built ranking at Contoso.\n\nBest,\nAmara"
        );
        assert_eq!(email.personalization_score, 10);
    }

    #[test]
    fn test_reply_with_null_sections_still_assembles() {
        let reply: EmailReply = decode_json(
            r#"{"subject_line": "Ranking engineer for Fabrikam search",
                "greeting": "Dear Ms. Ito,",
                "introduction": null,
                "body": "I cut ranking latency at Contoso by 40%.",
                "full_email": null,
                "personalization_score": null}"#,
        )
        .unwrap();
        let email = GeneratedEmail::from(reply);
        assert_eq!(
            email.full_email,
            "Dear Ms. Ito,\n\nI cut ranking latency at Contoso by 40%."
        );
        assert_eq!(email.personalization_score, 1);
    }
}
