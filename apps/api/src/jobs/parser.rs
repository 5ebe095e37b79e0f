//! Job parser. Builds structured `JobData` from a description or a scraped posting.

use tracing::info;

use crate::errors::AppError;
use crate::jobs::models::{JobData, JobOverrides, ScrapedJob};
use crate::jobs::prompts::{build_job_parse_prompt, JOB_PARSE_ROLE};
use crate::jobs::scraper::JobScraper;
use crate::llm_client::prompts::system_prompt;
use crate::llm_client::LlmClient;

pub async fn parse_job_description(
    job_description: &str,
    llm: &LlmClient,
) -> Result<JobData, AppError> {
    if job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "job_description cannot be empty".to_string(),
        ));
    }

    let prompt = build_job_parse_prompt(job_description);
    let job: JobData = llm
        .call_json(&prompt, &system_prompt(JOB_PARSE_ROLE))
        .await
        .map_err(AppError::llm("Job parsing"))?;

    info!(
        "Parsed job: {:?} at {:?} ({} required skills)",
        job.job_title,
        job.company_name,
        job.required_skills.len()
    );
    Ok(job)
}

/// Scrapes a posting, parses its description, then applies the user's overrides.
pub async fn scrape_and_parse_job(
    url: &str,
    scraper: &JobScraper,
    llm: &LlmClient,
    overrides: &JobOverrides,
) -> Result<(ScrapedJob, JobData), AppError> {
    let scraped = scraper.scrape(url).await?;
    let mut job = parse_job_description(&scraped.job_description, llm).await?;
    overrides.apply(&mut job);
    Ok((scraped, job))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::scraper::ScrapeError;
    use crate::llm_client::decode_json;

    fn unreachable_llm() -> LlmClient {
        LlmClient::new(
            "key".to_string(),
            "http://127.0.0.1:9/v1/chat/completions".to_string(),
            "llama-3.3-70b-versatile".to_string(),
            0.1,
        )
        .unwrap()
    }

    #[test]
    fn test_prompt_embeds_description() {
        let prompt = build_job_parse_prompt("Senior Rust Engineer at Fabrikam");
        assert!(prompt.contains("Senior Rust Engineer at Fabrikam"));
        assert!(prompt.contains("\"visa_sponsorship\""));
        assert!(!prompt.contains("{faithful}"));
    }

    #[test]
    fn test_model_reply_with_nulls_decodes() {
        let job: JobData = decode_json(
            r#"{"job_title": "SRE", "company_name": "Fabrikam", "location": null,
                "required_skills": ["Kubernetes"], "salary_range": null, "summary": "Keep it up."}"#,
        )
        .unwrap();
        assert_eq!(job.required_skills, vec!["Kubernetes"]);
        assert!(job.benefits.is_empty());
    }

    #[tokio::test]
    async fn test_blank_description_is_rejected_before_llm() {
        let err = parse_job_description("  \n ", &unreachable_llm())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_invalid_url_fails_before_fetch() {
        let scraper = JobScraper::http().unwrap();
        let err = scrape_and_parse_job(
            "https://example.org/careers/1",
            &scraper,
            &unreachable_llm(),
            &JobOverrides::default(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Scrape(ScrapeError::InvalidUrl(_))));
    }
}
