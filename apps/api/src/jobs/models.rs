use serde::{Deserialize, Serialize};

use crate::llm_client::null_as_default;

/// Structured job posting. Fields the posting does not state stay empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobData {
    #[serde(deserialize_with = "null_as_default")]
    pub job_title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub company_name: String,
    pub location: Option<String>,
    /// Full-time, part-time, contract, internship...
    pub job_type: Option<String>,
    pub experience_level: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub required_skills: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub preferred_skills: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub responsibilities: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub qualifications: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub benefits: Vec<String>,
    pub salary_range: Option<String>,
    pub industry: Option<String>,
    pub department: Option<String>,
    pub remote_policy: Option<String>,
    pub visa_sponsorship: Option<bool>,
    #[serde(deserialize_with = "null_as_default")]
    pub summary: String,
}

/// What the scraper pulled out of a job page before any LLM parsing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScrapedJob {
    pub job_title: String,
    pub company_name: String,
    pub job_description: String,
    pub source_url: String,
}

/// Values typed by the user that win over what was scraped and parsed.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct JobOverrides {
    pub job_title: Option<String>,
    pub company_name: Option<String>,
}

impl JobOverrides {
    pub fn apply(&self, job: &mut JobData) {
        if let Some(title) = non_blank(&self.job_title) {
            job.job_title = title.to_string();
        }
        if let Some(company) = non_blank(&self.company_name) {
            job.company_name = company.to_string();
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::decode_json;

    #[test]
    fn test_job_data_defaults_missing_fields() {
        let job: JobData = serde_json::from_str(
            r#"{"job_title": "Data Engineer", "company_name": "Fabrikam", "visa_sponsorship": false}"#,
        )
        .unwrap();
        assert_eq!(job.job_title, "Data Engineer");
        assert_eq!(job.visa_sponsorship, Some(false));
        assert!(job.location.is_none());
        assert!(job.required_skills.is_empty());
    }

    #[test]
    fn test_job_data_reads_null_as_empty() {
        let job: JobData = decode_json(
            r#"{"job_title": "SRE", "company_name": null, "benefits": null, "location": null}"#,
        )
        .unwrap();
        assert_eq!(job.job_title, "SRE");
        assert!(job.company_name.is_empty());
        assert!(job.benefits.is_empty());
        assert!(job.location.is_none());
    }

    #[test]
    fn test_overrides_replace_only_non_blank_values() {
        let mut job = JobData {
            job_title: "Engineer".to_string(),
            company_name: "Fabrikam".to_string(),
            ..Default::default()
        };
        JobOverrides {
            job_title: Some("  Staff Engineer ".to_string()),
            company_name: Some("   ".to_string()),
        }
        .apply(&mut job);
        assert_eq!(job.job_title, "Staff Engineer");
        assert_eq!(job.company_name, "Fabrikam");
    }
}
