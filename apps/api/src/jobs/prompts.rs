// Job description parsing prompt templates.

use crate::llm_client::prompts::FAITHFUL_EXTRACTION;

pub const JOB_PARSE_ROLE: &str = "\
You are a specialized job description parser. You read one job posting and \
return its details exactly as stated. Keep required skills apart from \
preferred or nice-to-have skills.";

/// Job parsing prompt. Replace `{job_description}` and `{faithful}` before sending.
pub const JOB_PARSE_PROMPT_TEMPLATE: &str = r#"Extract structured information from the job description below.

JOB DESCRIPTION:
{job_description}

{faithful}

OUTPUT SCHEMA (return exactly this JSON structure):
{
  "job_title": "exact position name",
  "company_name": "hiring company or organization",
  "location": "city, state, country or remote" | null,
  "job_type": "Full-time | Part-time | Contract | Internship | ..." | null,
  "experience_level": "Entry | Mid | Senior | Lead | ..." | null,
  "required_skills": ["skill marked as required"],
  "preferred_skills": ["skill marked as preferred or nice-to-have"],
  "responsibilities": ["key duty"],
  "qualifications": ["education, experience or certification requirement"],
  "benefits": ["perk, compensation or work arrangement"],
  "salary_range": "as written" | null,
  "industry": "sector" | null,
  "department": "team or department" | null,
  "remote_policy": "Remote | Hybrid | On-site" | null,
  "visa_sponsorship": true | false | null,
  "summary": "two or three sentences on the role and company"
}

Return ONLY the JSON object."#;

pub fn build_job_parse_prompt(job_description: &str) -> String {
    JOB_PARSE_PROMPT_TEMPLATE
        .replace("{faithful}", FAITHFUL_EXTRACTION)
        .replace("{job_description}", job_description)
}
