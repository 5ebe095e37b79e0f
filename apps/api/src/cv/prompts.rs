// CV extraction LLM prompt templates.

use crate::llm_client::prompts::FAITHFUL_EXTRACTION;

pub const CV_EXTRACT_ROLE: &str = "\
You are a specialized CV/resume parser. You read the text of one CV and return \
only what it actually says. Pay special attention to volunteer work, community \
service, awards, honors, scholarships, publications, research papers and \
presentations, which are often listed under their own headings.";

/// CV extraction prompt. Replace `{cv_text}` and `{faithful}` before sending.
pub const CV_EXTRACT_PROMPT_TEMPLATE: &str = r#"Extract structured information from the CV text below.

CV TEXT:
{cv_text}

{faithful}

OUTPUT SCHEMA (return exactly this JSON structure):
{
  "name": "full name or empty string",
  "email": "email address or empty string",
  "phone": "phone number" | null,
  "education": ["degree, institution, years, GPA if mentioned"],
  "experience": ["job title at company, years"],
  "volunteer": ["volunteer role or community service, years"],
  "skills": ["skill"],
  "projects": ["project and achievement, years"],
  "awards": ["award, honor, scholarship, certificate, years"],
  "publications": ["paper, article, talk or book, venue, years"],
  "summary": "the CV's own summary or objective, or empty string"
}

RULES:
1. ALWAYS keep years and dates inside each entry when the CV gives them.
2. One list item per degree, position, project, award or publication.
3. Leave a list empty when the CV has no such section.
4. Return ONLY the JSON object."#;

pub fn build_cv_extract_prompt(cv_text: &str) -> String {
    CV_EXTRACT_PROMPT_TEMPLATE
        .replace("{faithful}", FAITHFUL_EXTRACTION)
        .replace("{cv_text}", cv_text)
}
