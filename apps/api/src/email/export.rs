//! JSON export of the current email draft.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::cv::models::CvExtraction;
use crate::email::models::EmailDraft;
use crate::jobs::models::JobData;

#[derive(Debug, Clone, Serialize)]
pub struct EmailExport {
    pub subject: String,
    pub content: String,
    pub generated_at: DateTime<Utc>,
    pub cv_data_used: CvExtraction,
    pub job_data_used: JobData,
    pub email_type: &'static str,
    pub tone: &'static str,
}

impl EmailExport {
    pub fn new(draft: &EmailDraft, cv: &CvExtraction, job: &JobData) -> Self {
        Self {
            subject: draft.email.subject_line.clone(),
            content: draft.email.full_email.clone(),
            generated_at: draft.generated_at,
            cv_data_used: cv.clone(),
            job_data_used: job.clone(),
            email_type: draft.email_type.label(),
            tone: draft.tone.label(),
        }
    }
}

/// `cold_email_{company}_{YYYYmmdd_HHMMSS}.json`, with the company made safe for file names.
pub fn email_export_file_name(company_name: &str, at: DateTime<Utc>) -> String {
    let company: String = company_name
        .trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let company = if company.is_empty() {
        "company".to_string()
    } else {
        company
    };
    format!("cold_email_{company}_{}.json", at.format("%Y%m%d_%H%M%S"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::email::models::{EmailType, GeneratedEmail, Tone};
    use chrono::TimeZone;

    #[test]
    fn test_file_name_format() {
        let at = Utc.with_ymd_and_hms(2026, 3, 9, 14, 5, 7).unwrap();
        assert_eq!(
            email_export_file_name("Fabrikam", at),
            "cold_email_Fabrikam_20260309_140507.json"
        );
        assert_eq!(
            email_export_file_name("Acme / Robotics", at),
            "cold_email_Acme___Robotics_20260309_140507.json"
        );
        assert_eq!(
            email_export_file_name("  ", at),
            "cold_email_company_20260309_140507.json"
        );
    }

    #[test]
    fn test_export_uses_labels() {
        let draft = EmailDraft {
            email: GeneratedEmail {
                subject_line: "Ex Contoso ML Engineer → Fabrikam".to_string(),
                full_email: "Hi,\n\nBest".to_string(),
                ..Default::default()
            },
            email_type: EmailType::Networking,
            tone: Tone::Friendly,
            recipient_name: None,
            recipient_email: None,
            generated_at: Utc::now(),
        };
        let export = EmailExport::new(&draft, &CvExtraction::default(), &JobData::default());
        let json = serde_json::to_value(&export).unwrap();
        assert_eq!(json["email_type"], "Networking");
        assert_eq!(json["tone"], "Friendly");
        assert_eq!(json["content"], "Hi,\n\nBest");
        assert!(json["cv_data_used"].is_object());
    }
}
