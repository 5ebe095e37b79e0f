//! Email tracker: history of outreach used to flag duplicates and report statistics.

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::cv::models::CvExtraction;
use crate::email::models::{EmailDraft, EmailType};
use crate::jobs::models::JobData;

/// Outreach to the same title and company inside this window is flagged.
pub const DUPLICATE_WINDOW_DAYS: i64 = 30;
pub const RECENT_WINDOW_DAYS: i64 = 30;
/// Records shown by the history endpoint.
pub const HISTORY_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmailStatus {
    Sent,
    Delivered,
    Opened,
    Replied,
    Bounced,
}

impl EmailStatus {
    /// Delivered, opened and replied emails count toward the success rate.
    pub fn is_success(self) -> bool {
        matches!(
            self,
            EmailStatus::Delivered | EmailStatus::Opened | EmailStatus::Replied
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailRecord {
    pub id: Uuid,
    pub job_title: String,
    pub company_name: String,
    pub recipient_email: Option<String>,
    pub recipient_name: Option<String>,
    pub sent_date: DateTime<Utc>,
    pub email_type: EmailType,
    pub status: EmailStatus,
    pub cv_data_used: serde_json::Value,
    pub job_data_used: serde_json::Value,
    pub email_content: Option<String>,
    pub notes: Option<String>,
}

impl EmailRecord {
    /// Record for a draft the user has just sent from their own mail client.
    pub fn from_draft(
        draft: &EmailDraft,
        cv: &CvExtraction,
        job: &JobData,
        notes: Option<String>,
    ) -> Self {
        let notes = notes
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| format!("Generated with {} tone", draft.tone.label()));

        Self {
            id: Uuid::new_v4(),
            job_title: job.job_title.clone(),
            company_name: job.company_name.clone(),
            recipient_email: draft.recipient_email.clone(),
            recipient_name: draft.recipient_name.clone(),
            sent_date: Utc::now(),
            email_type: draft.email_type,
            status: EmailStatus::Sent,
            cv_data_used: serde_json::to_value(cv).unwrap_or_default(),
            job_data_used: serde_json::to_value(job).unwrap_or_default(),
            email_content: Some(draft.email.full_email.clone()),
            notes: Some(notes),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmailStatistics {
    pub total_emails: usize,
    pub companies_contacted: usize,
    pub recent_emails: usize,
    /// Percentage rounded to one decimal place.
    pub success_rate: f64,
}

#[derive(Debug, Default)]
pub struct EmailTracker {
    records: Vec<EmailRecord>,
}

impl EmailTracker {
    fn cutoff(days: i64) -> DateTime<Utc> {
        Utc::now() - Duration::days(days)
    }

    /// True when an email for this title and company (case-insensitive) was sent within `days`.
    pub fn check_duplicate(&self, job_title: &str, company_name: &str, days: i64) -> bool {
        let cutoff = Self::cutoff(days);
        let title = job_title.to_lowercase();
        let company = company_name.to_lowercase();
        self.records.iter().any(|r| {
            r.job_title.to_lowercase() == title
                && r.company_name.to_lowercase() == company
                && r.sent_date > cutoff
        })
    }

    pub fn add_record(&mut self, record: EmailRecord) {
        info!(
            "Tracked email {} for {:?} at {:?}",
            record.id, record.job_title, record.company_name
        );
        self.records.push(record);
    }

    /// Records sent within `days`, oldest first.
    pub fn get_recent(&self, days: i64) -> Vec<&EmailRecord> {
        let cutoff = Self::cutoff(days);
        self.records.iter().filter(|r| r.sent_date > cutoff).collect()
    }

    /// The last `limit` records of the recent window.
    pub fn recent_history(&self, limit: usize) -> Vec<EmailRecord> {
        let recent = self.get_recent(RECENT_WINDOW_DAYS);
        let skip = recent.len().saturating_sub(limit);
        recent.into_iter().skip(skip).cloned().collect()
    }

    pub fn update_status(&mut self, id: Uuid, status: EmailStatus) -> Option<&EmailRecord> {
        let record = self.records.iter_mut().find(|r| r.id == id)?;
        record.status = status;
        info!("Email {id} marked as {status:?}");
        Some(record)
    }

    pub fn statistics(&self) -> EmailStatistics {
        let total_emails = self.records.len();
        let companies_contacted = self
            .records
            .iter()
            .map(|r| r.company_name.as_str())
            .collect::<HashSet<_>>()
            .len();
        let successful = self.records.iter().filter(|r| r.status.is_success()).count();
        let success_rate = if total_emails == 0 {
            0.0
        } else {
            (successful as f64 / total_emails as f64 * 1000.0).round() / 10.0
        };

        EmailStatistics {
            total_emails,
            companies_contacted,
            recent_emails: self.get_recent(RECENT_WINDOW_DAYS).len(),
            success_rate,
        }
    }
}
