//! In-memory wizard state a user builds up across the steps.

use serde::Serialize;

use crate::cv::links::SocialLinks;
use crate::cv::models::CvExtraction;
use crate::email::models::EmailDraft;
use crate::jobs::models::JobData;

/// Where the user is in the links → CV → job → email → send flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    Links,
    Cv,
    Job,
    Email,
    Send,
}

#[derive(Debug, Clone, Default)]
pub struct WizardSession {
    /// Set once step 1 is submitted, even with no links.
    pub links_confirmed: bool,
    pub links: SocialLinks,
    /// Text of the last uploaded PDF, kept so extraction can run without re-uploading.
    pub cv_text: Option<String>,
    pub cv: Option<CvExtraction>,
    pub job: Option<JobData>,
    pub email: Option<EmailDraft>,
}

impl WizardSession {
    pub fn next_step(&self) -> WizardStep {
        if self.cv.is_none() {
            if self.links_confirmed || self.cv_text.is_some() {
                WizardStep::Cv
            } else {
                WizardStep::Links
            }
        } else if self.job.is_none() {
            WizardStep::Job
        } else if self.email.is_none() {
            WizardStep::Email
        } else {
            WizardStep::Send
        }
    }

    /// A new CV invalidates any draft written from the old one.
    pub fn set_cv(&mut self, cv: CvExtraction) {
        self.cv = Some(cv);
        self.email = None;
    }

    /// A new job invalidates any draft written for the old one.
    pub fn set_job(&mut self, job: JobData) {
        self.job = Some(job);
        self.email = None;
    }

    pub fn clear(&mut self) {
        *self = WizardSession::default();
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            next_step: self.next_step(),
            links_collected: self.links.len(),
            has_cv_text: self.cv_text.is_some(),
            cv_name: self.cv.as_ref().map(|cv| cv.name.clone()),
            job_title: self.job.as_ref().map(|job| job.job_title.clone()),
            company_name: self.job.as_ref().map(|job| job.company_name.clone()),
            has_email_draft: self.email.is_some(),
            ready_for_email: self.cv.is_some() && self.job.is_some(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub next_step: WizardStep,
    pub links_collected: usize,
    pub has_cv_text: bool,
    pub cv_name: Option<String>,
    pub job_title: Option<String>,
    pub company_name: Option<String>,
    pub has_email_draft: bool,
    pub ready_for_email: bool,
}
