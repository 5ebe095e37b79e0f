use serde::{Deserialize, Serialize};

use crate::cv::links::SocialLinks;
use crate::cv::years::sort_latest_first;
use crate::llm_client::null_as_default;

/// Markers that indicate the model produced sample data instead of reading the CV.
const PLACEHOLDER_MARKERS: &[&str] = &[
    "john doe",
    "jane doe",
    "sample",
    "example",
    "placeholder",
    "test",
    "demo",
    "lorem ipsum",
    "your name",
    "your email",
];

/// Structured data extracted from a CV. Every field defaults to empty
/// because the model is told to leave absent sections blank.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CvExtraction {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub email: String,
    pub phone: Option<String>,
    /// Degrees and institutions, with years and GPA when present.
    #[serde(deserialize_with = "null_as_default")]
    pub education: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub experience: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub volunteer: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub skills: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub projects: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub awards: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub publications: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub summary: String,
}

/// Outcome of the placeholder check.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractionValidation {
    pub passed: bool,
    pub message: String,
}

impl ExtractionValidation {
    fn fail(message: String) -> Self {
        Self {
            passed: false,
            message,
        }
    }
}

impl CvExtraction {
    /// Orders every time-based section latest-first. Skills keep their order.
    pub fn sort_by_year(&mut self) -> &mut Self {
        for section in [
            &mut self.education,
            &mut self.experience,
            &mut self.volunteer,
            &mut self.projects,
            &mut self.awards,
            &mut self.publications,
        ] {
            sort_latest_first(section);
        }
        self
    }

    /// Rejects extractions that look invented or empty.
    pub fn validate(&self) -> ExtractionValidation {
        let name = self.name.trim().to_lowercase();
        if PLACEHOLDER_MARKERS.contains(&name.as_str()) {
            return ExtractionValidation::fail(format!(
                "Name appears to be placeholder: {}",
                self.name
            ));
        }

        let email = self.email.trim().to_lowercase();
        if PLACEHOLDER_MARKERS.contains(&email.as_str()) || email.contains("@example.com") {
            return ExtractionValidation::fail(format!(
                "Email appears to be placeholder: {}",
                self.email
            ));
        }

        let has_content = !self.name.trim().is_empty()
            || !self.email.trim().is_empty()
            || [
                &self.education,
                &self.experience,
                &self.volunteer,
                &self.skills,
                &self.awards,
                &self.publications,
            ]
            .iter()
            .any(|section| !section.is_empty());

        if !has_content {
            return ExtractionValidation::fail(
                "No meaningful data was extracted from the CV".to_string(),
            );
        }

        ExtractionValidation {
            passed: true,
            message: "Extraction appears to contain real data".to_string(),
        }
    }
}

/// CV data combined with the user's links, as offered for download after step 2.
#[derive(Debug, Clone, Serialize)]
pub struct CvExport {
    #[serde(flatten)]
    pub cv: CvExtraction,
    #[serde(skip_serializing_if = "SocialLinks::is_empty")]
    pub manual_links: SocialLinks,
}

pub const CV_EXPORT_FILE_NAME: &str = "cv_extracted_data.json";
