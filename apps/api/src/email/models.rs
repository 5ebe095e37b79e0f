use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of position the email targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmailType {
    #[default]
    Industry,
    Academic,
    Freelance,
    Networking,
}

impl EmailType {
    pub fn label(self) -> &'static str {
        match self {
            EmailType::Industry => "Industry Position",
            EmailType::Academic => "Academic Research",
            EmailType::Freelance => "Freelance/Consulting",
            EmailType::Networking => "Networking",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    #[default]
    Professional,
    Friendly,
    Confident,
    Enthusiastic,
    /// Gritty and humble, founder-to-founder. Suits startups.
    Authentic,
    Conversational,
}

impl Tone {
    pub fn label(self) -> &'static str {
        match self {
            Tone::Professional => "Professional",
            Tone::Friendly => "Friendly",
            Tone::Confident => "Confident",
            Tone::Enthusiastic => "Enthusiastic",
            Tone::Authentic => "Authentic",
            Tone::Conversational => "Conversational",
        }
    }
}

/// A generated cold email, section by section plus the assembled text.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GeneratedEmail {
    pub subject_line: String,
    pub greeting: String,
    pub introduction: String,
    pub body: String,
    pub call_to_action: String,
    pub closing: String,
    pub full_email: String,
    /// 1 (generic) to 10 (written for this job alone).
    pub personalization_score: u8,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GenerateEmailRequest {
    pub email_type: EmailType,
    pub tone: Tone,
    pub recipient_name: Option<String>,
    pub recipient_email: Option<String>,
}

/// The current email together with the settings it was generated with.
#[derive(Debug, Clone, Serialize)]
pub struct EmailDraft {
    pub email: GeneratedEmail,
    pub email_type: EmailType,
    pub tone: Tone,
    pub recipient_name: Option<String>,
    pub recipient_email: Option<String>,
    pub generated_at: DateTime<Utc>,
}
