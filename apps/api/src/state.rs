use std::sync::Arc;

use tokio::sync::RwLock;

use crate::config::Config;
use crate::email::tracker::EmailTracker;
use crate::jobs::scraper::JobScraper;
use crate::llm_client::LlmClient;
use crate::session::WizardSession;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Locks are taken only to read or write state, never across an LLM or page-fetch await.
#[derive(Clone)]
pub struct AppState {
    pub llm: LlmClient,
    pub scraper: JobScraper,
    pub config: Config,
    pub session: Arc<RwLock<WizardSession>>,
    /// Outreach history. Survives `DELETE /api/v1/session`.
    pub tracker: Arc<RwLock<EmailTracker>>,
}

impl AppState {
    pub fn new(llm: LlmClient, scraper: JobScraper, config: Config) -> Self {
        Self {
            llm,
            scraper,
            config,
            session: Arc::new(RwLock::new(WizardSession::default())),
            tracker: Arc::new(RwLock::new(EmailTracker::default())),
        }
    }
}
