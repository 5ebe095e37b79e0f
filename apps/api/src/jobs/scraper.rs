//! Job page scraper: pulls title, company and description out of arbitrary job-board HTML.
//!
//! Each field is found by a cascade of CSS selectors, most specific first, with
//! plain-text fallbacks when no selector matches. Nothing here calls the LLM.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

use crate::jobs::models::ScrapedJob;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
const FETCH_TIMEOUT: Duration = Duration::from_secs(15);

/// Descriptions shorter than this are treated as a failed scrape.
pub const MIN_DESCRIPTION_CHARS: usize = 50;

pub const TITLE_NOT_FOUND: &str = "Job Title Not Found";
pub const COMPANY_NOT_FOUND: &str = "Company Name Not Found";
pub const DESCRIPTION_NOT_FOUND: &str = "Job description not found";

const TITLE_SELECTORS: &[&str] = &[
    r#"h1[class*="job-title"]"#,
    r#"h1[class*="title"]"#,
    ".job-title",
    ".title",
    r#"[data-testid="job-title"]"#,
    "h1",
    "title",
];

const COMPANY_SELECTORS: &[&str] = &[
    r#"[class*="company"]"#,
    r#"[class*="employer"]"#,
    r#"[data-testid="company"]"#,
    ".company-name",
    ".employer-name",
    r#"a[href*="/company/"]"#,
    r#"a[href*="/employer/"]"#,
];

const DESCRIPTION_SELECTORS: &[&str] = &[
    r#"[class*="job-description"]"#,
    r#"[class*="description"]"#,
    r#"[class*="details"]"#,
    r#"[class*="content"]"#,
    r#"[class*="requirements"]"#,
    r#"[class*="responsibilities"]"#,
    ".job-description",
    ".job-details",
    ".description",
    ".content",
    r#"[data-testid="job-description"]"#,
    r#"[data-testid="description"]"#,
    "main",
    "article",
    r#"[role="main"]"#,
];

const JOB_KEYWORDS: &[&str] = &[
    "requirements",
    "responsibilities",
    "experience",
    "skills",
    "qualifications",
    "duties",
    "role",
    "position",
];

/// Page chrome whose text never counts toward a description.
const EXCLUDED_TAGS: &[&str] = &["script", "style", "nav", "header", "footer", "aside"];

const BLOCK_SELECTOR: &str = "div, section, article, main";
const MIN_SELECTED_DESCRIPTION_CHARS: usize = 200;
const MIN_BLOCK_DESCRIPTION_CHARS: usize = 300;

const JOB_SITES: &[&str] = &[
    "monster.com",
    "careerbuilder.com",
    "ziprecruiter.com",
    "dice.com",
    "angel.co",
    "stackoverflow.com",
    "github.com",
    "remote.co",
    "weworkremotely.com",
    "flexjobs.com",
];

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Invalid job posting URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to fetch URL: {0}")]
    Fetch(String),

    #[error("Could not extract sufficient job description from the page ({length} characters)")]
    InsufficientDescription { length: usize },
}

impl ScrapeError {
    pub fn hints(&self) -> &'static [&'static str] {
        match self {
            ScrapeError::InvalidUrl(_) => &[
                "Use a direct link to a single job posting",
                "Supported sites include LinkedIn, Indeed, Glassdoor, Monster and ZipRecruiter",
            ],
            ScrapeError::Fetch(_) => &[
                "The website may be blocking automated requests",
                "The job posting may have expired",
                "Check your network connection",
            ],
            ScrapeError::InsufficientDescription { .. } => &[
                "The page structure may have changed",
                "Paste the job description text instead",
            ],
        }
    }
}

/// Returns true for URLs on a known job board that look like a posting.
pub fn is_valid_job_url(url: &str) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };
    let Some(domain) = parsed.host_str().map(str::to_lowercase) else {
        return false;
    };
    let path = parsed.path().to_lowercase();
    let path_has = |fragments: &[&str]| fragments.iter().any(|f| path.contains(f));

    if domain.contains("linkedin.com") && path_has(&["/jobs/", "/jobs/view/", "/job/"]) {
        return true;
    }
    if domain.contains("indeed.com") && path_has(&["/viewjob", "/job/"]) {
        return true;
    }
    if domain.contains("glassdoor.com") && path_has(&["/job/"]) {
        return true;
    }
    JOB_SITES.iter().any(|site| domain.contains(site))
}

// ────────────────────────────────────────────────────────────────────────────
// Fetching
// ────────────────────────────────────────────────────────────────────────────

/// Source of job page HTML. The HTTP implementation is swapped for fixtures in tests.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, ScrapeError>;
}

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, ScrapeError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(|e| ScrapeError::Fetch(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, ScrapeError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ScrapeError::Fetch(e.to_string()))?
            .error_for_status()
            .map_err(|e| ScrapeError::Fetch(e.to_string()))?;

        response
            .text()
            .await
            .map_err(|e| ScrapeError::Fetch(e.to_string()))
    }
}

#[derive(Clone)]
pub struct JobScraper {
    fetcher: Arc<dyn PageFetcher>,
}

impl JobScraper {
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self { fetcher }
    }

    /// Scraper backed by a real HTTP client.
    pub fn http() -> Result<Self, ScrapeError> {
        Ok(Self::new(Arc::new(HttpFetcher::new()?)))
    }

    /// Validates the URL, fetches the page and extracts the posting.
    pub async fn scrape(&self, url: &str) -> Result<ScrapedJob, ScrapeError> {
        let url = url.trim();
        if !is_valid_job_url(url) {
            return Err(ScrapeError::InvalidUrl(url.to_string()));
        }

        info!("Fetching job posting: {url}");
        let html = self.fetcher.fetch(url).await?;
        debug!("Fetched {} bytes of HTML", html.len());

        let job = parse_job_page(&html, url)?;
        info!(
            "Scraped {:?} at {:?} ({} characters of description)",
            job.job_title,
            job.company_name,
            job.job_description.chars().count()
        );
        Ok(job)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Parsing
// ────────────────────────────────────────────────────────────────────────────

/// Extracts a posting from HTML. Fails when the description is too short to use.
pub fn parse_job_page(html: &str, url: &str) -> Result<ScrapedJob, ScrapeError> {
    let document = Html::parse_document(html);

    let job = ScrapedJob {
        job_title: extract_title(&document),
        company_name: extract_company(&document, url),
        job_description: extract_description(&document),
        source_url: url.to_string(),
    };

    let length = job.job_description.trim().chars().count();
    if length < MIN_DESCRIPTION_CHARS {
        return Err(ScrapeError::InsufficientDescription { length });
    }
    Ok(job)
}

fn selectors(list: &[&str]) -> Vec<Selector> {
    list.iter().filter_map(|s| Selector::parse(s).ok()).collect()
}

/// Stripped text nodes concatenated without separators.
fn compact_text(element: ElementRef<'_>) -> String {
    element.text().map(str::trim).collect()
}

/// True when the element, or one of its ancestors, is page chrome.
fn is_chrome(element: ElementRef<'_>) -> bool {
    EXCLUDED_TAGS.contains(&element.value().name())
        || element.ancestors().any(|node| {
            node.value()
                .as_element()
                .is_some_and(|e| EXCLUDED_TAGS.contains(&e.name()))
        })
}

/// Stripped, non-empty text nodes joined by newlines, skipping page chrome.
fn visible_text(element: ElementRef<'_>) -> String {
    element
        .descendants()
        .filter(|node| {
            !node.ancestors().any(|a| {
                a.value()
                    .as_element()
                    .is_some_and(|e| EXCLUDED_TAGS.contains(&e.name()))
            })
        })
        .filter_map(|node| node.value().as_text().map(|t| t.trim()))
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn extract_title(document: &Html) -> String {
    for selector in selectors(TITLE_SELECTORS) {
        if let Some(element) = document.select(&selector).next() {
            let title = compact_text(element);
            if title.chars().count() > 3 {
                return title;
            }
        }
    }

    // Page title with the job board's suffix removed
    static SUFFIX_RE: OnceLock<Regex> = OnceLock::new();
    let suffix_re = SUFFIX_RE.get_or_init(|| {
        Regex::new(r"\s*[-|]\s*(LinkedIn|Indeed|Glassdoor|Monster|CareerBuilder).*").unwrap()
    });
    let page_title = Selector::parse("title")
        .ok()
        .and_then(|s| document.select(&s).next().map(compact_text))
        .map(|t| suffix_re.replace(&t, "").trim().to_string())
        .filter(|t| !t.is_empty());

    page_title.unwrap_or_else(|| TITLE_NOT_FOUND.to_string())
}

fn extract_company(document: &Html, url: &str) -> String {
    for selector in selectors(COMPANY_SELECTORS) {
        if let Some(element) = document.select(&selector).next() {
            let company = compact_text(element);
            if company.chars().count() > 2 {
                return company;
            }
        }
    }

    company_from_linkedin_url(url).unwrap_or_else(|| COMPANY_NOT_FOUND.to_string())
}

/// First meaningful LinkedIn path segment, dashes as spaces, title-cased.
fn company_from_linkedin_url(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let domain = parsed.host_str()?.to_lowercase();
    if !domain.contains("linkedin.com") {
        return None;
    }
    parsed
        .path()
        .split('/')
        .find(|part| !part.is_empty() && !["jobs", "job", "company"].contains(part))
        .map(|part| title_case(&part.replace('-', " ")))
}

/// Uppercases the first letter of every alphabetic run and lowercases the rest.
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_is_letter = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if prev_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(c);
            prev_is_letter = false;
        }
    }
    out
}

fn looks_like_job_text(text: &str) -> bool {
    let lower = text.to_lowercase();
    JOB_KEYWORDS.iter().any(|keyword| lower.contains(keyword))
}

fn extract_description(document: &Html) -> String {
    for selector in selectors(DESCRIPTION_SELECTORS) {
        for element in document.select(&selector).filter(|e| !is_chrome(*e)) {
            let text = visible_text(element);
            if text.chars().count() > MIN_SELECTED_DESCRIPTION_CHARS && looks_like_job_text(&text) {
                return text;
            }
        }
    }

    let Some(body) = Selector::parse("body")
        .ok()
        .and_then(|s| document.select(&s).next())
    else {
        return DESCRIPTION_NOT_FOUND.to_string();
    };

    // Largest block of prose on the page
    if let Ok(blocks) = Selector::parse(BLOCK_SELECTOR) {
        let mut longest: Option<(usize, String)> = None;
        for element in body.select(&blocks).filter(|e| !is_chrome(*e)) {
            let text = visible_text(element);
            let length = text.chars().count();
            if length > MIN_BLOCK_DESCRIPTION_CHARS
                && longest.as_ref().map_or(true, |(best, _)| length > *best)
            {
                longest = Some((length, text));
            }
        }
        if let Some((_, text)) = longest {
            return normalize_whitespace(&text);
        }
    }

    let text = normalize_whitespace(&visible_text(body));
    if text.is_empty() {
        DESCRIPTION_NOT_FOUND.to_string()
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POSTING_URL: &str = "https://www.linkedin.com/jobs/view/123456";

    const REQUIREMENTS: &str = "We are hiring an engineer to build ranking services. \
        Responsibilities include owning the feature store, designing online experiments \
        and mentoring two junior engineers. Requirements: five years of experience with \
        Rust or C++, strong skills in distributed systems and a track record of shipping.";

    fn structured_page() -> String {
        format!(
            r#"<html><head><title>Senior Rust Engineer - Fabrikam | LinkedIn</title></head>
            <body>
              <nav class="description-nav">Jobs Home Network Messaging experience skills role</nav>
              <h1 class="top-card__job-title">Senior Rust Engineer</h1>
              <a class="topcard__org-name" href="/company/fabrikam">Fabrikam</a>
              <div class="show-more-less-html__markup job-description">
                <p>{REQUIREMENTS}</p>
                <script>var tracking = "should never appear";</script>
              </div>
            </body></html>"#
        )
    }

    struct FixtureFetcher(String);

    #[async_trait]
    impl PageFetcher for FixtureFetcher {
        async fn fetch(&self, _url: &str) -> Result<String, ScrapeError> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_valid_job_urls() {
        assert!(is_valid_job_url("https://www.linkedin.com/jobs/view/123456"));
        assert!(is_valid_job_url("https://uk.indeed.com/viewjob?jk=abc"));
        assert!(is_valid_job_url("https://www.glassdoor.com/Job/london-rust-jobs.htm"));
        assert!(is_valid_job_url("https://www.ziprecruiter.com/c/Fabrikam/Job/Engineer"));
        assert!(is_valid_job_url("https://weworkremotely.com/remote-jobs/fabrikam-sre"));
    }

    #[test]
    fn test_invalid_job_urls() {
        assert!(!is_valid_job_url("https://www.linkedin.com/in/amara-okafor"));
        assert!(!is_valid_job_url("https://indeed.com/companies"));
        assert!(!is_valid_job_url("https://example.org/careers/1"));
        assert!(!is_valid_job_url("not a url"));
        assert!(!is_valid_job_url(""));
    }

    #[test]
    fn test_structured_page_uses_specific_selectors() {
        let job = parse_job_page(&structured_page(), POSTING_URL).unwrap();
        assert_eq!(job.job_title, "Senior Rust Engineer");
        assert_eq!(job.company_name, "Fabrikam");
        assert!(job.job_description.contains("Responsibilities include"));
        assert!(!job.job_description.contains("tracking"));
        assert!(!job.job_description.contains("Messaging"));
        assert_eq!(job.source_url, POSTING_URL);
    }

    #[test]
    fn test_description_without_keywords_is_skipped() {
        let filler = "Lorem ipsum dolor sit amet, consectetur adipiscing elit. ".repeat(6);
        let html = format!(
            r#"<html><body><h1>Platform Engineer</h1>
            <div class="details">{filler}</div>
            <div class="content">{REQUIREMENTS}</div></body></html>"#
        );
        let job = parse_job_page(&html, "https://dice.com/job-detail/1").unwrap();
        assert!(job.job_description.starts_with("We are hiring"));
    }

    #[test]
    fn test_falls_back_to_longest_block() {
        let short = "Apply now to join the team.";
        let long = format!(
            "{REQUIREMENTS}\n\n   Benefits:   remote first, a generous learning budget and a four day week."
        );
        let html = format!(
            r#"<html><body><h1>SRE</h1><section><p>{short}</p></section>
            <section><p>{long}</p></section></body></html>"#
        );
        let job = parse_job_page(&html, "https://dice.com/job-detail/1").unwrap();
        // "SRE" is too short for the h1 selector and there is no <title>
        assert_eq!(job.job_title, TITLE_NOT_FOUND);
        assert!(job
            .job_description
            .ends_with("Benefits: remote first, a generous learning budget and a four day week."));
        assert!(!job.job_description.contains('\n'));
    }

    #[test]
    fn test_falls_back_to_body_text() {
        let html = "<html><body><p>Backend engineer wanted.</p>\
                    <p>Work on payments infrastructure with a small team in Lisbon.</p></body></html>";
        let job = parse_job_page(html, "https://remote.co/job/backend").unwrap();
        assert_eq!(
            job.job_description,
            "Backend engineer wanted. Work on payments infrastructure with a small team in Lisbon."
        );
    }

    #[test]
    fn test_short_description_is_rejected() {
        let html = "<html><body><h1>Engineer</h1><p>Apply today.</p></body></html>";
        let err = parse_job_page(html, "https://remote.co/job/1").unwrap_err();
        assert!(matches!(err, ScrapeError::InsufficientDescription { .. }));
    }

    #[test]
    fn test_title_cascade_reaches_title_tag() {
        let html = format!(
            "<html><head><title>Data Lead - Indeed.com</title></head>\
             <body><h1>Hi</h1><div>{REQUIREMENTS}</div></body></html>"
        );
        let document = Html::parse_document(&html);
        // The `title` selector itself matches first
        assert_eq!(extract_title(&document), "Data Lead - Indeed.com");
    }

    #[test]
    fn test_company_from_linkedin_path() {
        assert_eq!(
            company_from_linkedin_url("https://www.linkedin.com/company/acme-robotics/jobs/"),
            Some("Acme Robotics".to_string())
        );
        assert_eq!(company_from_linkedin_url("https://indeed.com/cmp/acme"), None);
        let html = format!("<html><body><div>{REQUIREMENTS}</div></body></html>");
        let job = parse_job_page(&html, "https://indeed.com/viewjob?jk=1").unwrap();
        assert_eq!(job.company_name, COMPANY_NOT_FOUND);
    }

    #[test]
    fn test_title_case_matches_word_boundaries() {
        assert_eq!(title_case("contoso ltd"), "Contoso Ltd");
        assert_eq!(title_case("o'NEIL 3d labs"), "O'Neil 3D Labs");
    }

    #[tokio::test]
    async fn test_scrape_uses_fetcher_after_validation() {
        let scraper = JobScraper::new(Arc::new(FixtureFetcher(structured_page())));
        let job = scraper.scrape(POSTING_URL).await.unwrap();
        assert_eq!(job.company_name, "Fabrikam");

        let err = scraper.scrape("https://example.org/jobs/1").await.unwrap_err();
        assert!(matches!(err, ScrapeError::InvalidUrl(_)));
    }
}
