//! Social links, built from usernames the user types in, or mined from raw CV text.

use std::sync::OnceLock;

use regex::Regex;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use url::Url;

/// Label → URL pairs in insertion order. Serializes as a JSON object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SocialLinks {
    entries: Vec<(String, String)>,
}

impl SocialLinks {
    /// Inserts a link, replacing the URL if the label already exists.
    pub fn insert(&mut self, label: impl Into<String>, url: impl Into<String>) {
        let label = label.into();
        let url = url.into();
        match self.entries.iter_mut().find(|(l, _)| *l == label) {
            Some(entry) => entry.1 = url,
            None => self.entries.push((label, url)),
        }
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, u)| u.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(l, u)| (l.as_str(), u.as_str()))
    }

    /// Adds links from `other` whose URL is not already present.
    pub fn merge_missing(&mut self, other: &SocialLinks) {
        for (label, url) in other.iter() {
            if self.entries.iter().all(|(_, u)| u != url) {
                let label = self.unique_label(label);
                self.entries.push((label, url.to_string()));
            }
        }
    }

    fn unique_label(&self, base: &str) -> String {
        if self.get(base).is_none() {
            return base.to_string();
        }
        (2..)
            .map(|n| format!("{base} {n}"))
            .find(|candidate| self.get(candidate).is_none())
            .unwrap_or_else(|| base.to_string())
    }

    /// Builds profile URLs from platform usernames and repository names.
    pub fn from_usernames(input: &LinkUsernames) -> Self {
        let mut links = SocialLinks::default();

        if let Some(u) = non_empty(&input.linkedin) {
            links.insert("LinkedIn", format!("https://linkedin.com/in/{u}"));
        }
        if let Some(u) = non_empty(&input.twitter) {
            links.insert("Twitter", format!("https://twitter.com/{u}"));
        }
        let github = non_empty(&input.github);
        if let Some(u) = github {
            links.insert("GitHub", format!("https://github.com/{u}"));
        }
        if let Some(u) = non_empty(&input.medium) {
            let handle = u.trim_start_matches('@');
            if !handle.is_empty() {
                links.insert("Medium", format!("https://medium.com/@{handle}"));
            }
        }
        if let Some(url) = non_empty(&input.portfolio) {
            links.insert("Portfolio", url);
        }

        // Repositories only make sense under a GitHub account
        if let Some(user) = github {
            let repos = input
                .repositories
                .iter()
                .flat_map(|entry| entry.lines())
                .filter_map(|line| line.trim().split('/').rev().find(|s| !s.is_empty()));
            for (i, repo) in repos.enumerate() {
                links.insert(
                    format!("GitHub Repo {}", i + 1),
                    format!("https://github.com/{user}/{repo}"),
                );
            }
        }

        links
    }
}

impl Serialize for SocialLinks {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (label, url) in &self.entries {
            map.serialize_entry(label, url)?;
        }
        map.end()
    }
}

/// Usernames entered in step 1 of the wizard.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LinkUsernames {
    pub linkedin: Option<String>,
    pub twitter: Option<String>,
    pub github: Option<String>,
    /// With or without a leading `@`.
    pub medium: Option<String>,
    /// Full URL of a personal site.
    pub portfolio: Option<String>,
    /// Repository names; entries may hold several newline-separated names.
    pub repositories: Vec<String>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn url_regex() -> &'static Regex {
    static URL_RE: OnceLock<Regex> = OnceLock::new();
    URL_RE.get_or_init(|| Regex::new(r#"https?://[^\s<>()"']+"#).unwrap())
}

const LABEL_SEPARATORS: &[char] = &[':', '-', '=', '|'];
const MAX_LABEL_CHARS: usize = 30;

/// Finds URLs in free text and labels them.
///
/// A URL directly preceded by `Label:`, `Label -`, `Label=` or `Label |` on the same
/// line takes that label; otherwise the label comes from the URL's host.
pub fn extract_links_from_text(text: &str) -> SocialLinks {
    let mut links = SocialLinks::default();

    for line in text.lines() {
        let mut label_start = 0;
        for m in url_regex().find_iter(line) {
            let url = m
                .as_str()
                .trim_end_matches(['.', ',', ';', ':', ')', ']', '!', '?']);
            let label = keyword_before(&line[label_start..m.start()])
                .unwrap_or_else(|| platform_label(url).to_string());
            let label = links.unique_label(&label);
            links.insert(label, url);
            label_start = m.end();
        }
    }

    links
}

/// Returns the label written before a URL, when a separator marks it as one.
fn keyword_before(context: &str) -> Option<String> {
    let trimmed = context.trim_end();
    let last = trimmed.chars().last()?;
    if !LABEL_SEPARATORS.contains(&last) {
        return None;
    }
    let label = trimmed
        .trim_end_matches(LABEL_SEPARATORS)
        .trim()
        .trim_start_matches(['•', '*', '·'])
        .trim();
    if label.is_empty() || label.chars().count() > MAX_LABEL_CHARS {
        return None;
    }
    Some(label.to_string())
}

/// Names well-known platforms from a URL's host.
fn platform_label(url: &str) -> &'static str {
    let host = Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.trim_start_matches("www.").to_lowercase()))
        .unwrap_or_default();

    let is = |domain: &str| host == domain || host.ends_with(&format!(".{domain}"));

    if is("github.com") {
        "GitHub"
    } else if is("linkedin.com") {
        "LinkedIn"
    } else if is("twitter.com") || is("x.com") {
        "Twitter"
    } else if is("medium.com") {
        "Medium"
    } else if is("gitlab.com") {
        "GitLab"
    } else if is("stackoverflow.com") {
        "Stack Overflow"
    } else if is("dev.to") {
        "Dev.to"
    } else {
        "Website"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usernames() -> LinkUsernames {
        LinkUsernames {
            linkedin: Some(" amara-okafor ".to_string()),
            twitter: Some("amaracodes".to_string()),
            github: Some("amarao".to_string()),
            medium: Some("@amara".to_string()),
            portfolio: Some("https://amara.dev ".to_string()),
            repositories: vec![
                "ranker\nhttps://github.com/amarao/tiny-db".to_string(),
                "  ".to_string(),
            ],
        }
    }

    #[test]
    fn test_from_usernames_builds_profile_urls() {
        let links = SocialLinks::from_usernames(&usernames());
        assert_eq!(links.get("LinkedIn"), Some("https://linkedin.com/in/amara-okafor"));
        assert_eq!(links.get("Twitter"), Some("https://twitter.com/amaracodes"));
        assert_eq!(links.get("GitHub"), Some("https://github.com/amarao"));
        assert_eq!(links.get("Medium"), Some("https://medium.com/@amara"));
        assert_eq!(links.get("Portfolio"), Some("https://amara.dev"));
    }

    #[test]
    fn test_repositories_use_last_path_segment() {
        let links = SocialLinks::from_usernames(&usernames());
        assert_eq!(links.get("GitHub Repo 1"), Some("https://github.com/amarao/ranker"));
        assert_eq!(links.get("GitHub Repo 2"), Some("https://github.com/amarao/tiny-db"));
        assert_eq!(links.get("GitHub Repo 3"), None);
        assert_eq!(links.len(), 7);
    }

    #[test]
    fn test_repositories_ignored_without_github_user() {
        let input = LinkUsernames {
            github: Some("   ".to_string()),
            ..usernames()
        };
        let links = SocialLinks::from_usernames(&input);
        assert!(links.get("GitHub").is_none());
        assert!(links.iter().all(|(label, _)| !label.starts_with("GitHub Repo")));
    }

    #[test]
    fn test_serializes_in_insertion_order() {
        let links = SocialLinks::from_usernames(&usernames());
        let json = serde_json::to_string(&links).unwrap();
        let linkedin = json.find("LinkedIn").unwrap();
        let portfolio = json.find("Portfolio").unwrap();
        assert!(linkedin < portfolio);
    }

    #[test]
    fn test_extract_links_with_labels() {
        let text = "GitHub: https://github.com/johnsmith\n\
                    LinkedIn - https://linkedin.com/in/johnsmith\n\
                    Portfolio=https://johnsmith.dev\n\
                    Blog | https://johnsmith.medium.com";
        let links = extract_links_from_text(text);
        assert_eq!(links.get("GitHub"), Some("https://github.com/johnsmith"));
        assert_eq!(links.get("LinkedIn"), Some("https://linkedin.com/in/johnsmith"));
        assert_eq!(links.get("Portfolio"), Some("https://johnsmith.dev"));
        assert_eq!(links.get("Blog"), Some("https://johnsmith.medium.com"));
    }

    #[test]
    fn test_extract_links_without_label_uses_host() {
        let links = extract_links_from_text(
            "No label https://github.com/johnsmith and https://dev.to/johnsmith/post.",
        );
        assert_eq!(links.get("GitHub"), Some("https://github.com/johnsmith"));
        assert_eq!(links.get("Dev.to"), Some("https://dev.to/johnsmith/post"));
    }

    #[test]
    fn test_extract_links_dedups_labels() {
        let links = extract_links_from_text(
            "https://github.com/johnsmith\nProject: https://github.com/johnsmith/project\nhttps://github.com/johnsmith/other",
        );
        assert_eq!(links.get("GitHub"), Some("https://github.com/johnsmith"));
        assert_eq!(links.get("Project"), Some("https://github.com/johnsmith/project"));
        assert_eq!(links.get("GitHub 2"), Some("https://github.com/johnsmith/other"));
    }

    #[test]
    fn test_unknown_host_is_website() {
        let links = extract_links_from_text("see https://example.org/about");
        assert_eq!(links.get("Website"), Some("https://example.org/about"));
    }

    #[test]
    fn test_merge_missing_skips_known_urls() {
        let mut typed = SocialLinks::from_usernames(&usernames());
        let mined =
            extract_links_from_text("https://github.com/amarao\nTalk: https://youtu.be/xyz");
        typed.merge_missing(&mined);
        assert_eq!(typed.get("Talk"), Some("https://youtu.be/xyz"));
        assert_eq!(typed.iter().filter(|(_, u)| *u == "https://github.com/amarao").count(), 1);
    }
}
