//! Year extraction and latest-first ordering for time-based CV entries.

use std::sync::OnceLock;

use regex::Regex;

fn year_regex() -> &'static Regex {
    static YEAR_RE: OnceLock<Regex> = OnceLock::new();
    YEAR_RE.get_or_init(|| Regex::new(r"\b(?:19|20)\d{2}\b").unwrap())
}

/// Returns the most recent 4-digit year (1900–2099) mentioned in `text`, or 0 when none.
///
/// `"Software Developer at Tech Corp, 2022-2024"` → 2024.
pub fn extract_year(text: &str) -> u32 {
    year_regex()
        .find_iter(text)
        .filter_map(|m| m.as_str().parse::<u32>().ok())
        .max()
        .unwrap_or(0)
}

/// Sorts entries latest-first by `extract_year`.
/// The sort is stable: entries with equal years (including undated ones) keep their order.
pub fn sort_latest_first(items: &mut [String]) {
    items.sort_by_key(|item| std::cmp::Reverse(extract_year(item)));
}
