//! Page-data extraction contract.
//!
//! The extraction collaborator lives on the page side (a content script or any
//! other scraper). The core only sees the raw payload it returns and decides
//! whether that payload is usable.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::identity::{problem_slug, title_from_slug};
use super::model::{Difficulty, ProblemInfo, bound_description};

/// Titles the page side emits when it could not read the real one.
pub const PLACEHOLDER_TITLES: &[&str] = &["Error", "Unknown Problem"];

const LAST_RESORT_TITLE: &str = "Current Problem";

static LEADING_ORDINAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.\s*").expect("valid regex"));
static ENV_TYPE_TAIL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)EnvType.*$").expect("valid regex"));
static SCRIPT_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<script.*?</script>").expect("valid regex"));

/// Raw result of one extraction attempt, as produced by the page side.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionPayload {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub difficulty: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub url: String,
    #[serde(default, rename = "timestamp", skip_serializing_if = "Option::is_none")]
    pub captured_at: Option<DateTime<Utc>>,
    /// Set by the page side when its own scraping threw.
    #[serde(default)]
    pub error: bool,
}

impl ExtractionPayload {
    /// Returns `true` when the payload must be treated as a failed attempt.
    pub fn is_failure(&self) -> bool {
        self.error || PLACEHOLDER_TITLES.contains(&self.title.trim())
    }

    /// Converts a usable payload into a [`ProblemInfo`].
    ///
    /// `fallback_address` is used when the payload carries no address of its own.
    pub fn into_problem_info(self, fallback_address: &str) -> ProblemInfo {
        let source_address = if self.url.trim().is_empty() {
            fallback_address.to_string()
        } else {
            self.url.trim().to_string()
        };

        let mut title = clean_title(&self.title);
        if title.is_empty() {
            title = problem_slug(&source_address)
                .map(title_from_slug)
                .filter(|slug_title| !slug_title.is_empty())
                .unwrap_or_else(|| LAST_RESORT_TITLE.to_string());
        }

        ProblemInfo {
            title,
            difficulty: Difficulty::from_badge(&self.difficulty),
            description: clean_description(&self.description),
            source_address,
            captured_at: self.captured_at.unwrap_or_else(Utc::now),
        }
    }
}

/// Cleans a scraped title: drops the `"1. "` ordinal and any query or
/// environment-marker text that leaked into it.
pub fn clean_title(raw: &str) -> String {
    let title = raw.trim();
    let title = LEADING_ORDINAL.replace(title, "");
    let title = title.split('?').next().unwrap_or_default();
    let title = ENV_TYPE_TAIL.replace(title, "");
    title.trim().to_string()
}

/// Strips script blocks and bounds the description length.
pub fn clean_description(raw: &str) -> String {
    let without_scripts = SCRIPT_BLOCK.replace_all(raw, "");
    bound_description(without_scripts.trim())
}

/// Failure of the extraction collaborator itself, as opposed to an attempt
/// that returned nothing usable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// The host has no active page.
    NoActivePage,
    /// The page side did not answer (not injected yet, navigating, ...).
    Unreachable(String),
}

impl std::fmt::Display for ExtractionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractionError::NoActivePage => write!(f, "No active page"),
            ExtractionError::Unreachable(reason) => write!(f, "Page unreachable: {}", reason),
        }
    }
}

impl std::error::Error for ExtractionError {}

/// Page-data extraction collaborator.
#[async_trait]
pub trait ProblemExtractor: Send + Sync {
    /// Address of the page currently shown to the user.
    async fn active_address(&self) -> Result<String, ExtractionError>;

    /// Runs one extraction attempt.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(payload))`: the page answered (the payload may still be a failure marker)
    /// - `Ok(None)`: the page answered with nothing
    /// - `Err(_)`: the page could not be asked at all
    async fn try_extract(&self) -> Result<Option<ExtractionPayload>, ExtractionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_title() {
        assert_eq!(clean_title("1. Two Sum"), "Two Sum");
        assert_eq!(clean_title("  42. Trapping Rain Water  "), "Trapping Rain Water");
        assert_eq!(clean_title("Two Sum?envType=daily"), "Two Sum");
        assert_eq!(clean_title("Two SumEnvType=study"), "Two Sum");
        assert_eq!(clean_title(""), "");
    }

    #[test]
    fn test_placeholder_titles_are_failures() {
        let payload = ExtractionPayload {
            title: "Unknown Problem".into(),
            ..Default::default()
        };
        assert!(payload.is_failure());

        let flagged = ExtractionPayload {
            title: "Two Sum".into(),
            error: true,
            ..Default::default()
        };
        assert!(flagged.is_failure());

        let good = ExtractionPayload {
            title: "Two Sum".into(),
            ..Default::default()
        };
        assert!(!good.is_failure());
    }

    #[test]
    fn test_into_problem_info_sanitizes() {
        let payload = ExtractionPayload {
            title: "1. Two Sum".into(),
            difficulty: "Easy".into(),
            description: format!("<p>Find</p><script>alert(1)</script>{}", "x".repeat(2000)),
            url: "https://leetcode.com/problems/two-sum/description/".into(),
            captured_at: None,
            error: false,
        };

        let info = payload.into_problem_info("https://ignored");
        assert_eq!(info.title, "Two Sum");
        assert_eq!(info.difficulty, Difficulty::Easy);
        assert!(!info.description.contains("<script>"));
        assert!(info.description.ends_with("..."));
        assert_eq!(info.description.chars().count(), 1003);
        assert_eq!(info.source_address, "https://leetcode.com/problems/two-sum/description/");
    }

    #[test]
    fn test_into_problem_info_empty_title_uses_slug() {
        let payload = ExtractionPayload {
            title: "   ".into(),
            ..Default::default()
        };
        let info = payload.into_problem_info("https://leetcode.com/problems/valid-anagram/");
        assert_eq!(info.title, "Valid Anagram");
        assert_eq!(info.source_address, "https://leetcode.com/problems/valid-anagram/");
    }

    #[test]
    fn test_payload_deserializes_page_json() {
        let json = r#"{
            "title": "Two Sum",
            "difficulty": "Easy",
            "description": "Given an array...",
            "url": "https://leetcode.com/problems/two-sum/",
            "timestamp": "2024-05-01T10:00:00.000Z"
        }"#;
        let payload: ExtractionPayload = serde_json::from_str(json).unwrap();
        assert!(!payload.error);
        assert!(payload.captured_at.is_some());
    }
}
