//! Problem domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::identity::{ProblemIdentity, problem_slug, title_from_slug};

/// Maximum stored description length, in characters.
pub const MAX_DESCRIPTION_CHARS: usize = 1000;

/// Difficulty badge shown on the problem page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    #[default]
    Unknown,
}

impl Difficulty {
    /// Parses badge text leniently: any text containing easy/medium/hard
    /// (case-insensitive) maps to that level, everything else is `Unknown`.
    pub fn from_badge(text: &str) -> Self {
        let lower = text.to_lowercase();
        if lower.contains("easy") {
            Self::Easy
        } else if lower.contains("medium") {
            Self::Medium
        } else if lower.contains("hard") {
            Self::Hard
        } else {
            Self::Unknown
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the core knows about the problem being viewed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemInfo {
    pub title: String,
    pub difficulty: Difficulty,
    /// Bounded to [`MAX_DESCRIPTION_CHARS`] characters plus an ellipsis.
    pub description: String,
    /// Address the info was captured from.
    pub source_address: String,
    pub captured_at: DateTime<Utc>,
}

impl ProblemInfo {
    /// Builds a minimal info purely from the page address.
    ///
    /// Used when extraction never produced a usable result.
    pub fn from_address(address: &str) -> Self {
        let title = problem_slug(address)
            .map(title_from_slug)
            .filter(|title| !title.is_empty())
            .unwrap_or_else(|| "Current Problem".to_string());

        let description = format!(
            "Working on: {title}. Let me help you understand and solve this problem step by step!"
        );

        Self {
            title,
            difficulty: Difficulty::Unknown,
            description,
            source_address: address.to_string(),
            captured_at: Utc::now(),
        }
    }

    /// Canonical identity of the problem this info describes.
    pub fn identity(&self) -> ProblemIdentity {
        ProblemIdentity::normalize(&self.source_address)
    }
}

/// Truncates a description to [`MAX_DESCRIPTION_CHARS`] characters.
pub fn bound_description(description: &str) -> String {
    truncate_chars(description, MAX_DESCRIPTION_CHARS)
}

/// Truncates on a character boundary, appending `...` when something was cut.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_from_badge() {
        assert_eq!(Difficulty::from_badge("Easy"), Difficulty::Easy);
        assert_eq!(Difficulty::from_badge("  MEDIUM "), Difficulty::Medium);
        assert_eq!(Difficulty::from_badge("text-difficulty-hard"), Difficulty::Hard);
        assert_eq!(Difficulty::from_badge("Premium"), Difficulty::Unknown);
    }

    #[test]
    fn test_from_address_uses_slug() {
        let info = ProblemInfo::from_address("https://leetcode.com/problems/two-sum/description/?x=1");
        assert_eq!(info.title, "Two Sum");
        assert_eq!(info.difficulty, Difficulty::Unknown);
        assert!(info.description.contains("Two Sum"));
        assert_eq!(info.identity().as_str(), "https://leetcode.com/problems/two-sum");
    }

    #[test]
    fn test_from_address_without_slug() {
        let info = ProblemInfo::from_address("https://leetcode.com/problemset/");
        assert_eq!(info.title, "Current Problem");
    }

    #[test]
    fn test_truncate_chars_respects_boundaries() {
        assert_eq!(truncate_chars("short", 10), "short");
        assert_eq!(truncate_chars("abcdef", 3), "abc...");
        assert_eq!(truncate_chars("ééééé", 2), "éé...");
    }
}
