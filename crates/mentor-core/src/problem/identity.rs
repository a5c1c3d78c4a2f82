//! Canonical problem identity derived from page addresses.
//!
//! The same problem is reachable through many address variants: content-view
//! sub-paths (`/description/`, `/editorial/`, ...), tracking query strings and
//! trailing slashes. [`ProblemIdentity::normalize`] collapses them all onto one
//! key so a transcript survives navigation between variants.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Path marker that precedes the problem slug.
pub const PROBLEM_PATH_MARKER: &str = "/problems/";

/// Sub-paths that render the same problem under a different tab.
pub const CONTENT_VIEW_SEGMENTS: &[&str] = &["description", "editorial", "solutions", "submissions"];

/// Canonical, stable identity of one logical problem.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProblemIdentity(String);

impl ProblemIdentity {
    /// Derives the canonical identity for a raw page address.
    pub fn normalize(address: &str) -> Self {
        Self(normalize_address(address))
    }

    /// Wraps an already-stored key without normalizing it.
    ///
    /// Used when reading historical mappings whose keys predate the current
    /// normalization rules.
    pub fn from_stored(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    /// The problem slug embedded in the identity, if any.
    pub fn slug(&self) -> Option<&str> {
        problem_slug(&self.0)
    }
}

impl fmt::Display for ProblemIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ProblemIdentity {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Normalizes a page address into its canonical string form.
///
/// Steps: drop everything from the first `?`, drop trailing `/`, and drop any
/// tail after the slug that starts with a content-view segment. If no slug
/// follows the problem marker the query-stripped address is returned as-is.
///
/// The function is pure and idempotent.
pub fn normalize_address(address: &str) -> String {
    let without_query = strip_query(address).trim();

    let Some(marker_at) = without_query.find(PROBLEM_PATH_MARKER) else {
        return without_query.to_string();
    };

    let prefix = &without_query[..marker_at];
    let after_marker = &without_query[marker_at + PROBLEM_PATH_MARKER.len()..];
    let mut segments = after_marker.split('/');
    let slug = segments.next().unwrap_or_default().trim();

    if slug.is_empty() {
        return without_query.to_string();
    }

    // Anything under a content-view tab (including nested pages such as a
    // single submission) belongs to the same problem.
    let tail_is_content_view = match segments.map(str::trim).find(|segment| !segment.is_empty()) {
        None => true,
        Some(first) => CONTENT_VIEW_SEGMENTS.contains(&first),
    };

    if tail_is_content_view {
        format!("{prefix}{PROBLEM_PATH_MARKER}{slug}")
    } else {
        without_query
            .trim_end_matches(|c: char| c == '/' || c.is_whitespace())
            .to_string()
    }
}

/// Extracts the problem slug (`two-sum`) from an address.
pub fn problem_slug(address: &str) -> Option<&str> {
    let without_query = strip_query(address);
    let marker_at = without_query.find(PROBLEM_PATH_MARKER)?;
    let slug = without_query[marker_at + PROBLEM_PATH_MARKER.len()..]
        .split('/')
        .next()?
        .trim();
    (!slug.is_empty()).then_some(slug)
}

/// Returns `true` if the address points at a problem page.
pub fn is_problem_address(address: &str) -> bool {
    problem_slug(address).is_some()
}

/// Turns a slug into a display title: `two-sum` becomes `Two Sum`.
pub fn title_from_slug(slug: &str) -> String {
    slug.split('-')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn strip_query(address: &str) -> &str {
    address.split('?').next().unwrap_or(address)
}
