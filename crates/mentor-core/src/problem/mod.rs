//! Problem domain module.
//!
//! # Module Structure
//!
//! - `identity`: canonical problem identity (`ProblemIdentity`) and the address normalizer
//! - `model`: problem info captured from the page (`ProblemInfo`, `Difficulty`)
//! - `extraction`: extraction collaborator contract and payload sanitization

mod extraction;
mod identity;
mod model;

pub use extraction::{
    ExtractionError, ExtractionPayload, PLACEHOLDER_TITLES, ProblemExtractor, clean_description,
    clean_title,
};
pub use identity::{
    CONTENT_VIEW_SEGMENTS, PROBLEM_PATH_MARKER, ProblemIdentity, is_problem_address,
    normalize_address, problem_slug, title_from_slug,
};
pub use model::{Difficulty, MAX_DESCRIPTION_CHARS, ProblemInfo, bound_description, truncate_chars};
