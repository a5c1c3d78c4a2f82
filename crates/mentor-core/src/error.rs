//! Error types for the Mentor application.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the entire Mentor application.
///
/// Typed variants for every failure family the core distinguishes, with
/// automatic conversion from the I/O and serialization errors raised by the
/// storage layer.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MentorError {
    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON"
        message: String,
    },

    /// Rejected user-supplied value (e.g. malformed credential)
    #[error("Validation error: {0}")]
    Validation(String),

    /// No page is active in the browser surface
    #[error("No active page found")]
    NoActivePage,

    /// The active page is not a problem page
    #[error("Not a problem page: {address}")]
    NotAProblemPage { address: String },

    /// The extraction collaborator could not be reached on any attempt
    #[error("Extraction collaborator unreachable after {attempts} attempt(s): {message}")]
    ExtractorUnreachable { attempts: u32, message: String },

    /// Input arrived while the surface could not accept it
    #[error("Input rejected: surface is {state}")]
    InputRejected { state: String },

    /// The surface has been torn down
    #[error("Surface closed")]
    SurfaceClosed,

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl MentorError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is an IO error
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }

    /// Check if this is a serialization error
    pub fn is_serialization(&self) -> bool {
        matches!(self, Self::Serialization { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this error means no usable page could be found at all.
    ///
    /// These are the only extraction outcomes surfaced to the caller; every
    /// other extraction failure is recovered by the address fallback.
    pub fn is_page_unavailable(&self) -> bool {
        matches!(
            self,
            Self::NoActivePage | Self::NotAProblemPage { .. } | Self::ExtractorUnreachable { .. }
        )
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for MentorError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for MentorError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for MentorError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, MentorError>`.
pub type Result<T> = std::result::Result<T, MentorError>;
