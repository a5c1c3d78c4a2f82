//! Remote assistant contract.
//!
//! The transport and request schema belong to the implementation (see the
//! interaction crate). The core only needs the reply text and, on failure,
//! which bucket the failure falls into so it can pick a user-facing message.

use async_trait::async_trait;
use thiserror::Error;

use crate::conversation::Turn;

/// Failure of a single assistant call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssistantError {
    /// No credential is configured.
    #[error("No API key configured")]
    MissingCredential,

    /// The endpoint answered with a non-success status.
    #[error("API error: {status} - {message}")]
    Http { status: u16, message: String },

    /// The request never produced a response (connect, timeout, ...).
    #[error("Request failed: {0}")]
    Transport(String),

    /// The response body did not have the expected shape.
    #[error("Invalid response format from API: {0}")]
    InvalidResponse(String),

    /// The response contained no text.
    #[error("Empty response from AI")]
    EmptyResponse,
}

/// Buckets used to choose the message shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureCategory {
    Auth,
    RateLimited,
    Server,
    Other,
}

impl AssistantError {
    pub fn category(&self) -> FailureCategory {
        match self {
            AssistantError::MissingCredential => FailureCategory::Auth,
            AssistantError::Http { status, .. } => match *status {
                401 | 403 => FailureCategory::Auth,
                429 => FailureCategory::RateLimited,
                500..=599 => FailureCategory::Server,
                _ => FailureCategory::Other,
            },
            _ => FailureCategory::Other,
        }
    }
}

impl FailureCategory {
    /// Message shown to the user in place of the assistant reply.
    pub fn user_message(&self) -> &'static str {
        match self {
            FailureCategory::Auth => "API key issue. Please check the configuration.",
            FailureCategory::RateLimited => "Rate limited. Please wait a moment and try again.",
            FailureCategory::Server => "Server error. Please try again in a moment.",
            FailureCategory::Other => "Please try again.",
        }
    }
}

/// Remote completion collaborator.
#[async_trait]
pub trait Assistant: Send + Sync {
    /// Produces the next assistant reply for the full transcript.
    ///
    /// The returned text is passed through to the transcript unmodified.
    async fn ask(&self, turns: &[Turn]) -> Result<String, AssistantError>;
}
