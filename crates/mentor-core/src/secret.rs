//! Credential override slot.
//!
//! A single user-supplied API key, read at surface start and written by the
//! settings dialog. The core only cares whether one is present.

use async_trait::async_trait;

use crate::error::{MentorError, Result};

/// Prefix every accepted API key starts with.
pub const CREDENTIAL_PREFIX: &str = "sk-";

/// Storage for the user's credential override.
///
/// # Security Note
///
/// Implementations must never log the credential value or include it in
/// error messages.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Loads the stored credential, if any.
    async fn load_credential(&self) -> Result<Option<String>>;

    /// Stores `Some(key)` as the override, or clears it with `None`.
    async fn save_credential(&self, credential: Option<String>) -> Result<()>;
}

/// Trims and validates a credential typed into the settings dialog.
///
/// An empty value means "clear the override" and yields `Ok(None)`.
pub fn validate_credential(raw: &str) -> Result<Option<String>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if !trimmed.starts_with(CREDENTIAL_PREFIX) {
        return Err(MentorError::validation(format!(
            "Please enter a valid API key that starts with \"{}\"",
            CREDENTIAL_PREFIX
        )));
    }
    Ok(Some(trimmed.to_string()))
}
