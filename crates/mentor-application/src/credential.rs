//! Credential resolution and the settings-dialog operations.

use mentor_core::error::Result;
use mentor_core::secret::{CredentialStore, validate_credential};
use std::sync::Arc;

/// Where the active credential came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    /// User override saved through the settings dialog.
    Stored,
    /// Environment variable named in the assistant settings.
    Environment,
    /// No credential; assistant calls fail with an auth error.
    Absent,
}

impl CredentialSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            CredentialSource::Stored => "user key",
            CredentialSource::Environment => "environment",
            CredentialSource::Absent => "no key",
        }
    }
}

/// Resolves the credential handed to the assistant client.
///
/// Order: stored override, then the environment variable, then nothing.
pub struct CredentialService {
    store: Arc<dyn CredentialStore>,
}

impl CredentialService {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    /// Resolves the credential using the process environment.
    pub async fn resolve(&self, env_var: &str) -> (Option<String>, CredentialSource) {
        let from_env = std::env::var(env_var).ok();
        self.resolve_with(from_env).await
    }

    /// Resolves the credential against an explicit environment value.
    pub async fn resolve_with(&self, from_env: Option<String>) -> (Option<String>, CredentialSource) {
        let stored = match self.store.load_credential().await {
            Ok(stored) => stored,
            Err(e) => {
                tracing::warn!("[CredentialService] Could not read stored credential: {}", e);
                None
            }
        };

        let resolved = pick_credential(stored, from_env);
        tracing::debug!("[CredentialService] Using {}", resolved.1.as_str());
        resolved
    }

    /// Validates and stores a credential typed by the user.
    ///
    /// An empty value clears the override.
    pub async fn set(&self, raw: &str) -> Result<()> {
        let credential = validate_credential(raw)?;
        self.store.save_credential(credential).await
    }

    pub async fn clear(&self) -> Result<()> {
        self.store.save_credential(None).await
    }
}

fn pick_credential(
    stored: Option<String>,
    from_env: Option<String>,
) -> (Option<String>, CredentialSource) {
    let non_blank = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

    if let Some(key) = non_blank(stored) {
        return (Some(key), CredentialSource::Stored);
    }
    if let Some(key) = non_blank(from_env) {
        return (Some(key.trim().to_string()), CredentialSource::Environment);
    }
    (None, CredentialSource::Absent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockCredentialStore {
        slot: Mutex<Option<String>>,
    }

    #[async_trait]
    impl CredentialStore for MockCredentialStore {
        async fn load_credential(&self) -> Result<Option<String>> {
            Ok(self.slot.lock().unwrap().clone())
        }

        async fn save_credential(&self, credential: Option<String>) -> Result<()> {
            *self.slot.lock().unwrap() = credential;
            Ok(())
        }
    }

    #[test]
    fn test_pick_credential_order() {
        assert_eq!(
            pick_credential(Some("sk-user".into()), Some("sk-env".into())),
            (Some("sk-user".into()), CredentialSource::Stored)
        );
        assert_eq!(
            pick_credential(None, Some("sk-env\n".into())),
            (Some("sk-env".into()), CredentialSource::Environment)
        );
        assert_eq!(
            pick_credential(Some("".into()), Some(" ".into())),
            (None, CredentialSource::Absent)
        );
    }

    #[tokio::test]
    async fn test_set_and_clear_override() {
        let service = CredentialService::new(Arc::new(MockCredentialStore::default()));

        assert!(service.set("not-a-key").await.unwrap_err().is_validation());

        service.set(" sk-or-v1-abc ").await.unwrap();
        let (key, source) = service.resolve_with(Some("sk-env".into())).await;
        assert_eq!(key.as_deref(), Some("sk-or-v1-abc"));
        assert_eq!(source, CredentialSource::Stored);

        service.clear().await.unwrap();
        let (_, source) = service.resolve_with(Some("sk-env".into())).await;
        assert_eq!(source, CredentialSource::Environment);
    }
}
