//! Credential override file storage (`secret.json`).

use async_trait::async_trait;
use std::path::PathBuf;

use mentor_core::error::Result;
use mentor_core::secret::CredentialStore;

use crate::dto::SecretFileV1;
use crate::paths::MentorPaths;
use crate::storage::AtomicJsonFile;

/// File-backed credential slot.
///
/// Responsibilities:
/// - Read the override at surface start
/// - Write or clear it from the settings command
///
/// Does NOT:
/// - Validate the key (see `mentor_core::secret::validate_credential`)
/// - Fall back to environment variables (see `CredentialService`)
///
/// # Security Note
///
/// The file is plaintext JSON written with 600 permissions on Unix. The key
/// is never logged.
pub struct FileCredentialStore {
    file: AtomicJsonFile<SecretFileV1>,
}

impl FileCredentialStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: AtomicJsonFile::new(path).private(),
        }
    }

    pub fn from_paths(paths: &MentorPaths) -> Self {
        Self::new(paths.secret_file())
    }
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn load_credential(&self) -> Result<Option<String>> {
        let secret = self.file.load()?.unwrap_or_default();
        Ok(secret.api_key.filter(|key| !key.trim().is_empty()))
    }

    async fn save_credential(&self, credential: Option<String>) -> Result<()> {
        tracing::info!(
            "[FileCredentialStore] Saving credential override: {}",
            if credential.is_some() { "user key" } else { "cleared" }
        );
        self.file.save(&SecretFileV1 {
            api_key: credential,
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_means_absent() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileCredentialStore::new(temp_dir.path().join("secret.json"));
        assert_eq!(store.load_credential().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_save_then_clear() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileCredentialStore::new(temp_dir.path().join("secret.json"));

        store
            .save_credential(Some("sk-or-v1-test".to_string()))
            .await
            .unwrap();
        assert_eq!(
            store.load_credential().await.unwrap(),
            Some("sk-or-v1-test".to_string())
        );

        store.save_credential(None).await.unwrap();
        assert_eq!(store.load_credential().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_invalid_json_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("secret.json");
        std::fs::write(&path, "{ invalid json").unwrap();

        let store = FileCredentialStore::new(path);
        assert!(store.load_credential().await.is_err());
    }
}
