use anyhow::{Context, Result};
use mentor_application::{ConversationStore, CredentialService};
use mentor_core::config::MentorConfig;
use mentor_infrastructure::{
    ConfigService, FileCredentialStore, JsonConversationRepository, MentorPaths,
};
use std::path::Path;
use std::sync::Arc;

/// Resolved paths and configuration shared by every command.
pub struct AppContext {
    pub paths: MentorPaths,
    pub config: MentorConfig,
}

impl AppContext {
    pub fn load(home: Option<&Path>) -> Result<Self> {
        let paths = MentorPaths::new(home).context("Failed to resolve the mentor data directory")?;
        let config = ConfigService::from_paths(&paths).load_or_default();
        Ok(Self { paths, config })
    }

    /// Opens the conversation store for one surface and reconciles its keys.
    pub async fn open_store(&self) -> Arc<ConversationStore> {
        let repository = Arc::new(JsonConversationRepository::from_paths(&self.paths));
        let store = Arc::new(ConversationStore::new(repository));
        store.load().await;
        if let Err(e) = store.reconcile_keys().await {
            tracing::warn!("[AppContext] Key reconciliation could not be saved: {}", e);
        }
        store
    }

    pub fn credentials(&self) -> CredentialService {
        CredentialService::new(Arc::new(FileCredentialStore::from_paths(&self.paths)))
    }
}
