//! JSON-file ConversationRepository implementation

use async_trait::async_trait;
use std::path::PathBuf;

use mentor_core::conversation::{ConversationMap, ConversationRepository};
use mentor_core::error::Result;

use crate::dto::StoredConversations;
use crate::paths::MentorPaths;
use crate::storage::AtomicJsonFile;

/// Stores the whole conversation mapping in one JSON document.
///
/// - Reads both the current versioned layout and the legacy single-slot layout
/// - Always writes the current layout
/// - Writes are atomic (tmp file + rename); there is no cross-process lock
pub struct JsonConversationRepository {
    file: AtomicJsonFile<StoredConversations>,
}

impl JsonConversationRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: AtomicJsonFile::new(path),
        }
    }

    pub fn from_paths(paths: &MentorPaths) -> Self {
        Self::new(paths.conversations_file())
    }
}

#[async_trait]
impl ConversationRepository for JsonConversationRepository {
    async fn load(&self) -> Result<Option<ConversationMap>> {
        let Some(stored) = self.file.load()? else {
            return Ok(None);
        };

        if stored.is_legacy() {
            tracing::info!(
                "[JsonConversationRepository] Migrating legacy single-slot document at {:?}",
                self.file.path()
            );
        }

        stored.into_domain().map(Some)
    }

    async fn save(&self, map: &ConversationMap) -> Result<()> {
        tracing::debug!(
            "[JsonConversationRepository] Saving {} conversation(s) to {:?}",
            map.len(),
            self.file.path()
        );
        self.file.save(&StoredConversations::current(map))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mentor_core::conversation::{ConversationRecord, Turn};
    use mentor_core::problem::{ProblemIdentity, ProblemInfo};
    use tempfile::TempDir;

    fn sample_map() -> ConversationMap {
        let info = ProblemInfo::from_address("https://leetcode.com/problems/two-sum");
        let mut record = ConversationRecord::seeded(info.clone(), "rules".into(), "welcome".into());
        record.append(Turn::user("where do I start?"));
        record.append(Turn::assistant("What does a brute force look like?"));

        let mut map = ConversationMap::new();
        map.insert(info.identity(), record);
        map
    }

    #[tokio::test]
    async fn test_missing_file_loads_none() {
        let temp_dir = TempDir::new().unwrap();
        let repo = JsonConversationRepository::new(temp_dir.path().join("conversations.json"));
        assert!(repo.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_load_round_trip_is_stable() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("conversations.json");
        let repo = JsonConversationRepository::new(path.clone());

        let map = sample_map();
        repo.save(&map).await.unwrap();
        let first_bytes = std::fs::read_to_string(&path).unwrap();

        let loaded = repo.load().await.unwrap().unwrap();
        assert_eq!(loaded, map);
        repo.save(&loaded).await.unwrap();
        let reloaded = repo.load().await.unwrap().unwrap();
        repo.save(&reloaded).await.unwrap();

        assert_eq!(reloaded, map);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), first_bytes);
    }

    #[tokio::test]
    async fn test_legacy_document_is_rewritten_in_current_layout() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("conversations.json");
        std::fs::write(
            &path,
            r#"{"lastProblemUrl":"https://leetcode.com/problems/two-sum","lastConversation":[{"role":"system","content":"rules"}],"lastProblemDetails":null}"#,
        )
        .unwrap();

        let repo = JsonConversationRepository::new(path.clone());
        let map = repo.load().await.unwrap().unwrap();
        assert!(map.contains_key(&ProblemIdentity::from_stored("https://leetcode.com/problems/two-sum")));

        repo.save(&map).await.unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"schema_version\""));
    }

    #[tokio::test]
    async fn test_corrupt_file_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("conversations.json");
        std::fs::write(&path, "[1, 2").unwrap();

        let repo = JsonConversationRepository::new(path);
        assert!(repo.load().await.unwrap_err().is_serialization());
    }
}
