//! Per-surface conversation store.
//!
//! `ConversationStore` keeps the full identity -> record mapping in memory for
//! the lifetime of one surface and writes the whole mapping back through the
//! repository after every mutation. Durable storage is the only thing shared
//! between surfaces.

use mentor_core::conversation::{ConversationMap, ConversationRecord, ConversationRepository};
use mentor_core::error::Result;
use mentor_core::problem::ProblemIdentity;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory mapping backed by a whole-mapping repository.
///
/// The in-memory copy is authoritative: a failed write is reported to the
/// caller but never rolls the mapping back.
pub struct ConversationStore {
    repository: Arc<dyn ConversationRepository>,
    conversations: RwLock<ConversationMap>,
}

impl ConversationStore {
    /// Creates an empty store. Call [`ConversationStore::load`] before use.
    pub fn new(repository: Arc<dyn ConversationRepository>) -> Self {
        Self {
            repository,
            conversations: RwLock::new(ConversationMap::new()),
        }
    }

    /// Reads the full mapping from the repository into memory.
    ///
    /// Never fails: missing or unreadable data yields an empty mapping and a
    /// logged warning.
    pub async fn load(&self) -> ConversationMap {
        let loaded = match self.repository.load().await {
            Ok(Some(map)) => {
                tracing::debug!("[ConversationStore] Loaded {} conversation(s)", map.len());
                map
            }
            Ok(None) => {
                tracing::debug!("[ConversationStore] No stored conversations");
                ConversationMap::new()
            }
            Err(e) => {
                tracing::warn!(
                    "[ConversationStore] Failed to load conversations, starting empty: {}",
                    e
                );
                ConversationMap::new()
            }
        };

        let mut conversations = self.conversations.write().await;
        *conversations = loaded.clone();
        loaded
    }

    /// Replaces the in-memory mapping and writes it out.
    ///
    /// On failure the new mapping is still kept in memory.
    pub async fn save(&self, mapping: ConversationMap) -> Result<()> {
        let mut conversations = self.conversations.write().await;
        *conversations = mapping;
        self.persist(&conversations).await
    }

    /// Returns a copy of the record stored under `identity`.
    pub async fn get(&self, identity: &ProblemIdentity) -> Option<ConversationRecord> {
        let conversations = self.conversations.read().await;
        conversations.get(identity).cloned()
    }

    /// Inserts or replaces a record and persists the mapping immediately.
    pub async fn put(&self, identity: ProblemIdentity, record: ConversationRecord) -> Result<()> {
        let mut conversations = self.conversations.write().await;
        tracing::debug!(
            "[ConversationStore] put: key={}, turns={}",
            identity,
            record.len()
        );
        conversations.insert(identity, record);
        self.persist(&conversations).await
    }

    /// Returns a copy of the whole in-memory mapping.
    pub async fn snapshot(&self) -> ConversationMap {
        self.conversations.read().await.clone()
    }

    /// Re-keys every record under its canonical identity.
    ///
    /// Colliding keys are merged with [`reconcile_mapping`]. The mapping is
    /// persisted only when at least one key changed.
    pub async fn reconcile_keys(&self) -> Result<ReconcileReport> {
        let mut conversations = self.conversations.write().await;
        let current = std::mem::take(&mut *conversations);
        let (reconciled, report) = reconcile_mapping(current);
        *conversations = reconciled;

        if !report.changed {
            tracing::debug!("[ConversationStore] All keys already canonical");
            return Ok(report);
        }

        tracing::info!(
            "[ConversationStore] Reconciled keys: {} re-keyed, {} merge(s)",
            report.rekeyed.len(),
            report.merges.len()
        );
        self.persist(&conversations).await?;
        Ok(report)
    }

    async fn persist(&self, conversations: &ConversationMap) -> Result<()> {
        match self.repository.save(conversations).await {
            Ok(()) => Ok(()),
            Err(e) => {
                tracing::error!("[ConversationStore] Failed to save conversations: {}", e);
                Err(e)
            }
        }
    }
}

/// Outcome of a key reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconcileReport {
    /// `true` when any stored key differed from its canonical form.
    pub changed: bool,
    /// Keys moved to a different canonical key without a collision.
    pub rekeyed: Vec<(ProblemIdentity, ProblemIdentity)>,
    /// Canonical keys that absorbed more than one stored key.
    pub merges: Vec<KeyMerge>,
}

/// One collision resolved during reconciliation.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyMerge {
    pub canonical: ProblemIdentity,
    /// Stored key whose record was kept.
    pub kept: ProblemIdentity,
    /// Stored keys whose records were discarded.
    pub dropped: Vec<ProblemIdentity>,
}

/// Recomputes the canonical key of every record.
///
/// When several stored keys collapse onto one canonical key, the record with
/// more turns wins; on a tie the first key in iteration order wins. Recency is
/// never considered.
pub fn reconcile_mapping(mapping: ConversationMap) -> (ConversationMap, ReconcileReport) {
    let mut winners: BTreeMap<ProblemIdentity, (ProblemIdentity, ConversationRecord)> =
        BTreeMap::new();
    let mut losers: BTreeMap<ProblemIdentity, Vec<ProblemIdentity>> = BTreeMap::new();
    let mut report = ReconcileReport::default();

    for (stored_key, record) in mapping {
        let canonical = ProblemIdentity::normalize(stored_key.as_str());
        if canonical != stored_key {
            report.changed = true;
        }

        match winners.remove(&canonical) {
            None => {
                winners.insert(canonical, (stored_key, record));
            }
            Some((held_key, held)) => {
                let (kept_key, kept, dropped_key) = if record.len() > held.len() {
                    (stored_key, record, held_key)
                } else {
                    (held_key, held, stored_key)
                };
                losers.entry(canonical.clone()).or_default().push(dropped_key);
                winners.insert(canonical, (kept_key, kept));
            }
        }
    }

    let mut reconciled = ConversationMap::new();
    for (canonical, (kept_key, record)) in winners {
        match losers.remove(&canonical) {
            Some(dropped) => report.merges.push(KeyMerge {
                canonical: canonical.clone(),
                kept: kept_key,
                dropped,
            }),
            None if kept_key != canonical => {
                report.rekeyed.push((kept_key, canonical.clone()));
            }
            None => {}
        }
        reconciled.insert(canonical, record);
    }

    (reconciled, report)
}
