//! Conversation repository trait.
//!
//! Defines the whole-mapping persistence contract the conversation store
//! depends on.

use async_trait::async_trait;

use super::model::ConversationMap;
use crate::error::Result;

/// Durable storage for the full conversation mapping.
///
/// The mapping is read and written as a unit: there are no per-record
/// operations, and implementations must never let a reader observe a
/// partially written mapping.
///
/// # Implementation Notes
///
/// Concurrent writers are not coordinated; the last `save` wins.
#[async_trait]
pub trait ConversationRepository: Send + Sync {
    /// Loads the full mapping.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(map))`: a mapping was stored
    /// - `Ok(None)`: nothing has been stored yet
    /// - `Err(_)`: the stored data could not be read or parsed
    async fn load(&self) -> Result<Option<ConversationMap>>;

    /// Replaces the stored mapping with `map`.
    async fn save(&self, map: &ConversationMap) -> Result<()>;
}
